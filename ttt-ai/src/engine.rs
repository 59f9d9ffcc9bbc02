//! AI 引擎
//!
//! 按难度在随机落子与完全搜索之间选择。随机数源由调用方注入，测试中可固定种子。

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ttt_rules::{Board, Symbol};

use crate::search::Minimax;

// 重导出 Difficulty 以便外部使用
pub use ttt_rules::Difficulty;

/// AI 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 经典模式随机落子概率
    pub classic_random_chance: f64,
    /// 超级模式随机落子概率
    pub ultimate_random_chance: f64,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            classic_random_chance: difficulty.classic_random_chance(),
            ultimate_random_chance: difficulty.ultimate_random_chance(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// AI 引擎
///
/// 无状态：每一步都从头计算，只保留随机数源和上次搜索的节点数。
pub struct AiEngine<R = ChaCha8Rng> {
    config: AiConfig,
    pub(crate) rng: R,
    nodes_searched: u64,
}

impl AiEngine<ChaCha8Rng> {
    /// 创建新的 AI 引擎（系统熵作为种子）
    pub fn new(config: AiConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 使用固定种子创建
    pub fn seeded(config: AiConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> AiEngine<R> {
    /// 使用指定随机数源创建
    pub fn with_rng(config: AiConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            nodes_searched: 0,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 获取上次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 完全搜索得到的最佳落点
    pub fn best_move(&mut self, board: &Board, ai: Symbol, human: Symbol) -> usize {
        let mut minimax = Minimax::new();
        let cell = minimax.best_move(board, ai, human);
        self.nodes_searched = minimax.nodes_searched();
        cell
    }

    /// 经典模式选择走法
    ///
    /// 先抽一个 [0, 1) 的随机数，低于难度对应的概率时随机选一个空格，
    /// 否则走完全搜索的最佳落点。
    ///
    /// # Panics
    ///
    /// 棋盘已终局时调用属于编程错误。
    pub fn choose_move(&mut self, board: &Board, ai: Symbol, human: Symbol) -> usize {
        let empty = board.empty_cells();
        assert!(
            !empty.is_empty() && !board.status().is_terminal(),
            "choose_move called on a finished board: {}",
            board
        );

        let roll: f64 = self.rng.gen();
        if roll < self.config.classic_random_chance {
            let cell = empty[self.rng.gen_range(0..empty.len())];
            self.nodes_searched = 0;
            debug!(
                "AI 随机落子: {} ({:?}, roll={:.3})",
                cell, self.config.difficulty, roll
            );
            return cell;
        }

        let cell = self.best_move(board, ai, human);
        debug!(
            "AI 搜索落子: {} ({:?}, 节点数 {})",
            cell, self.config.difficulty, self.nodes_searched
        );
        cell
    }
}
