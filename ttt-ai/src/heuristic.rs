//! 超级模式启发式
//!
//! 超级模式状态空间太大，不做完全搜索，按格子优先级（中心 > 角 > 边）落子。

use rand::Rng;
use tracing::debug;
use ttt_rules::{ActiveBoard, Symbol, UltimateBoard, UltimateMove};

use crate::engine::AiEngine;

/// 格子优先级：中心、四角、四边
pub const CELL_PRIORITY: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

/// 按优先级选择走法
///
/// 取优先级最高且有合法走法的格子，同一格子有多个小棋盘可选时取枚举顺序中的第一个。
pub fn priority_move(legal: &[UltimateMove]) -> Option<UltimateMove> {
    CELL_PRIORITY
        .iter()
        .find_map(|&cell| legal.iter().find(|mv| mv.cell == cell).copied())
}

impl<R: Rng> AiEngine<R> {
    /// 超级模式选择走法
    ///
    /// # Panics
    ///
    /// 没有合法走法时调用属于编程错误。
    pub fn choose_ultimate_move(
        &mut self,
        board: &UltimateBoard,
        active: ActiveBoard,
        ai: Symbol,
    ) -> UltimateMove {
        let legal = board.legal_moves(active);
        assert!(
            !legal.is_empty(),
            "choose_ultimate_move called with no legal moves ({:?})",
            active
        );

        let roll: f64 = self.rng.gen();
        if roll < self.config().ultimate_random_chance {
            let mv = legal[self.rng.gen_range(0..legal.len())];
            debug!("AI ({}) 随机落子: {:?}, roll={:.3}", ai, mv, roll);
            return mv;
        }

        let mv = priority_move(&legal).unwrap_or(legal[0]);
        debug!("AI ({}) 按优先级落子: {:?}", ai, mv);
        mv
    }
}
