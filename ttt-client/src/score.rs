//! 计分板

use serde::{Deserialize, Serialize};
use ttt_rules::Symbol;

/// 对局结果（玩家视角）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// 玩家胜
    PlayerWin,
    /// AI 胜
    AiWin,
    /// 平局
    Draw,
}

impl Outcome {
    /// 由获胜方推导结果，`None` 为平局
    pub fn from_winner(winner: Option<Symbol>, human: Symbol) -> Self {
        match winner {
            Some(symbol) if symbol == human => Outcome::PlayerWin,
            Some(_) => Outcome::AiWin,
            None => Outcome::Draw,
        }
    }

    /// 结束提示
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::PlayerWin => "恭喜你赢了！",
            Outcome::AiWin => "AI 获胜！",
            Outcome::Draw => "平局！",
        }
    }
}

/// 计分板（仅内存，跨局累计）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub player: u32,
    pub ai: u32,
    pub draws: u32,
}

impl Scoreboard {
    /// 记录一局结果
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWin => self.player += 1,
            Outcome::AiWin => self.ai += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// 总局数
    pub fn total(&self) -> u32 {
        self.player + self.ai + self.draws
    }
}
