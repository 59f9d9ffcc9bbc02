//! 井字棋 AI 引擎
//!
//! 包含:
//! - Minimax + Alpha-Beta 完全搜索（经典模式）
//! - 按难度随机化的走法选择
//! - 超级模式的格子优先级启发式

mod engine;
mod heuristic;
mod search;

pub use engine::{AiConfig, AiEngine, Difficulty};
pub use heuristic::{priority_move, CELL_PRIORITY};
pub use search::{best_move, search, Minimax, WIN_SCORE};
