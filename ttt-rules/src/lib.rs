//! 井字棋规则库
//!
//! 包含:
//! - 符号、格子、棋盘等核心数据结构
//! - 连线检测与终局判定
//! - 经典模式与超级模式（九宫嵌套）的状态机
//! - 棋盘记谱格式
//! - AI 难度定义

mod board;
mod classic;
mod constants;
mod difficulty;
mod error;
mod lines;
mod notation;
mod symbol;
mod ultimate;

pub use board::{Board, BoardStatus, Cell};
pub use classic::{ClassicPhase, ClassicState};
pub use constants::*;
pub use difficulty::Difficulty;
pub use error::{MoveError, ParseError};
pub use lines::{classify, detect_line, winning_line};
pub use symbol::Symbol;
pub use ultimate::{
    ActiveBoard, SubResult, UltimateBoard, UltimateMove, UltimatePhase, UltimateState,
};
