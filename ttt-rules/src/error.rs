//! 错误类型定义

use thiserror::Error;

/// 走法错误
///
/// 非法走法一律返回错误，原状态保持不变。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// 格子下标越界
    #[error("Invalid cell index: {index}")]
    InvalidCell { index: usize },

    /// 小棋盘下标越界
    #[error("Invalid board index: {index}")]
    InvalidBoard { index: usize },

    /// 格子已有棋子
    #[error("Cell {index} is already occupied")]
    CellOccupied { index: usize },

    /// 小棋盘已决出胜负或平局
    #[error("Board {index} is already closed")]
    BoardClosed { index: usize },

    /// 必须在指定的小棋盘落子
    #[error("Must play in board {expected}, got board {actual}")]
    WrongBoard { expected: usize, actual: usize },

    /// 不是你的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,
}

/// 解析错误（记谱、符号、难度）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 无效的记谱字符
    #[error("Invalid character '{ch}' at position {position}")]
    InvalidChar { ch: char, position: usize },

    /// 格子数量不符
    #[error("Expected {expected} cells, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// 小棋盘数量不符
    #[error("Expected {expected} boards, got {actual}")]
    WrongBoardCount { expected: usize, actual: usize },

    /// 无效的符号
    #[error("Unknown symbol: {value:?}")]
    UnknownSymbol { value: String },

    /// 无效的难度
    #[error("Unknown difficulty: {value:?}")]
    UnknownDifficulty { value: String },
}
