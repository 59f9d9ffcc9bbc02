//! 规则常量

/// 单个棋盘的格子数（3x3）
pub const CELL_COUNT: usize = 9;

/// 超级模式中小棋盘的数量
pub const BOARD_COUNT: usize = 9;

/// 棋盘边长
pub const BOARD_SIDE: usize = 3;

/// 全部获胜连线，依次为三横、三竖、两条对角线
///
/// 连线检测按此顺序遍历，先找到的连线优先。
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];
