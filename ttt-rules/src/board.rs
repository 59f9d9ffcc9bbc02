//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::CELL_COUNT;
use crate::error::MoveError;
use crate::lines::classify;
use crate::symbol::Symbol;

/// 格子：`None` 为空，`Some` 为已落子
pub type Cell = Option<Symbol>;

/// 3x3 棋盘
///
/// 下标按行优先排列：
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从格子数组创建
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// 全部格子
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// 获取指定格子（越界返回 `None`）
    pub fn get(&self, index: usize) -> Cell {
        self.cells.get(index).copied().flatten()
    }

    /// 设置指定格子（不检查规则，越界忽略）
    ///
    /// 供搜索在私有副本上落子和撤销使用。
    pub fn set(&mut self, index: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    /// 落子（检查下标和占用）
    pub fn place(&mut self, index: usize, symbol: Symbol) -> Result<(), MoveError> {
        let slot = self
            .cells
            .get_mut(index)
            .ok_or(MoveError::InvalidCell { index })?;
        if slot.is_some() {
            return Err(MoveError::CellOccupied { index });
        }
        *slot = Some(symbol);
        Ok(())
    }

    /// 指定格子是否为空
    pub fn is_empty_at(&self, index: usize) -> bool {
        index < CELL_COUNT && self.cells[index].is_none()
    }

    /// 所有空格下标（升序）
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.cells[i].is_none()).collect()
    }

    /// 已落子数量
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// 指定符号的棋子数量
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|c| **c == Some(symbol)).count()
    }

    /// 棋盘是否已满
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// 终局判定
    pub fn status(&self) -> BoardStatus {
        classify(self)
    }
}

/// 棋盘状态（由棋盘推导，不单独存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardStatus {
    /// 进行中
    InProgress,
    /// 某方连成一线
    Won(Symbol),
    /// 下满且无人获胜
    Drawn,
}

impl BoardStatus {
    /// 是否已终局
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BoardStatus::InProgress)
    }

    /// 获胜方
    pub fn winner(&self) -> Option<Symbol> {
        match self {
            BoardStatus::Won(symbol) => Some(*symbol),
            _ => None,
        }
    }
}
