//! 经典模式（3x3）对局状态机

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardStatus};
use crate::error::MoveError;
use crate::lines::{classify, winning_line};
use crate::symbol::Symbol;

/// 经典模式对局阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassicPhase {
    /// 轮到玩家
    PlayerTurn,
    /// 轮到 AI
    AiTurn,
    /// 某方获胜
    Won(Symbol),
    /// 平局
    Drawn,
}

impl ClassicPhase {
    /// 是否已结束
    pub fn is_over(&self) -> bool {
        matches!(self, ClassicPhase::Won(_) | ClassicPhase::Drawn)
    }
}

/// 经典模式对局状态
///
/// 不可变快照：每次落子返回新状态，原状态不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicState {
    board: Board,
    phase: ClassicPhase,
    human: Symbol,
}

impl ClassicState {
    /// 开局，X 先手
    pub fn new(human: Symbol) -> Self {
        let phase = if human == Symbol::First {
            ClassicPhase::PlayerTurn
        } else {
            ClassicPhase::AiTurn
        };
        Self {
            board: Board::empty(),
            phase,
            human,
        }
    }

    /// 从任意棋盘恢复状态，走子方由双方棋子数推导
    pub fn from_board(board: Board, human: Symbol) -> Self {
        let phase = match classify(&board) {
            BoardStatus::Won(symbol) => ClassicPhase::Won(symbol),
            BoardStatus::Drawn => ClassicPhase::Drawn,
            BoardStatus::InProgress => {
                let to_move = if board.count(Symbol::First) > board.count(Symbol::Second) {
                    Symbol::Second
                } else {
                    Symbol::First
                };
                if to_move == human {
                    ClassicPhase::PlayerTurn
                } else {
                    ClassicPhase::AiTurn
                }
            }
        };
        Self { board, phase, human }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> ClassicPhase {
        self.phase
    }

    /// 玩家符号
    pub fn human(&self) -> Symbol {
        self.human
    }

    /// AI 符号
    pub fn ai(&self) -> Symbol {
        self.human.opponent()
    }

    /// 当前走子方的符号，已结束时为 `None`
    pub fn mover(&self) -> Option<Symbol> {
        match self.phase {
            ClassicPhase::PlayerTurn => Some(self.human),
            ClassicPhase::AiTurn => Some(self.ai()),
            ClassicPhase::Won(_) | ClassicPhase::Drawn => None,
        }
    }

    /// 所有合法落点
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.phase.is_over() {
            Vec::new()
        } else {
            self.board.empty_cells()
        }
    }

    /// 落子并返回新状态
    pub fn apply_move(&self, cell: usize) -> Result<Self, MoveError> {
        let mover = self.mover().ok_or(MoveError::GameOver)?;

        let mut board = self.board;
        board.place(cell, mover)?;

        let phase = match classify(&board) {
            BoardStatus::Won(symbol) => ClassicPhase::Won(symbol),
            BoardStatus::Drawn => ClassicPhase::Drawn,
            BoardStatus::InProgress if self.phase == ClassicPhase::PlayerTurn => {
                ClassicPhase::AiTurn
            }
            BoardStatus::InProgress => ClassicPhase::PlayerTurn,
        };

        Ok(Self {
            board,
            phase,
            human: self.human,
        })
    }

    /// 获胜连线（用于高亮）
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        winning_line(self.board.cells())
    }
}
