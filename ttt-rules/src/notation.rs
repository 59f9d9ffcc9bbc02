//! 棋盘记谱
//!
//! 经典棋盘：9 个字符，`X`/`O` 为棋子，`.`（或 `-`、`_`）为空格，空白忽略。
//! 超级棋盘：9 个经典记谱，以 `/` 分隔。

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Cell};
use crate::constants::{BOARD_COUNT, CELL_COUNT};
use crate::error::ParseError;
use crate::symbol::Symbol;
use crate::ultimate::UltimateBoard;

const EMPTY_CHAR: char = '.';

fn parse_cell(ch: char, position: usize) -> Result<Cell, ParseError> {
    match ch {
        '.' | '-' | '_' => Ok(None),
        _ => Symbol::from_char(ch)
            .map(Some)
            .ok_or(ParseError::InvalidChar { ch, position }),
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in self.cells() {
            let ch = cell.map(|s| s.to_char()).unwrap_or(EMPTY_CHAR);
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != CELL_COUNT {
            return Err(ParseError::WrongLength {
                expected: CELL_COUNT,
                actual: chars.len(),
            });
        }

        let mut cells = [None; CELL_COUNT];
        for (position, ch) in chars.into_iter().enumerate() {
            cells[position] = parse_cell(ch, position)?;
        }
        Ok(Board::from_cells(cells))
    }
}

impl fmt::Display for UltimateBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, board) in self.boards().iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", board)?;
        }
        Ok(())
    }
}

impl FromStr for UltimateBoard {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != BOARD_COUNT {
            return Err(ParseError::WrongBoardCount {
                expected: BOARD_COUNT,
                actual: parts.len(),
            });
        }

        let mut boards = [Board::empty(); BOARD_COUNT];
        for (slot, part) in boards.iter_mut().zip(parts) {
            *slot = part.parse()?;
        }
        Ok(UltimateBoard::from_boards(boards))
    }
}
