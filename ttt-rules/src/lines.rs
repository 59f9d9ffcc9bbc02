//! 连线检测与终局判定

use crate::board::{Board, BoardStatus, Cell};
use crate::constants::{CELL_COUNT, WIN_LINES};
use crate::symbol::Symbol;

/// 查找第一条连成的线
///
/// 按 [`WIN_LINES`] 的固定顺序遍历，返回第一条三格同符号的连线。
/// 同时存在多条连线时结果仍是确定的。
pub fn winning_line(cells: &[Cell; CELL_COUNT]) -> Option<[usize; 3]> {
    WIN_LINES.iter().copied().find(|&[a, b, c]| match cells[a] {
        Some(symbol) => cells[b] == Some(symbol) && cells[c] == Some(symbol),
        None => false,
    })
}

/// 检测连线获胜方
pub fn detect_line(cells: &[Cell; CELL_COUNT]) -> Option<Symbol> {
    winning_line(cells).and_then(|[a, _, _]| cells[a])
}

/// 终局判定：连线 > 下满 > 进行中
pub fn classify(board: &Board) -> BoardStatus {
    if let Some(symbol) = detect_line(board.cells()) {
        BoardStatus::Won(symbol)
    } else if board.is_full() {
        BoardStatus::Drawn
    } else {
        BoardStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Cell = Some(Symbol::First);
    const O: Cell = Some(Symbol::Second);
    const E: Cell = None;

    #[test]
    fn test_every_line_wins() {
        for line in WIN_LINES {
            for symbol in [Symbol::First, Symbol::Second] {
                let mut board = Board::empty();
                for index in line {
                    board.set(index, Some(symbol));
                }
                // 另一方随便放一子，不影响结果
                let other = (0..9).find(|i| !line.contains(i)).unwrap();
                board.set(other, Some(symbol.opponent()));

                assert_eq!(classify(&board), BoardStatus::Won(symbol));
                assert_eq!(winning_line(board.cells()), Some(line));
            }
        }
    }

    /// 按行、列、对角线逐一检查，返回所有连线的持有方
    fn line_owners(cells: &[Cell; CELL_COUNT]) -> Vec<Symbol> {
        let at = |row: usize, col: usize| cells[row * 3 + col];
        let mut lines = Vec::new();
        for i in 0..3 {
            lines.push([at(i, 0), at(i, 1), at(i, 2)]);
            lines.push([at(0, i), at(1, i), at(2, i)]);
        }
        lines.push([at(0, 0), at(1, 1), at(2, 2)]);
        lines.push([at(0, 2), at(1, 1), at(2, 0)]);

        lines
            .into_iter()
            .filter_map(|[a, b, c]| if a.is_some() && a == b && b == c { a } else { None })
            .collect()
    }

    #[test]
    fn test_classify_all_boards() {
        let mut won = 0;
        let mut drawn = 0;
        let mut in_progress = 0;

        for code in 0..3usize.pow(CELL_COUNT as u32) {
            let mut cells = [E; CELL_COUNT];
            let mut rest = code;
            for cell in cells.iter_mut() {
                *cell = match rest % 3 {
                    0 => E,
                    1 => X,
                    _ => O,
                };
                rest /= 3;
            }

            let owners = line_owners(&cells);
            let board = Board::from_cells(cells);
            match classify(&board) {
                BoardStatus::Won(symbol) => {
                    assert!(owners.contains(&symbol), "{}", board);
                    assert_eq!(detect_line(&cells), Some(symbol));
                    won += 1;
                }
                BoardStatus::Drawn => {
                    assert!(owners.is_empty() && cells.iter().all(Option::is_some), "{}", board);
                    assert_eq!(winning_line(&cells), None);
                    drawn += 1;
                }
                BoardStatus::InProgress => {
                    assert!(owners.is_empty() && cells.contains(&E), "{}", board);
                    assert_eq!(winning_line(&cells), None);
                    in_progress += 1;
                }
            }
        }

        assert_eq!((won, drawn, in_progress), (8558, 32, 11093));
    }

    #[test]
    fn test_win_on_full_board_is_not_draw() {
        let board = Board::from_cells([X, X, X, O, O, X, X, O, O]);
        assert_eq!(classify(&board), BoardStatus::Won(Symbol::First));
    }

    #[test]
    fn test_first_line_in_order_wins() {
        // 非法局面：双方各有一条连线，按固定顺序先找到第一行
        let cells = [O, O, O, X, X, X, E, E, E];
        assert_eq!(detect_line(&cells), Some(Symbol::Second));
        assert_eq!(winning_line(&cells), Some([0, 1, 2]));

        // 同一方两条线：返回列之前的行
        let cells = [X, X, X, X, O, O, X, O, E];
        assert_eq!(winning_line(&cells), Some([0, 1, 2]));
    }

    #[test]
    fn test_classify_is_pure() {
        let board = Board::from_cells([X, O, X, E, O, E, E, E, E]);
        let before = board;
        let first = (classify(&board), winning_line(board.cells()));
        let second = (classify(&board), winning_line(board.cells()));
        assert_eq!(first, second);
        assert_eq!(board, before);
    }
}
