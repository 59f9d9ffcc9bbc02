//! 超级模式（九宫嵌套）对局状态机
//!
//! 大棋盘由 9 个小棋盘组成。落子所在的格子下标决定对手下一步必须进入的小棋盘；
//! 该小棋盘已结束或已下满时，对手可在任意未结束的小棋盘落子。

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardStatus, Cell};
use crate::constants::{BOARD_COUNT, CELL_COUNT};
use crate::error::MoveError;
use crate::lines::{classify, detect_line, winning_line};
use crate::symbol::Symbol;

/// 小棋盘结果
///
/// 平局单独标记，不与任何符号混淆。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubResult {
    /// 未结束
    #[default]
    Open,
    /// 某方获胜
    Won(Symbol),
    /// 平局
    Drawn,
}

impl SubResult {
    /// 是否已结束
    pub fn is_closed(&self) -> bool {
        !matches!(self, SubResult::Open)
    }

    /// 作为大棋盘格子时的取值：平局不属于任何一方
    pub fn as_meta_cell(&self) -> Cell {
        match self {
            SubResult::Won(symbol) => Some(*symbol),
            SubResult::Open | SubResult::Drawn => None,
        }
    }

    fn from_status(status: BoardStatus) -> Self {
        match status {
            BoardStatus::InProgress => SubResult::Open,
            BoardStatus::Won(symbol) => SubResult::Won(symbol),
            BoardStatus::Drawn => SubResult::Drawn,
        }
    }
}

/// 下一步允许落子的小棋盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActiveBoard {
    /// 任意未结束的小棋盘
    #[default]
    Any,
    /// 指定的小棋盘
    Board(usize),
}

impl ActiveBoard {
    /// 是否允许在指定小棋盘落子
    pub fn permits(&self, board: usize) -> bool {
        match self {
            ActiveBoard::Any => true,
            ActiveBoard::Board(index) => *index == board,
        }
    }
}

/// 超级模式走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UltimateMove {
    /// 小棋盘下标
    pub board: usize,
    /// 小棋盘内的格子下标
    pub cell: usize,
}

impl UltimateMove {
    pub fn new(board: usize, cell: usize) -> Self {
        Self { board, cell }
    }
}

/// 大棋盘：9 个小棋盘及其结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UltimateBoard {
    boards: [Board; BOARD_COUNT],
    results: [SubResult; BOARD_COUNT],
}

impl UltimateBoard {
    /// 创建空的大棋盘
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从小棋盘创建，结果由各小棋盘判定得出
    pub fn from_boards(boards: [Board; BOARD_COUNT]) -> Self {
        let results = boards.map(|board| SubResult::from_status(classify(&board)));
        Self { boards, results }
    }

    /// 直接指定小棋盘与结果（结果不做校验）
    pub fn from_parts(boards: [Board; BOARD_COUNT], results: [SubResult; BOARD_COUNT]) -> Self {
        Self { boards, results }
    }

    pub fn boards(&self) -> &[Board; BOARD_COUNT] {
        &self.boards
    }

    pub fn results(&self) -> &[SubResult; BOARD_COUNT] {
        &self.results
    }

    /// 获取小棋盘
    pub fn sub_board(&self, index: usize) -> Option<&Board> {
        self.boards.get(index)
    }

    /// 获取小棋盘结果（越界视为已结束的平局）
    pub fn result(&self, index: usize) -> SubResult {
        self.results.get(index).copied().unwrap_or(SubResult::Drawn)
    }

    /// 小棋盘是否还能落子：未结束且未下满
    pub fn is_board_playable(&self, index: usize) -> bool {
        index < BOARD_COUNT && !self.results[index].is_closed() && !self.boards[index].is_full()
    }

    /// 规整活动棋盘：指定的小棋盘已不可落子时放宽为任意
    pub fn normalize(&self, active: ActiveBoard) -> ActiveBoard {
        match active {
            ActiveBoard::Board(index) if !self.is_board_playable(index) => ActiveBoard::Any,
            other => other,
        }
    }

    /// 检查走法是否合法
    pub fn check_move(&self, mv: UltimateMove, active: ActiveBoard) -> Result<(), MoveError> {
        if mv.board >= BOARD_COUNT {
            return Err(MoveError::InvalidBoard { index: mv.board });
        }
        if mv.cell >= CELL_COUNT {
            return Err(MoveError::InvalidCell { index: mv.cell });
        }
        if self.results[mv.board].is_closed() {
            return Err(MoveError::BoardClosed { index: mv.board });
        }
        if let ActiveBoard::Board(expected) = self.normalize(active) {
            if expected != mv.board {
                return Err(MoveError::WrongBoard {
                    expected,
                    actual: mv.board,
                });
            }
        }
        if !self.boards[mv.board].is_empty_at(mv.cell) {
            return Err(MoveError::CellOccupied { index: mv.cell });
        }
        Ok(())
    }

    /// 走法是否合法
    pub fn is_playable(&self, mv: UltimateMove, active: ActiveBoard) -> bool {
        self.check_move(mv, active).is_ok()
    }

    /// 所有合法走法，按（小棋盘, 格子）升序
    pub fn legal_moves(&self, active: ActiveBoard) -> Vec<UltimateMove> {
        let active = self.normalize(active);
        (0..BOARD_COUNT)
            .filter(|&b| !self.results[b].is_closed() && active.permits(b))
            .flat_map(|b| {
                self.boards[b]
                    .empty_cells()
                    .into_iter()
                    .map(move |c| UltimateMove::new(b, c))
            })
            .collect()
    }

    /// 落子并更新该小棋盘的结果（不检查活动棋盘）
    pub fn place(&mut self, mv: UltimateMove, symbol: Symbol) -> Result<(), MoveError> {
        let board = self
            .boards
            .get_mut(mv.board)
            .ok_or(MoveError::InvalidBoard { index: mv.board })?;
        if self.results[mv.board].is_closed() {
            return Err(MoveError::BoardClosed { index: mv.board });
        }
        board.place(mv.cell, symbol)?;
        self.results[mv.board] = SubResult::from_status(classify(board));
        Ok(())
    }

    /// 大棋盘格子：获胜方为其符号，平局与未结束均为空
    pub fn meta_cells(&self) -> [Cell; BOARD_COUNT] {
        self.results.map(|result| result.as_meta_cell())
    }

    /// 大棋盘判定
    pub fn meta_status(&self) -> BoardStatus {
        if let Some(symbol) = detect_line(&self.meta_cells()) {
            BoardStatus::Won(symbol)
        } else if self.results.iter().all(SubResult::is_closed) {
            BoardStatus::Drawn
        } else {
            BoardStatus::InProgress
        }
    }

    /// 大棋盘获胜连线（用于高亮获胜的三个小棋盘）
    pub fn meta_winning_line(&self) -> Option<[usize; 3]> {
        winning_line(&self.meta_cells())
    }

    /// 在格子 `cell` 落子后，对手的活动棋盘
    pub fn next_active(&self, cell: usize) -> ActiveBoard {
        if self.is_board_playable(cell) {
            ActiveBoard::Board(cell)
        } else {
            ActiveBoard::Any
        }
    }
}

/// 超级模式对局阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UltimatePhase {
    /// 轮到玩家
    PlayerTurn(ActiveBoard),
    /// 轮到 AI
    AiTurn(ActiveBoard),
    /// 某方获胜
    Won(Symbol),
    /// 平局
    Drawn,
}

impl UltimatePhase {
    /// 是否已结束
    pub fn is_over(&self) -> bool {
        matches!(self, UltimatePhase::Won(_) | UltimatePhase::Drawn)
    }

    /// 当前活动棋盘，已结束时为 `None`
    pub fn active_board(&self) -> Option<ActiveBoard> {
        match self {
            UltimatePhase::PlayerTurn(active) | UltimatePhase::AiTurn(active) => Some(*active),
            UltimatePhase::Won(_) | UltimatePhase::Drawn => None,
        }
    }
}

/// 超级模式对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UltimateState {
    board: UltimateBoard,
    phase: UltimatePhase,
    human: Symbol,
}

impl UltimateState {
    /// 开局，X 先手，可在任意小棋盘落子
    pub fn new(human: Symbol) -> Self {
        let phase = if human == Symbol::First {
            UltimatePhase::PlayerTurn(ActiveBoard::Any)
        } else {
            UltimatePhase::AiTurn(ActiveBoard::Any)
        };
        Self {
            board: UltimateBoard::empty(),
            phase,
            human,
        }
    }

    /// 从任意局面恢复状态
    pub fn from_parts(board: UltimateBoard, phase: UltimatePhase, human: Symbol) -> Self {
        Self { board, phase, human }
    }

    pub fn board(&self) -> &UltimateBoard {
        &self.board
    }

    pub fn phase(&self) -> UltimatePhase {
        self.phase
    }

    pub fn human(&self) -> Symbol {
        self.human
    }

    pub fn ai(&self) -> Symbol {
        self.human.opponent()
    }

    /// 当前活动棋盘（已规整），已结束时为 `None`
    pub fn active_board(&self) -> Option<ActiveBoard> {
        self.phase
            .active_board()
            .map(|active| self.board.normalize(active))
    }

    /// 所有合法走法
    pub fn legal_moves(&self) -> Vec<UltimateMove> {
        match self.phase.active_board() {
            Some(active) => self.board.legal_moves(active),
            None => Vec::new(),
        }
    }

    /// 走法是否合法
    pub fn is_legal(&self, mv: UltimateMove) -> bool {
        match self.phase.active_board() {
            Some(active) => self.board.is_playable(mv, active),
            None => false,
        }
    }

    /// 落子并返回新状态
    pub fn apply_move(&self, mv: UltimateMove) -> Result<Self, MoveError> {
        let (mover, active) = match self.phase {
            UltimatePhase::PlayerTurn(active) => (self.human, active),
            UltimatePhase::AiTurn(active) => (self.ai(), active),
            UltimatePhase::Won(_) | UltimatePhase::Drawn => return Err(MoveError::GameOver),
        };

        if let Err(e) = self.board.check_move(mv, active) {
            tracing::debug!("拒绝非法走法 {:?}: {}", mv, e);
            return Err(e);
        }

        let mut board = self.board;
        board.place(mv, mover)?;

        let phase = match board.meta_status() {
            BoardStatus::Won(symbol) => UltimatePhase::Won(symbol),
            BoardStatus::Drawn => UltimatePhase::Drawn,
            BoardStatus::InProgress => {
                let next = board.next_active(mv.cell);
                if mover == self.human {
                    UltimatePhase::AiTurn(next)
                } else {
                    UltimatePhase::PlayerTurn(next)
                }
            }
        };

        Ok(Self {
            board,
            phase,
            human: self.human,
        })
    }

    /// 大棋盘获胜连线
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.board.meta_winning_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Symbol = Symbol::First;
    const O: Symbol = Symbol::Second;

    fn won_board(symbol: Symbol) -> Board {
        let mut board = Board::empty();
        for index in [0, 1, 2] {
            board.set(index, Some(symbol));
        }
        board
    }

    fn drawn_board() -> Board {
        "XOXXOOOXX".parse().unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = UltimateState::new(X);
        assert_eq!(state.phase(), UltimatePhase::PlayerTurn(ActiveBoard::Any));
        assert_eq!(state.legal_moves().len(), 81);

        let state = UltimateState::new(O);
        assert_eq!(state.phase(), UltimatePhase::AiTurn(ActiveBoard::Any));
    }

    #[test]
    fn test_meta_win() {
        let results = [
            SubResult::Won(X),
            SubResult::Won(X),
            SubResult::Won(X),
            SubResult::Open,
            SubResult::Open,
            SubResult::Open,
            SubResult::Open,
            SubResult::Open,
            SubResult::Open,
        ];
        let board = UltimateBoard::from_parts([Board::empty(); BOARD_COUNT], results);
        assert_eq!(board.meta_status(), BoardStatus::Won(X));
        assert_eq!(board.meta_winning_line(), Some([0, 1, 2]));
    }

    #[test]
    fn test_drawn_boards_never_form_meta_line() {
        let mut results = [SubResult::Open; BOARD_COUNT];
        results[0] = SubResult::Drawn;
        results[1] = SubResult::Drawn;
        results[2] = SubResult::Drawn;
        let board = UltimateBoard::from_parts([Board::empty(); BOARD_COUNT], results);
        assert_eq!(board.meta_cells()[0], None);
        assert_eq!(board.meta_status(), BoardStatus::InProgress);

        // 平局不能补齐连线
        results[1] = SubResult::Won(O);
        results[0] = SubResult::Won(O);
        let board = UltimateBoard::from_parts([Board::empty(); BOARD_COUNT], results);
        assert_eq!(board.meta_status(), BoardStatus::InProgress);
    }

    #[test]
    fn test_meta_draw_when_all_closed() {
        // X X O / O - X / X O X，中间为平局
        let results = [
            SubResult::Won(X),
            SubResult::Won(X),
            SubResult::Won(O),
            SubResult::Won(O),
            SubResult::Drawn,
            SubResult::Won(X),
            SubResult::Won(X),
            SubResult::Won(O),
            SubResult::Won(X),
        ];
        let board = UltimateBoard::from_parts([Board::empty(); BOARD_COUNT], results);
        assert_eq!(board.meta_status(), BoardStatus::Drawn);
    }

    #[test]
    fn test_last_open_board_drawn_ends_game() {
        // 其余小棋盘已结束且没有大棋盘连线，4 号棋盘只剩最后一格
        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[4] = "XOXXOOOX.".parse().unwrap();
        let results = [
            SubResult::Won(X),
            SubResult::Won(X),
            SubResult::Won(O),
            SubResult::Won(O),
            SubResult::Open,
            SubResult::Won(X),
            SubResult::Won(X),
            SubResult::Won(O),
            SubResult::Won(X),
        ];
        let board = UltimateBoard::from_parts(boards, results);
        assert_eq!(board.meta_status(), BoardStatus::InProgress);

        let state = UltimateState::from_parts(
            board,
            UltimatePhase::PlayerTurn(ActiveBoard::Board(4)),
            X,
        );
        let state = state.apply_move(UltimateMove::new(4, 8)).unwrap();
        assert_eq!(state.board().result(4), SubResult::Drawn);
        assert_eq!(state.phase(), UltimatePhase::Drawn);
        assert_eq!(state.winning_line(), None);
        assert_eq!(state.active_board(), None);
        assert!(state.legal_moves().is_empty());
        assert_eq!(
            state.apply_move(UltimateMove::new(4, 0)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_random_playouts_keep_invariants() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let (mut wins, mut draws) = (0, 0);

        for _ in 0..500 {
            let mut state = UltimateState::new(X);
            loop {
                let active = match state.phase() {
                    UltimatePhase::Won(winner) => {
                        assert_eq!(state.board().meta_status(), BoardStatus::Won(winner));
                        wins += 1;
                        break;
                    }
                    UltimatePhase::Drawn => {
                        assert!(state.board().results().iter().all(SubResult::is_closed));
                        draws += 1;
                        break;
                    }
                    UltimatePhase::PlayerTurn(active) | UltimatePhase::AiTurn(active) => active,
                };

                // 指定的小棋盘必须仍可落子，进行中总有合法走法
                if let ActiveBoard::Board(index) = active {
                    assert!(state.board().is_board_playable(index), "{}", state.board());
                }
                let legal = state.legal_moves();
                assert!(!legal.is_empty(), "{}", state.board());

                let mv = legal[rng.gen_range(0..legal.len())];
                state = state.apply_move(mv).unwrap();
            }
        }

        assert!(wins > 0);
        assert!(draws > 0);
    }

    #[test]
    fn test_next_board_follows_cell() {
        let state = UltimateState::new(X)
            .apply_move(UltimateMove::new(2, 5))
            .unwrap();
        assert_eq!(state.phase(), UltimatePhase::AiTurn(ActiveBoard::Board(5)));
        assert!(state.legal_moves().iter().all(|mv| mv.board == 5));
        assert_eq!(state.legal_moves().len(), 9);
    }

    #[test]
    fn test_next_board_widens_when_target_closed() {
        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[5] = won_board(O);
        let board = UltimateBoard::from_boards(boards);
        assert_eq!(board.result(5), SubResult::Won(O));

        let state = UltimateState::from_parts(board, UltimatePhase::PlayerTurn(ActiveBoard::Any), X);
        let state = state.apply_move(UltimateMove::new(2, 5)).unwrap();
        assert_eq!(state.phase(), UltimatePhase::AiTurn(ActiveBoard::Any));
        // 已结束的 5 号棋盘不在合法走法中
        assert!(state.legal_moves().iter().all(|mv| mv.board != 5));
    }

    #[test]
    fn test_next_board_widens_when_target_drawn() {
        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[3] = drawn_board();
        let board = UltimateBoard::from_boards(boards);
        assert_eq!(board.result(3), SubResult::Drawn);
        assert_eq!(board.next_active(3), ActiveBoard::Any);
        assert_eq!(board.next_active(4), ActiveBoard::Board(4));
    }

    #[test]
    fn test_sub_board_won_by_move() {
        // 赢下 4 号棋盘的同时，格子 8 指向仍开放的 8 号棋盘
        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[4] = "X...X....".parse().unwrap();
        let board = UltimateBoard::from_boards(boards);
        let state = UltimateState::from_parts(
            board,
            UltimatePhase::PlayerTurn(ActiveBoard::Board(4)),
            X,
        );
        let state = state.apply_move(UltimateMove::new(4, 8)).unwrap();
        assert_eq!(state.board().result(4), SubResult::Won(X));
        assert_eq!(state.phase(), UltimatePhase::AiTurn(ActiveBoard::Board(8)));

        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[4] = "XX.......".parse().unwrap();
        let board = UltimateBoard::from_boards(boards);
        let state = UltimateState::from_parts(
            board,
            UltimatePhase::PlayerTurn(ActiveBoard::Board(4)),
            X,
        );
        let state = state.apply_move(UltimateMove::new(4, 2)).unwrap();
        assert_eq!(state.board().result(4), SubResult::Won(X));
        // 格子 2 指向 2 号棋盘，仍然开放
        assert_eq!(state.phase(), UltimatePhase::AiTurn(ActiveBoard::Board(2)));
    }

    #[test]
    fn test_move_into_just_won_board_index() {
        // 在 4 号棋盘的格子 4 落子并赢下 4 号棋盘：对手不能进入 4 号棋盘
        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[4] = "X.......X".parse().unwrap();
        let board = UltimateBoard::from_boards(boards);
        let state = UltimateState::from_parts(
            board,
            UltimatePhase::PlayerTurn(ActiveBoard::Board(4)),
            X,
        );
        let state = state.apply_move(UltimateMove::new(4, 4)).unwrap();
        assert_eq!(state.phase(), UltimatePhase::AiTurn(ActiveBoard::Any));
    }

    #[test]
    fn test_illegal_moves_rejected() {
        let state = UltimateState::new(X)
            .apply_move(UltimateMove::new(0, 3))
            .unwrap();
        let before = state;

        assert_eq!(
            state.apply_move(UltimateMove::new(1, 0)),
            Err(MoveError::WrongBoard {
                expected: 3,
                actual: 1
            })
        );
        assert_eq!(
            state.apply_move(UltimateMove::new(9, 0)),
            Err(MoveError::InvalidBoard { index: 9 })
        );
        assert_eq!(
            state.apply_move(UltimateMove::new(3, 9)),
            Err(MoveError::InvalidCell { index: 9 })
        );
        assert_eq!(state, before);

        let state = state.apply_move(UltimateMove::new(3, 0)).unwrap();
        // 回到 0 号棋盘，格子 3 已被占
        assert_eq!(
            state.apply_move(UltimateMove::new(0, 3)),
            Err(MoveError::CellOccupied { index: 3 })
        );
    }

    #[test]
    fn test_closed_board_rejected() {
        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[6] = won_board(O);
        let board = UltimateBoard::from_boards(boards);
        let state = UltimateState::from_parts(board, UltimatePhase::PlayerTurn(ActiveBoard::Any), X);
        assert_eq!(
            state.apply_move(UltimateMove::new(6, 8)),
            Err(MoveError::BoardClosed { index: 6 })
        );
        assert!(!state.is_legal(UltimateMove::new(6, 8)));
    }

    #[test]
    fn test_stale_active_board_is_normalized() {
        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[1] = won_board(X);
        let board = UltimateBoard::from_boards(boards);
        let state = UltimateState::from_parts(board, UltimatePhase::AiTurn(ActiveBoard::Board(1)), X);
        assert_eq!(state.active_board(), Some(ActiveBoard::Any));
        assert_eq!(state.legal_moves().len(), 72);
    }

    #[test]
    fn test_meta_win_ends_game() {
        let mut boards = [Board::empty(); BOARD_COUNT];
        boards[0] = won_board(X);
        boards[1] = won_board(X);
        boards[2] = "XX.......".parse().unwrap();
        let board = UltimateBoard::from_boards(boards);
        let state = UltimateState::from_parts(
            board,
            UltimatePhase::PlayerTurn(ActiveBoard::Board(2)),
            X,
        );
        let state = state.apply_move(UltimateMove::new(2, 2)).unwrap();
        assert_eq!(state.phase(), UltimatePhase::Won(X));
        assert_eq!(state.winning_line(), Some([0, 1, 2]));
        assert!(state.legal_moves().is_empty());
        assert_eq!(
            state.apply_move(UltimateMove::new(5, 5)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_ai_move_hands_turn_to_player() {
        let state = UltimateState::new(O)
            .apply_move(UltimateMove::new(4, 0))
            .unwrap();
        assert_eq!(state.board().sub_board(4).unwrap().get(0), Some(X));
        assert_eq!(state.phase(), UltimatePhase::PlayerTurn(ActiveBoard::Board(0)));
    }

    #[test]
    fn test_serde_snapshot() {
        let state = UltimateState::new(X)
            .apply_move(UltimateMove::new(2, 5))
            .unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let restored: UltimateState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
