//! 终端渲染

use std::fmt::Write;

use ttt_rules::{
    ActiveBoard, Board, ClassicState, SubResult, UltimatePhase, UltimateState,
    BOARD_SIDE,
};

use crate::score::Scoreboard;
use crate::session::Game;

/// 单个格子：空格显示编号（1-9），获胜连线上的棋子加方括号
fn cell_text(board: &Board, index: usize, line: Option<[usize; 3]>) -> String {
    match board.get(index) {
        Some(symbol) if line.is_some_and(|l| l.contains(&index)) => format!("[{}]", symbol),
        Some(symbol) => format!(" {} ", symbol),
        None => format!(" {} ", index + 1),
    }
}

/// 经典棋盘
pub fn render_classic(state: &ClassicState) -> String {
    let line = state.winning_line();
    let mut out = String::new();
    for row in 0..BOARD_SIDE {
        if row > 0 {
            out.push_str("---+---+---\n");
        }
        let cells: Vec<String> = (0..BOARD_SIDE)
            .map(|col| cell_text(state.board(), row * BOARD_SIDE + col, line))
            .collect();
        out.push_str(&cells.join("|"));
        out.push('\n');
    }
    out
}

/// 超级棋盘
///
/// 已决出胜负的小棋盘整块显示胜方符号，平局显示 `#`，空格显示 `.`。
pub fn render_ultimate(state: &UltimateState) -> String {
    let board = state.board();
    let mut out = String::new();

    for big_row in 0..BOARD_SIDE {
        if big_row > 0 {
            out.push_str("------+-------+------\n");
        }
        for small_row in 0..BOARD_SIDE {
            let mut parts = Vec::with_capacity(BOARD_SIDE);
            for big_col in 0..BOARD_SIDE {
                let index = big_row * BOARD_SIDE + big_col;
                let sub = board.boards()[index];
                let chars: Vec<String> = (0..BOARD_SIDE)
                    .map(|small_col| {
                        let cell = small_row * BOARD_SIDE + small_col;
                        match board.result(index) {
                            SubResult::Won(symbol) => symbol.to_string(),
                            SubResult::Drawn => "#".to_string(),
                            SubResult::Open => sub
                                .get(cell)
                                .map_or_else(|| ".".to_string(), |s| s.to_string()),
                        }
                    })
                    .collect();
                parts.push(chars.join(" "));
            }
            let _ = writeln!(out, "{}", parts.join(" | "));
        }
    }

    if let Some(line) = state.winning_line() {
        let boards: Vec<String> = line.iter().map(|i| (i + 1).to_string()).collect();
        let _ = writeln!(out, "获胜连线: 棋盘 {}", boards.join("-"));
    }
    out
}

fn active_text(active: ActiveBoard) -> String {
    match active {
        ActiveBoard::Any => "选择任意格子".to_string(),
        ActiveBoard::Board(index) => format!("请在棋盘 {} 下棋", index + 1),
    }
}

/// 状态提示
pub fn status_line(game: &Game, ai_thinking: bool) -> String {
    if let Some(outcome) = game.outcome() {
        return outcome.message().to_string();
    }
    if game.is_ai_turn() {
        return if ai_thinking {
            "AI 思考中...".to_string()
        } else {
            "AI 回合".to_string()
        };
    }

    match game {
        Game::Classic(state) => format!("你的回合 ({})", state.human()),
        Game::Ultimate(state) => match state.phase() {
            UltimatePhase::PlayerTurn(_) => {
                let active = state.active_board().unwrap_or(ActiveBoard::Any);
                format!("你的回合 ({}) - {}", state.human(), active_text(active))
            }
            _ => String::new(),
        },
    }
}

/// 棋盘加状态提示
pub fn render_game(game: &Game, ai_thinking: bool) -> String {
    let board = match game {
        Game::Classic(state) => render_classic(state),
        Game::Ultimate(state) => render_ultimate(state),
    };
    format!("{}{}\n", board, status_line(game, ai_thinking))
}

pub fn render_scores(scores: &Scoreboard) -> String {
    format!(
        "比分 - 玩家: {}  AI: {}  平局: {}",
        scores.player, scores.ai, scores.draws
    )
}
