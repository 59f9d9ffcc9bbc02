//! 搜索引擎
//!
//! 经典模式的 Minimax + Alpha-Beta 剪枝。棋盘最多 9 层，直接穷举，不做置换表。

use ttt_rules::{classify, Board, BoardStatus, Symbol, CELL_COUNT};

/// 胜局基础分：AI 胜为 `WIN_SCORE - depth`，AI 负为 `depth - WIN_SCORE`
///
/// 深度项让 AI 偏向更快的胜利和更慢的失败。
pub const WIN_SCORE: i32 = 10;

/// Minimax 搜索器
#[derive(Debug, Default)]
pub struct Minimax {
    nodes_searched: u64,
}

impl Minimax {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 评估局面
    ///
    /// 在棋盘副本上搜索，传入的棋盘不会被修改。
    #[allow(clippy::too_many_arguments)]
    pub fn search(
        &mut self,
        board: &Board,
        depth: i32,
        maximizing: bool,
        alpha: i32,
        beta: i32,
        ai: Symbol,
        human: Symbol,
    ) -> i32 {
        let mut work = *board;
        self.alpha_beta(&mut work, depth, maximizing, alpha, beta, ai, human)
    }

    /// 搜索最佳落点
    ///
    /// 依次尝试每个空格，分数相同时取下标最小者。
    ///
    /// # Panics
    ///
    /// 棋盘已终局（获胜或下满）时调用属于编程错误。
    pub fn best_move(&mut self, board: &Board, ai: Symbol, human: Symbol) -> usize {
        let candidates = board.empty_cells();
        assert!(
            !candidates.is_empty() && !classify(board).is_terminal(),
            "best_move called on a finished board: {}",
            board
        );

        let mut work = *board;
        let mut best_cell = candidates[0];
        let mut best_score = i32::MIN;

        for cell in candidates {
            work.set(cell, Some(ai));
            // 落子后轮到对手，对手取最小值
            let score = self.alpha_beta(&mut work, 0, false, i32::MIN, i32::MAX, ai, human);
            work.set(cell, None);

            if score > best_score {
                best_score = score;
                best_cell = cell;
            }
        }

        best_cell
    }

    /// Alpha-Beta 搜索（在工作副本上落子、撤销）
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        ai: Symbol,
        human: Symbol,
    ) -> i32 {
        self.nodes_searched += 1;

        match classify(board) {
            BoardStatus::Won(winner) if winner == ai => return WIN_SCORE - depth,
            BoardStatus::Won(_) => return depth - WIN_SCORE,
            BoardStatus::Drawn => return 0,
            BoardStatus::InProgress => {}
        }

        if maximizing {
            let mut max_eval = i32::MIN;
            for cell in 0..CELL_COUNT {
                if !board.is_empty_at(cell) {
                    continue;
                }
                board.set(cell, Some(ai));
                let eval = self.alpha_beta(board, depth + 1, false, alpha, beta, ai, human);
                board.set(cell, None);

                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break; // Beta 剪枝
                }
            }
            max_eval
        } else {
            let mut min_eval = i32::MAX;
            for cell in 0..CELL_COUNT {
                if !board.is_empty_at(cell) {
                    continue;
                }
                board.set(cell, Some(human));
                let eval = self.alpha_beta(board, depth + 1, true, alpha, beta, ai, human);
                board.set(cell, None);

                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break; // Alpha 剪枝
                }
            }
            min_eval
        }
    }
}

/// 评估局面（见 [`Minimax::search`]）
pub fn search(
    board: &Board,
    depth: i32,
    maximizing: bool,
    alpha: i32,
    beta: i32,
    ai: Symbol,
    human: Symbol,
) -> i32 {
    Minimax::new().search(board, depth, maximizing, alpha, beta, ai, human)
}

/// 搜索最佳落点（见 [`Minimax::best_move`]）
pub fn best_move(board: &Board, ai: Symbol, human: Symbol) -> usize {
    Minimax::new().best_move(board, ai, human)
}
