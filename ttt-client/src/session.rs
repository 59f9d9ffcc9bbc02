//! 对局会话
//!
//! 持有当前对局、计分板和 AI 的延迟落子任务。AI 在独立的 tokio 任务中等待思考延迟、
//! 计算走法，再通过通道把结果送回；会话用代数（generation）丢弃过期结果。

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use ttt_ai::{AiConfig, AiEngine};
use ttt_rules::{
    ActiveBoard, ClassicPhase, ClassicState, Difficulty, MoveError, Symbol, UltimateMove,
    UltimatePhase, UltimateState,
};

use crate::score::{Outcome, Scoreboard};
use crate::settings::GameSettings;

/// 游戏模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// 经典 3x3
    #[default]
    Classic,
    /// 超级井字棋（9 个小棋盘）
    Ultimate,
}

impl GameMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            GameMode::Classic => "经典模式",
            GameMode::Ultimate => "超级模式",
        }
    }
}

/// 会话错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No game in progress")]
    NoGame,

    #[error("Move does not match the current game mode")]
    ModeMismatch,

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// 一步走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerMove {
    Classic(usize),
    Ultimate(UltimateMove),
}

/// 当前对局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    Classic(ClassicState),
    Ultimate(UltimateState),
}

impl Game {
    pub fn new(mode: GameMode, human: Symbol) -> Self {
        match mode {
            GameMode::Classic => Game::Classic(ClassicState::new(human)),
            GameMode::Ultimate => Game::Ultimate(UltimateState::new(human)),
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            Game::Classic(_) => GameMode::Classic,
            Game::Ultimate(_) => GameMode::Ultimate,
        }
    }

    pub fn human(&self) -> Symbol {
        match self {
            Game::Classic(state) => state.human(),
            Game::Ultimate(state) => state.human(),
        }
    }

    pub fn is_player_turn(&self) -> bool {
        match self {
            Game::Classic(state) => state.phase() == ClassicPhase::PlayerTurn,
            Game::Ultimate(state) => matches!(state.phase(), UltimatePhase::PlayerTurn(_)),
        }
    }

    pub fn is_ai_turn(&self) -> bool {
        match self {
            Game::Classic(state) => state.phase() == ClassicPhase::AiTurn,
            Game::Ultimate(state) => matches!(state.phase(), UltimatePhase::AiTurn(_)),
        }
    }

    pub fn is_over(&self) -> bool {
        match self {
            Game::Classic(state) => state.phase().is_over(),
            Game::Ultimate(state) => state.phase().is_over(),
        }
    }

    /// 对局结果，未结束时为 `None`
    pub fn outcome(&self) -> Option<Outcome> {
        let winner = match self {
            Game::Classic(state) => match state.phase() {
                ClassicPhase::Won(symbol) => Some(symbol),
                ClassicPhase::Drawn => None,
                _ => return None,
            },
            Game::Ultimate(state) => match state.phase() {
                UltimatePhase::Won(symbol) => Some(symbol),
                UltimatePhase::Drawn => None,
                _ => return None,
            },
        };
        Some(Outcome::from_winner(winner, self.human()))
    }

    /// 获胜连线（经典模式为格子下标，超级模式为小棋盘下标）
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        match self {
            Game::Classic(state) => state.winning_line(),
            Game::Ultimate(state) => state.winning_line(),
        }
    }

    /// 执行走法，返回新对局
    pub fn apply(&self, mv: PlayerMove) -> Result<Game, SessionError> {
        match (self, mv) {
            (Game::Classic(state), PlayerMove::Classic(cell)) => {
                Ok(Game::Classic(state.apply_move(cell)?))
            }
            (Game::Ultimate(state), PlayerMove::Ultimate(mv)) => {
                Ok(Game::Ultimate(state.apply_move(mv)?))
            }
            _ => Err(SessionError::ModeMismatch),
        }
    }
}

/// AI 计算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiReply {
    /// 发起计算时的会话代数
    pub generation: u64,
    pub mv: PlayerMove,
}

/// 会话事件（供前端刷新）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// 落子完成，对局继续
    Moved { mv: PlayerMove, by_ai: bool },
    /// 落子后对局结束
    Finished {
        mv: PlayerMove,
        by_ai: bool,
        outcome: Outcome,
    },
}

/// 对局会话
///
/// 调度 AI 会 spawn tokio 任务，需在 tokio 运行时内调用 [`GameSession::start`] 和
/// [`GameSession::play`]。
pub struct GameSession {
    settings: GameSettings,
    difficulty: Difficulty,
    human: Symbol,
    game: Option<Game>,
    scores: Scoreboard,
    /// 每次重开、重置或发起 AI 计算时递增
    generation: u64,
    pending: Option<JoinHandle<()>>,
    replies: mpsc::UnboundedSender<AiReply>,
    rng: ChaCha8Rng,
}

impl GameSession {
    /// 创建会话，返回 AI 结果的接收端
    pub fn new(settings: GameSettings) -> (Self, mpsc::UnboundedReceiver<AiReply>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let rng = match settings.ai_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let session = Self {
            difficulty: settings.default_difficulty,
            human: settings.human_symbol,
            settings,
            game: None,
            scores: Scoreboard::default(),
            generation: 0,
            pending: None,
            replies: tx,
            rng,
        };
        (session, rx)
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn scores(&self) -> &Scoreboard {
        &self.scores
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// 设置难度，从下一次 AI 计算起生效
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!("难度设置为 {}", difficulty.display_name());
        self.difficulty = difficulty;
    }

    pub fn human(&self) -> Symbol {
        self.human
    }

    /// 设置玩家符号，从下一局起生效
    pub fn set_human(&mut self, symbol: Symbol) {
        self.human = symbol;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// AI 是否正在思考
    pub fn is_ai_thinking(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// 开始新对局（取消未完成的 AI 计算）
    pub fn start(&mut self, mode: GameMode) {
        self.cancel_pending();
        let game = Game::new(mode, self.human);
        info!(
            "新对局: {}，难度 {}，玩家执 {}",
            mode.display_name(),
            self.difficulty.display_name(),
            self.human
        );
        self.game = Some(game);
        self.schedule_ai();
    }

    /// 回到菜单（取消未完成的 AI 计算，计分保留）
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.game = None;
        debug!("会话已重置");
    }

    /// 玩家落子
    ///
    /// 非法走法返回错误，对局保持不变。
    pub fn play(&mut self, mv: PlayerMove) -> Result<SessionEvent, SessionError> {
        let game = self.game.ok_or(SessionError::NoGame)?;
        if game.is_over() {
            return Err(MoveError::GameOver.into());
        }
        if !game.is_player_turn() {
            return Err(MoveError::NotYourTurn.into());
        }

        let next = game.apply(mv)?;
        Ok(self.commit(next, mv, false))
    }

    /// 处理 AI 计算结果
    ///
    /// 代数不符或已不是 AI 回合的结果被丢弃，返回 `None`。
    pub fn handle_ai_reply(&mut self, reply: AiReply) -> Option<SessionEvent> {
        if reply.generation != self.generation {
            warn!("AI 计算期间对局已改变，丢弃 AI 走法: {:?}", reply.mv);
            return None;
        }

        let game = self.game?;
        if !game.is_ai_turn() {
            warn!("当前不是 AI 回合，丢弃 AI 走法: {:?}", reply.mv);
            return None;
        }
        self.pending = None;

        match game.apply(reply.mv) {
            Ok(next) => Some(self.commit(next, reply.mv, true)),
            Err(e) => {
                error!("AI 走法不合法: {:?}: {}", reply.mv, e);
                None
            }
        }
    }

    /// 保存新状态，结束时计分，轮到 AI 时调度
    fn commit(&mut self, next: Game, mv: PlayerMove, by_ai: bool) -> SessionEvent {
        self.game = Some(next);

        if let Some(outcome) = next.outcome() {
            self.scores.record(outcome);
            info!(
                "游戏结束: {:?}，比分 玩家 {} / AI {} / 平局 {}",
                outcome, self.scores.player, self.scores.ai, self.scores.draws
            );
            return SessionEvent::Finished { mv, by_ai, outcome };
        }

        self.schedule_ai();
        SessionEvent::Moved { mv, by_ai }
    }

    fn cancel_pending(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
            debug!("已取消未完成的 AI 计算");
        }
    }

    /// 轮到 AI 时启动延迟计算任务
    fn schedule_ai(&mut self) {
        let Some(game) = self.game else {
            return;
        };
        if !game.is_ai_turn() {
            return;
        }

        self.cancel_pending();
        let generation = self.generation;
        let delay = self.settings.ai_delay(game.mode());
        let config = AiConfig::from_difficulty(self.difficulty);
        let seed: u64 = self.rng.gen();
        let replies = self.replies.clone();

        debug!("AI 思考中... 代数 {}，延迟 {:?}", generation, delay);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // 搜索放到阻塞线程池，不占用异步工作线程
            let computed = tokio::task::spawn_blocking(move || {
                let mut engine = AiEngine::seeded(config, seed);
                compute_ai_move(&mut engine, &game)
            })
            .await;

            let mv = match computed {
                Ok(mv) => mv,
                Err(e) => {
                    error!("AI 计算失败: {}", e);
                    return;
                }
            };
            if replies.send(AiReply { generation, mv }).is_err() {
                debug!("会话已关闭，丢弃 AI 走法");
            }
        }));
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// 为轮到 AI 的对局计算走法
fn compute_ai_move<R: Rng>(engine: &mut AiEngine<R>, game: &Game) -> PlayerMove {
    match game {
        Game::Classic(state) => {
            PlayerMove::Classic(engine.choose_move(state.board(), state.ai(), state.human()))
        }
        Game::Ultimate(state) => {
            let active = state.active_board().unwrap_or(ActiveBoard::Any);
            PlayerMove::Ultimate(engine.choose_ultimate_move(state.board(), active, state.ai()))
        }
    }
}
