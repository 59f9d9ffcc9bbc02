//! 井字棋终端客户端
//!
//! 核心库之外的表现层:
//! - 游戏设置（持久化到配置目录）
//! - 计分板
//! - 对局会话（AI 延迟落子，重开时取消）
//! - 命令解析与终端渲染

pub mod command;
pub mod render;
pub mod score;
pub mod session;
pub mod settings;

pub use command::{Command, CommandError};
pub use score::{Outcome, Scoreboard};
pub use session::{AiReply, Game, GameMode, GameSession, PlayerMove, SessionError, SessionEvent};
pub use settings::{GameSettings, LogLevel};
