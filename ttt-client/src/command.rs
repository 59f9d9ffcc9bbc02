//! 终端命令解析
//!
//! 格子和棋盘编号对玩家显示为 1-9，内部转换为 0-8。

use std::str::FromStr;

use thiserror::Error;
use ttt_rules::{Difficulty, ParseError, Symbol, UltimateMove};

use crate::session::{GameMode, PlayerMove};

/// 命令解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {command:?}")]
    Unknown { command: String },

    #[error("Index must be 1-9, got {value:?}")]
    InvalidIndex { value: String },

    #[error("Missing argument for {command:?}")]
    MissingArgument { command: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// 终端命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start(GameMode),
    Play(PlayerMove),
    Difficulty(Difficulty),
    Symbol(Symbol),
    Scores,
    Reset,
    Help,
    Quit,
}

/// 命令帮助
pub const HELP: &str = "\
命令:
  classic | ultimate      开始经典/超级模式对局
  <格子>                  经典模式落子（1-9）
  <棋盘> <格子>           超级模式落子（均为 1-9）
  difficulty <难度>       设置难度（easy/medium/hard）
  symbol <x|o>            设置玩家符号（下一局生效）
  scores                  查看比分
  reset                   回到菜单
  help                    显示帮助
  quit                    退出";

fn parse_index(value: &str) -> Result<usize, CommandError> {
    match value.parse::<usize>() {
        Ok(n @ 1..=9) => Ok(n - 1),
        _ => Err(CommandError::InvalidIndex {
            value: value.to_string(),
        }),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        let argument = |command: &str| {
            args.first().copied().ok_or_else(|| CommandError::MissingArgument {
                command: command.to_string(),
            })
        };

        // 数字开头的是落子
        if head.starts_with(|c: char| c.is_ascii_digit()) {
            return match args {
                [] => Ok(Command::Play(PlayerMove::Classic(parse_index(head)?))),
                [cell] => Ok(Command::Play(PlayerMove::Ultimate(UltimateMove::new(
                    parse_index(head)?,
                    parse_index(cell)?,
                )))),
                _ => Err(CommandError::Unknown {
                    command: line.trim().to_string(),
                }),
            };
        }

        match head.to_ascii_lowercase().as_str() {
            "classic" | "c" => Ok(Command::Start(GameMode::Classic)),
            "ultimate" | "u" => Ok(Command::Start(GameMode::Ultimate)),
            "difficulty" | "d" => Ok(Command::Difficulty(argument("difficulty")?.parse()?)),
            "symbol" | "s" => Ok(Command::Symbol(argument("symbol")?.parse()?)),
            "scores" => Ok(Command::Scores),
            "reset" | "r" => Ok(Command::Reset),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown {
                command: other.to_string(),
            }),
        }
    }
}
