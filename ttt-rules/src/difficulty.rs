//! AI 难度

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// AI 难度
///
/// 难度决定 AI 放弃思考、随机落子的概率。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单：经典 60%、超级 70% 随机
    Easy,
    /// 中等：经典 30%、超级 40% 随机
    #[default]
    Medium,
    /// 困难：经典从不随机、超级 10% 随机
    Hard,
}

impl Difficulty {
    /// 经典模式下随机落子的概率
    pub fn classic_random_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.0,
        }
    }

    /// 超级模式下随机落子的概率
    pub fn ultimate_random_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Medium => 0.4,
            Difficulty::Hard => 0.1,
        }
    }

    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Medium => "中等",
            Difficulty::Hard => "困难",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseError::UnknownDifficulty {
                value: s.trim().to_string(),
            }),
        }
    }
}
