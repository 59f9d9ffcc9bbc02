//! 游戏设置模块
//!
//! 提供设置数据结构和持久化（JSON，存放在系统配置目录）

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use ttt_rules::{Difficulty, Symbol};

use crate::session::GameMode;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// tracing 过滤指令
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// 游戏设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// 默认 AI 难度
    pub default_difficulty: Difficulty,
    /// 玩家符号（X 先手）
    pub human_symbol: Symbol,
    /// 默认模式
    pub default_mode: GameMode,
    /// 经典模式 AI 思考延迟（毫秒）
    pub classic_ai_delay_ms: u64,
    /// 超级模式 AI 思考延迟（毫秒）
    pub ultimate_ai_delay_ms: u64,
    /// AI 随机数种子，`None` 使用系统熵
    pub ai_seed: Option<u64>,
    /// 日志级别
    pub log_level: LogLevel,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::Medium,
            human_symbol: Symbol::First,
            default_mode: GameMode::Classic,
            classic_ai_delay_ms: 500,
            ultimate_ai_delay_ms: 600,
            ai_seed: None,
            log_level: LogLevel::default(),
        }
    }
}

impl GameSettings {
    /// 获取设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("tic-tac-toe");
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// 从指定文件加载设置，失败时使用默认设置
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("已加载设置: {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("设置文件格式无效: {}，使用默认设置", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("无法读取设置文件: {}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 保存设置到默认位置
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().context("无法获取配置目录")?;
        self.save_to(&path)
    }

    /// 保存设置到指定文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        std::fs::write(path, content)
            .with_context(|| format!("写入设置文件失败: {:?}", path))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }

    /// 指定模式的 AI 思考延迟
    pub fn ai_delay(&self, mode: GameMode) -> Duration {
        match mode {
            GameMode::Classic => Duration::from_millis(self.classic_ai_delay_ms),
            GameMode::Ultimate => Duration::from_millis(self.ultimate_ai_delay_ms),
        }
    }
}
