//! 玩家符号

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// 玩家符号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// 先手（X）
    First,
    /// 后手（O）
    Second,
}

impl Symbol {
    /// 获取对方符号
    pub fn opponent(&self) -> Symbol {
        match self {
            Symbol::First => Symbol::Second,
            Symbol::Second => Symbol::First,
        }
    }

    /// 获取记谱字符
    pub fn to_char(&self) -> char {
        match self {
            Symbol::First => 'X',
            Symbol::Second => 'O',
        }
    }

    /// 从记谱字符解析（不区分大小写）
    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            'X' | 'x' => Some(Symbol::First),
            'O' | 'o' => Some(Symbol::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::First => f.pad("X"),
            Symbol::Second => f.pad("O"),
        }
    }
}

impl FromStr for Symbol {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next().and_then(Symbol::from_char), chars.next()) {
            (Some(symbol), None) => Ok(symbol),
            _ => Err(ParseError::UnknownSymbol {
                value: trimmed.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Symbol::First.opponent(), Symbol::Second);
        assert_eq!(Symbol::Second.opponent(), Symbol::First);
    }

    #[test]
    fn test_char_conversion() {
        assert_eq!(Symbol::First.to_char(), 'X');
        assert_eq!(Symbol::Second.to_char(), 'O');
        assert_eq!(Symbol::from_char('x'), Some(Symbol::First));
        assert_eq!(Symbol::from_char('O'), Some(Symbol::Second));
        assert_eq!(Symbol::from_char('.'), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" o ".parse::<Symbol>(), Ok(Symbol::Second));
        assert_eq!(
            "xo".parse::<Symbol>(),
            Err(ParseError::UnknownSymbol {
                value: "xo".to_string()
            })
        );
        assert!("".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Symbol::First.to_string(), "X");
        assert_eq!(format!("[{:^3}]", Symbol::Second), "[ O ]");
    }
}
