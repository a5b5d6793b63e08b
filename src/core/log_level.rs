//! Log level definitions
//!
//! Levels are ordered `All < Debug < Trace < Info < Warn < Error < Fatal < Off`.
//! A message at level `p` passes a threshold `q` iff `p >= q`, so `All` lets
//! everything through and `Off` silences everything.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    All = 0,
    #[default]
    Debug = 1,
    Trace = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Fatal = 6,
    Off = 7,
}

impl LogLevel {
    /// Every level, in rank order.
    pub const ALL_LEVELS: [LogLevel; 8] = [
        LogLevel::All,
        LogLevel::Debug,
        LogLevel::Trace,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Off,
    ];

    /// Look up a level by its rank. Ranks outside `0..=7` yield `None`.
    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL_LEVELS.get(usize::from(rank)).copied()
    }

    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Canonical capitalized name, e.g. `"Warn"`.
    pub fn describe(&self) -> &'static str {
        match self {
            LogLevel::All => "All",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
            LogLevel::Info => "Info",
            LogLevel::Warn => "Warn",
            LogLevel::Error => "Error",
            LogLevel::Fatal => "Fatal",
            LogLevel::Off => "Off",
        }
    }

    /// Uppercase name as it appears in rendered log lines.
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::All => "ALL",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Off => "OFF",
        }
    }

    /// Whether a message at this level passes `threshold`.
    #[inline]
    pub fn permits(&self, threshold: LogLevel) -> bool {
        *self >= threshold
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = LoggerError;

    fn try_from(rank: u8) -> Result<Self, LoggerError> {
        Self::from_rank(rank).ok_or(LoggerError::InvalidLevelRank { rank })
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, LoggerError> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(LogLevel::All),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            "OFF" => Ok(LogLevel::Off),
            _ => Err(LoggerError::InvalidLevelName(s.to_string())),
        }
    }
}
