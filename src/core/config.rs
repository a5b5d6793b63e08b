//! Declarative logger configuration
//!
//! [`LoggerConfig`] mirrors the settings of a [`Logger`](super::Logger) and can
//! be loaded from JSON. Every field is optional; missing fields take the
//! logger defaults.
//!
//! ```
//! use timber_log::{LogLevel, LoggerConfig};
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "min_level": "Info",
//!     "separator": " ",
//!     "format": { "template": "[%s] %s", "attributes": ["Level", "Message"] },
//!     "file_levels": { "src/net/client.rs": "Error" }
//! }"#).unwrap();
//!
//! assert_eq!(config.min_level, LogLevel::Info);
//! assert_eq!(config.file_levels["src/net/client.rs"], LogLevel::Error);
//! ```

use super::error::{LoggerError, Result};
use super::log_format::LogFormat;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_TERMINATOR: &str = "\n";
pub const DEFAULT_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub enabled: bool,
    pub min_level: LogLevel,
    pub terminator: String,
    pub separator: String,
    pub use_current_thread: bool,
    pub format: LogFormat,
    /// Per-file thresholds; keys may be paths or bare file names
    pub file_levels: BTreeMap<String, LogLevel>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_level: LogLevel::Debug,
            terminator: DEFAULT_TERMINATOR.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            use_current_thread: false,
            format: LogFormat::default(),
            file_levels: BTreeMap::new(),
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
