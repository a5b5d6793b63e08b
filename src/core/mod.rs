//! Core logger types and traits

pub mod config;
pub mod error;
pub mod formatter;
pub mod log_format;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use formatter::{readable_file_name, LogFormatter};
pub use log_format::{Attribute, LogFormat};
pub use log_level::LogLevel;
pub use log_record::{bare_file_name, CallSite, LogRecord};
pub use logger::{ErrorCallback, Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use timestamp::{DateFormatter, LdmlDateFormatter, SharedDateFormatter, StrftimeDateFormatter};
