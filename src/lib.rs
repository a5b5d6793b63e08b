//! # Timber Log
//!
//! A small, configurable logging library: calls are filtered by severity,
//! rendered through a user-defined template, and written to stdout or any
//! byte sink by a single ordered worker per logger.
//!
//! ## Features
//!
//! - **Level gating**: a global minimum level plus per-file overrides
//! - **Templates**: printf-style templates filled from call-site attributes
//! - **Ordered output**: one FIFO worker per logger, or synchronous writes
//! - **Shared logger**: a replaceable process-wide default instance
//!
//! ```
//! use timber_log::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .format(LogFormat::with_attributes("%s %s", vec![Attribute::Level, Attribute::Message]))
//!     .sink(sink.clone())
//!     .build();
//!
//! timber_log::info!(logger => "cache warmed", 128, "entries");
//! logger.flush().unwrap();
//! assert_eq!(sink.contents(), "INFO cache warmed, 128, entries\n");
//! ```

pub mod core;
pub mod macros;
pub mod shared;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Attribute, CallSite, DateFormatter, LdmlDateFormatter, LogFormat, LogFormatter, LogLevel,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result,
        StrftimeDateFormatter, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, Sink, WriterSink};
}

pub use crate::core::{
    Attribute, CallSite, DateFormatter, ErrorCallback, LdmlDateFormatter, LogFormat, LogFormatter,
    LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result,
    SharedDateFormatter, StrftimeDateFormatter, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{ConsoleSink, FileSink, MemorySink, Sink, WriterSink};
