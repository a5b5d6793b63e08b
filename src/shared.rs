//! Process-wide default logger
//!
//! The shared logger is created lazily with default settings the first time
//! it is used. It can be replaced wholesale with [`set_shared`], for example
//! to install a test double; later static calls go to the new instance while
//! calls already running on the old one finish against it.
//!
//! The default shared logger lives in a static and is never dropped, so its
//! worker is not drained when `main` returns. Call [`flush`] before the
//! process exits, or lines still queued are lost. A logger replaced through
//! [`set_shared`] drains its queue when the returned `Arc` is dropped.
//!
//! ```
//! use timber_log::prelude::*;
//! use timber_log::shared;
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().sink(sink.clone()).use_current_thread(true).build();
//! let previous = shared::set_shared(Arc::new(logger));
//!
//! shared::set_format(LogFormat::message_only());
//! timber_log::info!("ready");
//! assert_eq!(sink.contents(), "ready");
//!
//! shared::set_shared(previous);
//! ```

use crate::core::{CallSite, LogFormat, LogLevel, Logger, Result};
use parking_lot::RwLock;
use std::fmt::Display;
use std::sync::{Arc, OnceLock};

static SHARED_LOGGER: OnceLock<RwLock<Arc<Logger>>> = OnceLock::new();

fn registry() -> &'static RwLock<Arc<Logger>> {
    SHARED_LOGGER.get_or_init(|| RwLock::new(Arc::new(Logger::default())))
}

/// The current shared logger.
pub fn shared() -> Arc<Logger> {
    Arc::clone(&registry().read())
}

/// Install `logger` as the shared logger and return the one it replaces.
pub fn set_shared(logger: Arc<Logger>) -> Arc<Logger> {
    std::mem::replace(&mut *registry().write(), logger)
}

pub fn set_format(format: LogFormat) {
    shared().set_log_format(format);
}

/// Restore the default format on the shared logger.
pub fn reset_format() {
    set_format(LogFormat::default());
}

pub fn set_enabled(enabled: bool) {
    shared().set_enabled(enabled);
}

pub fn set_min_level(level: LogLevel) {
    shared().set_min_level(level);
}

pub fn set_terminator(terminator: impl Into<String>) {
    shared().set_terminator(terminator);
}

pub fn set_separator(separator: impl Into<String>) {
    shared().set_separator(separator);
}

pub fn register_file(level: LogLevel, file_path: &str) {
    shared().register_file(level, file_path);
}

pub fn log(level: LogLevel, parts: &[&dyn Display], call_site: CallSite) {
    shared().log(level, parts, call_site);
}

pub fn debug(parts: &[&dyn Display], call_site: CallSite) {
    log(LogLevel::Debug, parts, call_site);
}

pub fn trace(parts: &[&dyn Display], call_site: CallSite) {
    log(LogLevel::Trace, parts, call_site);
}

pub fn info(parts: &[&dyn Display], call_site: CallSite) {
    log(LogLevel::Info, parts, call_site);
}

pub fn warn(parts: &[&dyn Display], call_site: CallSite) {
    log(LogLevel::Warn, parts, call_site);
}

pub fn error(parts: &[&dyn Display], call_site: CallSite) {
    log(LogLevel::Error, parts, call_site);
}

pub fn fatal(parts: &[&dyn Display], call_site: CallSite) {
    log(LogLevel::Fatal, parts, call_site);
}

/// Wait for the shared logger's queue to drain.
///
/// Call this before exiting; the shared logger is never dropped.
pub fn flush() -> Result<()> {
    shared().flush()
}
