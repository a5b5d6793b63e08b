//! Call-site metadata and the queued log record

use super::log_format::LogFormat;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::ffi::OsStr;
use std::fmt::{self, Display, Write};
use std::path::Path;
use std::sync::Arc;

/// Where a log call was made.
///
/// Usually built by [`call_site!`](crate::call_site), which captures the
/// location of the macro invocation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
    pub function: &'static str,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, column: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            column,
            function,
        }
    }

    /// Key used for per-file level overrides.
    pub fn bare_file_name(&self) -> &'static str {
        bare_file_name(self.file)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{} ({})", self.file, self.line, self.column, self.function)
    }
}

/// A permitted log call waiting to be rendered and written.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub call_site: CallSite,
    pub timestamp: DateTime<Local>,
    pub format: Arc<LogFormat>,
    pub terminator: String,
}

impl LogRecord {
    pub fn new(
        level: LogLevel,
        message: String,
        call_site: CallSite,
        format: Arc<LogFormat>,
        terminator: String,
    ) -> Self {
        Self {
            level,
            message,
            call_site,
            timestamp: Local::now(),
            format,
            terminator,
        }
    }
}

/// Final path segment, e.g. `src/net/client.rs` -> `client.rs`.
pub fn last_path_component(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(path)
}

/// Drop the last `.ext` of the final segment, keeping any directories.
///
/// Dot-files such as `.env` are left untouched.
pub fn strip_extension(path: &str) -> &str {
    let name_start = path
        .rfind(|c| c == '/' || c == '\\')
        .map_or(0, |idx| idx + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

/// File name without directories or extension: `src/net/client.rs` -> `client`.
pub fn bare_file_name(path: &str) -> &str {
    strip_extension(last_path_component(path))
}

/// Join message parts, putting `separator` between consecutive elements.
pub fn join_parts(parts: &[&dyn Display], separator: &str) -> String {
    let mut message = String::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            message.push_str(separator);
        }
        // Writing into a String cannot fail
        let _ = write!(message, "{}", part);
    }
    message
}

/// Strip the helper suffixes left by [`function_name!`](crate::function_name).
#[doc(hidden)]
pub fn clean_function_name(name: &'static str) -> &'static str {
    let mut name = name.strip_suffix("::__timber_here").unwrap_or(name);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name
}
