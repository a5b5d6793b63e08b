//! Logging macros that capture the call site.
//!
//! Every macro records `file!()`, `line!()`, `column!()` and the enclosing
//! function of the macro invocation. Message parts are any values that
//! implement `Display`; they are joined with the logger's separator.
//!
//! Prefix the parts with `logger =>` to target a specific [`Logger`](crate::Logger);
//! without a prefix the call goes to the [shared logger](crate::shared).
//!
//! # Examples
//!
//! ```
//! use timber_log::prelude::*;
//! use timber_log::{info, warn};
//!
//! let logger = Logger::new(LogLevel::Debug, LogFormat::default());
//!
//! // Basic logging
//! info!(logger => "Server started");
//!
//! // Several parts, joined with ", " by default
//! let port = 8080;
//! info!(logger => "Server listening on port", port);
//!
//! // The shared logger
//! warn!("Disk usage at", format!("{}%", 91));
//! ```

/// Path of the enclosing function, e.g. `my_app::net::connect`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __timber_here() {}
        fn __timber_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::core::log_record::clean_function_name(__timber_type_name_of(__timber_here))
    }};
}

/// [`CallSite`](crate::CallSite) of the macro invocation.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(
            ::std::file!(),
            ::std::line!(),
            ::std::column!(),
            $crate::function_name!(),
        )
    };
}

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use timber_log::prelude::*;
/// # let logger = Logger::default();
/// use timber_log::log;
/// log!(logger => LogLevel::Info, "Simple message");
/// log!(logger => LogLevel::Error, "Error code:", 500);
/// log!(LogLevel::Warn, "via the shared logger");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr => $level:expr, $($part:expr),+ $(,)?) => {
        $logger.log(
            $level,
            &[$(&$part as &dyn ::std::fmt::Display),+],
            $crate::call_site!(),
        )
    };
    ($level:expr, $($part:expr),+ $(,)?) => {
        $crate::shared::log(
            $level,
            &[$(&$part as &dyn ::std::fmt::Display),+],
            $crate::call_site!(),
        )
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use timber_log::prelude::*;
/// # let logger = Logger::default();
/// use timber_log::debug;
/// debug!(logger => "Debug information");
/// debug!(logger => "Counter value:", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr => $($part:expr),+ $(,)?) => {
        $crate::log!($logger => $crate::LogLevel::Debug, $($part),+)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::log!($crate::LogLevel::Debug, $($part),+)
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use timber_log::prelude::*;
/// # let logger = Logger::default();
/// use timber_log::trace;
/// trace!(logger => "Entering function: calculate()");
/// trace!(logger => "Variable value:", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr => $($part:expr),+ $(,)?) => {
        $crate::log!($logger => $crate::LogLevel::Trace, $($part),+)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::log!($crate::LogLevel::Trace, $($part),+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr => $($part:expr),+ $(,)?) => {
        $crate::log!($logger => $crate::LogLevel::Info, $($part),+)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::log!($crate::LogLevel::Info, $($part),+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr => $($part:expr),+ $(,)?) => {
        $crate::log!($logger => $crate::LogLevel::Warn, $($part),+)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::log!($crate::LogLevel::Warn, $($part),+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use timber_log::prelude::*;
/// # let logger = Logger::default();
/// use timber_log::error;
/// error!(logger => "Failed to connect to database");
/// error!(logger => "Error code:", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr => $($part:expr),+ $(,)?) => {
        $crate::log!($logger => $crate::LogLevel::Error, $($part),+)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::log!($crate::LogLevel::Error, $($part),+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr => $($part:expr),+ $(,)?) => {
        $crate::log!($logger => $crate::LogLevel::Fatal, $($part),+)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::log!($crate::LogLevel::Fatal, $($part),+)
    };
}

/// Give the current source file its own minimum level.
///
/// ```
/// # use timber_log::prelude::*;
/// # let logger = Logger::default();
/// use timber_log::register_file;
/// register_file!(logger => LogLevel::Error);
/// assert_eq!(logger.file_level(file!()), Some(LogLevel::Error));
/// ```
#[macro_export]
macro_rules! register_file {
    ($logger:expr => $level:expr) => {
        $logger.register_file($level, ::std::file!())
    };
    ($level:expr) => {
        $crate::shared::register_file($level, ::std::file!())
    };
}
