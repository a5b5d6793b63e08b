//! Main logger implementation
//!
//! A [`Logger`] checks each call against its level gate on the calling thread,
//! joins the message parts, and hands a [`LogRecord`] to a single worker
//! thread that renders and writes records strictly in submission order.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    formatter::LogFormatter,
    log_format::LogFormat,
    log_level::LogLevel,
    log_record::{bare_file_name, join_parts, CallSite, LogRecord},
    metrics::LoggerMetrics,
    timestamp::{LdmlDateFormatter, SharedDateFormatter},
};
use crate::sinks::{ConsoleSink, Sink};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// Used when the logger is dropped without an explicit [`Logger::shutdown`].
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Observer for sink failures, called on the thread that performed the write.
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

struct Settings {
    enabled: bool,
    min_level: LogLevel,
    terminator: String,
    separator: String,
    format: Arc<LogFormat>,
    use_current_thread: bool,
}

/// State shared with the worker thread.
struct Output {
    sink: Mutex<Option<Box<dyn Sink>>>,
    date_formatter: SharedDateFormatter,
    on_write_error: Option<ErrorCallback>,
    metrics: LoggerMetrics,
}

thread_local! {
    /// Outputs this thread is currently writing to, by address.
    static ACTIVE_WRITES: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks an output as busy on this thread until dropped.
struct WriteGuard(usize);

impl WriteGuard {
    /// `None` when this thread is already inside a write to the same output.
    fn enter(output: &Output) -> Option<Self> {
        let key = output as *const Output as usize;
        ACTIVE_WRITES.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&key) {
                return None;
            }
            active.push(key);
            Some(WriteGuard(key))
        })
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        ACTIVE_WRITES.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|&key| key == self.0) {
                active.remove(pos);
            }
        });
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

enum Command {
    Write(LogRecord),
    Flush(Sender<()>),
}

pub struct Logger {
    settings: RwLock<Settings>,
    file_levels: RwLock<HashMap<String, LogLevel>>,
    output: Arc<Output>,
    sender: Option<Sender<Command>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Logger {
    /// Create a logger with the given threshold and format; everything else
    /// takes its default.
    #[must_use]
    pub fn new(min_level: LogLevel, log_format: LogFormat) -> Self {
        Self::builder().min_level(min_level).format(log_format).build()
    }

    /// Build a logger from a [`LoggerConfig`].
    #[must_use]
    pub fn from_config(config: LoggerConfig) -> Self {
        Self::builder().config(config).build()
    }

    fn start(settings: Settings, output: Output, file_levels: HashMap<String, LogLevel>) -> Self {
        let output = Arc::new(output);
        let (sender, receiver) = unbounded();
        let worker_output = Arc::clone(&output);

        let spawned = thread::Builder::new()
            .name("timber-log-worker".to_string())
            .spawn(move || Self::run_worker(receiver, worker_output));

        let (sender, worker) = match spawned {
            Ok(handle) => (Some(sender), Some(handle)),
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Failed to spawn log worker thread: {}. \
                     Falling back to synchronous writes.",
                    e
                );
                (None, None)
            }
        };

        Self {
            settings: RwLock::new(settings),
            file_levels: RwLock::new(file_levels),
            output,
            sender,
            worker,
        }
    }

    fn run_worker(receiver: Receiver<Command>, output: Arc<Output>) {
        for command in receiver.iter() {
            match command {
                Command::Write(record) => Self::process(&output, &record),
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }

    /// Render one record and write it, isolating sink errors and panics.
    ///
    /// A sink that logs back into its own logger from the same thread would
    /// deadlock on the sink lock; such nested records are dropped and
    /// reported as [`LoggerError::ReentrantWrite`].
    fn process(output: &Output, record: &LogRecord) {
        let guard = match WriteGuard::enter(output) {
            Some(guard) => guard,
            None => {
                Self::report_failure(output, LoggerError::ReentrantWrite);
                return;
            }
        };

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let line = LogFormatter::for_record(record)
                .with_date_formatter(output.date_formatter.as_ref())
                .formatted_log_message();

            match output.sink.lock().as_mut() {
                Some(sink) => sink.write(line.as_bytes()),
                None => ConsoleSink.write(line.as_bytes()),
            }
        }));
        drop(guard);

        let error = match result {
            Ok(Ok(())) => {
                output.metrics.record_written();
                return;
            }
            Ok(Err(e)) => e,
            Err(panic_info) => {
                let sink_name = output
                    .sink
                    .lock()
                    .as_ref()
                    .map_or_else(|| "console".to_string(), |sink| sink.name().to_string());
                LoggerError::sink_panicked(sink_name, panic_message(&*panic_info))
            }
        };

        Self::report_failure(output, error);
    }

    /// Count a failed write and hand it to the observer, if any.
    fn report_failure(output: &Output, error: LoggerError) {
        output.metrics.record_failure();
        if let Some(ref callback) = output.on_write_error {
            let observed =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| callback(&error)));
            if let Err(panic_info) = observed {
                eprintln!(
                    "[LOGGER ERROR] Write error observer panicked: {} (while reporting: {})",
                    panic_message(&*panic_info),
                    error
                );
            }
        }
    }

    /// Whether a call at `level` from `file_path` would pass the gate.
    ///
    /// A per-file level, when registered, replaces the global minimum level
    /// rather than adding to it.
    pub fn is_enabled_for(&self, level: LogLevel, file_path: &str) -> bool {
        let settings = self.settings.read();
        settings.enabled && self.permits(level, file_path, settings.min_level)
    }

    fn permits(&self, level: LogLevel, file_path: &str, min_level: LogLevel) -> bool {
        match self.file_levels.read().get(bare_file_name(file_path)) {
            Some(file_level) => level.permits(*file_level),
            None => level.permits(min_level),
        }
    }

    /// Log `parts`, joined by the separator, at `level`.
    ///
    /// Calls that fail the gate return immediately without formatting or
    /// writing anything.
    pub fn log(&self, level: LogLevel, parts: &[&dyn Display], call_site: CallSite) {
        // Message parts may log or reconfigure this logger from their
        // `Display` impls, so no lock is held while they run
        let (separator, format, terminator, use_current_thread) = {
            let settings = self.settings.read();
            if !settings.enabled || !self.permits(level, call_site.file, settings.min_level) {
                return;
            }
            (
                settings.separator.clone(),
                Arc::clone(&settings.format),
                settings.terminator.clone(),
                settings.use_current_thread,
            )
        };

        let record = LogRecord::new(
            level,
            join_parts(parts, &separator),
            call_site,
            format,
            terminator,
        );

        match self.sender {
            Some(ref sender) if !use_current_thread => {
                if let Err(e) = sender.send(Command::Write(record)) {
                    // Worker gone; keep the line rather than lose it
                    if let Command::Write(record) = e.into_inner() {
                        Self::process(&self.output, &record);
                    }
                }
            }
            _ => Self::process(&self.output, &record),
        }
    }

    #[inline]
    pub fn debug(&self, parts: &[&dyn Display], call_site: CallSite) {
        self.log(LogLevel::Debug, parts, call_site);
    }

    #[inline]
    pub fn trace(&self, parts: &[&dyn Display], call_site: CallSite) {
        self.log(LogLevel::Trace, parts, call_site);
    }

    #[inline]
    pub fn info(&self, parts: &[&dyn Display], call_site: CallSite) {
        self.log(LogLevel::Info, parts, call_site);
    }

    #[inline]
    pub fn warn(&self, parts: &[&dyn Display], call_site: CallSite) {
        self.log(LogLevel::Warn, parts, call_site);
    }

    #[inline]
    pub fn error(&self, parts: &[&dyn Display], call_site: CallSite) {
        self.log(LogLevel::Error, parts, call_site);
    }

    #[inline]
    pub fn fatal(&self, parts: &[&dyn Display], call_site: CallSite) {
        self.log(LogLevel::Fatal, parts, call_site);
    }

    /// Give the file at `file_path` its own minimum level.
    ///
    /// Only the bare file name is kept, so `src/a/net.rs` and `net.rs` share
    /// one entry. Registering the same file again replaces its level.
    pub fn register_file(&self, level: LogLevel, file_path: &str) {
        self.file_levels
            .write()
            .insert(bare_file_name(file_path).to_string(), level);
    }

    pub fn unregister_file(&self, file_path: &str) -> Option<LogLevel> {
        self.file_levels.write().remove(bare_file_name(file_path))
    }

    pub fn file_level(&self, file_path: &str) -> Option<LogLevel> {
        self.file_levels.read().get(bare_file_name(file_path)).copied()
    }

    pub fn enabled(&self) -> bool {
        self.settings.read().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.settings.write().enabled = enabled;
    }

    pub fn min_level(&self) -> LogLevel {
        self.settings.read().min_level
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.settings.write().min_level = level;
    }

    pub fn terminator(&self) -> String {
        self.settings.read().terminator.clone()
    }

    pub fn set_terminator(&self, terminator: impl Into<String>) {
        self.settings.write().terminator = terminator.into();
    }

    pub fn separator(&self) -> String {
        self.settings.read().separator.clone()
    }

    pub fn set_separator(&self, separator: impl Into<String>) {
        self.settings.write().separator = separator.into();
    }

    pub fn log_format(&self) -> Arc<LogFormat> {
        Arc::clone(&self.settings.read().format)
    }

    pub fn set_log_format(&self, format: LogFormat) {
        self.settings.write().format = Arc::new(format);
    }

    pub fn use_current_thread(&self) -> bool {
        self.settings.read().use_current_thread
    }

    /// Render and write on the calling thread instead of the worker.
    ///
    /// Handy for deterministic tests. Records already queued are not waited
    /// for; call [`Logger::flush`] first when switching modes mid-stream.
    pub fn set_use_current_thread(&self, use_current_thread: bool) {
        self.settings.write().use_current_thread = use_current_thread;
    }

    /// Send output to `sink` instead of stdout.
    pub fn set_sink<S: Sink + 'static>(&self, sink: S) {
        *self.output.sink.lock() = Some(Box::new(sink));
    }

    /// Alias of [`Logger::set_sink`].
    pub fn pipe<S: Sink + 'static>(&self, sink: S) {
        self.set_sink(sink);
    }

    /// Go back to writing on stdout, returning the previous sink.
    pub fn take_sink(&self) -> Option<Box<dyn Sink>> {
        self.output.sink.lock().take()
    }

    pub fn clear_sink(&self) {
        drop(self.take_sink());
    }

    pub fn has_sink(&self) -> bool {
        self.output.sink.lock().is_some()
    }

    /// Snapshot of the current settings as a [`LoggerConfig`].
    pub fn config(&self) -> LoggerConfig {
        let settings = self.settings.read();
        LoggerConfig {
            enabled: settings.enabled,
            min_level: settings.min_level,
            terminator: settings.terminator.clone(),
            separator: settings.separator.clone(),
            use_current_thread: settings.use_current_thread,
            format: LogFormat::clone(&settings.format),
            file_levels: self
                .file_levels
                .read()
                .iter()
                .map(|(name, level)| (name.clone(), *level))
                .collect(),
        }
    }

    /// Write counters for this logger.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.output.metrics
    }

    /// Wait until every record queued before this call has been written,
    /// then flush the sink.
    pub fn flush(&self) -> Result<()> {
        if let Some(ref sender) = self.sender {
            let (ack, done) = crossbeam_channel::bounded(1);
            sender
                .send(Command::Flush(ack))
                .map_err(|_| LoggerError::LoggerStopped)?;
            done.recv().map_err(|_| LoggerError::LoggerStopped)?;
        }

        match self.output.sink.lock().as_mut() {
            Some(sink) => sink.flush(),
            None => ConsoleSink.flush(),
        }
    }

    /// Gracefully shut the logger down with a custom timeout
    ///
    /// Closes the queue, waits for the worker to write everything already
    /// queued, then flushes the sink. Later calls are written synchronously.
    ///
    /// # Returns
    ///
    /// `true` if shutdown completed within `timeout`, `false` otherwise
    ///
    /// # Example
    ///
    /// ```no_run
    /// use timber_log::{Logger, LogFormat, LogLevel};
    /// use std::time::Duration;
    ///
    /// let mut logger = Logger::new(LogLevel::Info, LogFormat::default());
    /// timber_log::info!(logger => "Important message");
    ///
    /// if !logger.shutdown(Duration::from_secs(10)) {
    ///     eprintln!("Warning: Logger shutdown timed out");
    /// }
    /// ```
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        // Closing the channel lets the worker drain and exit
        drop(self.sender.take());

        if let Some(handle) = self.worker.take() {
            let start = std::time::Instant::now();

            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Log worker thread panicked during shutdown: {:?}", e);
                        return false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Log worker thread did not finish within {:?}. \
                         Some logs may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            return false;
        }

        true
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let settings = self.settings.read();
        f.debug_struct("Logger")
            .field("enabled", &settings.enabled)
            .field("min_level", &settings.min_level)
            .field("use_current_thread", &settings.use_current_thread)
            .field("has_sink", &self.has_sink())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// # Example
/// ```
/// use timber_log::prelude::*;
/// use std::sync::Arc;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .min_level(LogLevel::Info)
///     .separator(" ")
///     .sink(sink.clone())
///     .use_current_thread(true)
///     .on_write_error(Arc::new(|err| eprintln!("log write failed: {}", err)))
///     .build();
///
/// timber_log::info!(logger => "listening on", 8080);
/// assert!(sink.contents().ends_with("] listening on 8080\n"));
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Box<dyn Sink>>,
    date_formatter: SharedDateFormatter,
    on_write_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
            date_formatter: Arc::new(LdmlDateFormatter),
            on_write_error: None,
        }
    }

    /// Replace every setting covered by `config`.
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn terminator(mut self, terminator: impl Into<String>) -> Self {
        self.config.terminator = terminator.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn use_current_thread(mut self, use_current_thread: bool) -> Self {
        self.config.use_current_thread = use_current_thread;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_level(mut self, file_path: &str, level: LogLevel) -> Self {
        self.config.file_levels.insert(file_path.to_string(), level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Replace the formatter used for `Date` attributes.
    #[must_use = "builder methods return a new value"]
    pub fn date_formatter(mut self, date_formatter: SharedDateFormatter) -> Self {
        self.date_formatter = date_formatter;
        self
    }

    /// Observe sink failures, which are otherwise dropped silently.
    ///
    /// The callback runs on the thread that performed the write, usually the
    /// logger's worker.
    #[must_use = "builder methods return a new value"]
    pub fn on_write_error(mut self, callback: ErrorCallback) -> Self {
        self.on_write_error = Some(callback);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let config = self.config;
        let file_levels = config
            .file_levels
            .iter()
            .map(|(path, level)| (bare_file_name(path).to_string(), *level))
            .collect();

        let settings = Settings {
            enabled: config.enabled,
            min_level: config.min_level,
            terminator: config.terminator,
            separator: config.separator,
            format: Arc::new(config.format),
            use_current_thread: config.use_current_thread,
        };
        let output = Output {
            sink: Mutex::new(self.sink),
            date_formatter: self.date_formatter,
            on_write_error: self.on_write_error,
            metrics: LoggerMetrics::new(),
        };

        Logger::start(settings, output, file_levels)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{DEFAULT_SEPARATOR, DEFAULT_TERMINATOR};
    use crate::core::log_format::Attribute;
    use crate::sinks::MemorySink;
    use std::sync::atomic::{AtomicU64, Ordering};

    const SITE: CallSite = CallSite::new("src/app/ViewController.rs", 21, 5, "app::load");

    fn message_format() -> LogFormat {
        LogFormat::with_attributes("%s %s", vec![Attribute::Level, Attribute::Message])
    }

    fn sync_logger(sink: &MemorySink) -> Logger {
        Logger::builder()
            .format(message_format())
            .sink(sink.clone())
            .use_current_thread(true)
            .build()
    }

    #[test]
    fn test_defaults() {
        let logger = Logger::default();
        assert!(logger.enabled());
        assert_eq!(logger.min_level(), LogLevel::Debug);
        assert_eq!(logger.terminator(), DEFAULT_TERMINATOR);
        assert_eq!(logger.separator(), DEFAULT_SEPARATOR);
        assert_eq!(*logger.log_format(), LogFormat::default());
        assert!(!logger.use_current_thread());
        assert!(!logger.has_sink());
    }

    #[test]
    fn test_new_sets_level_and_format() {
        let logger = Logger::new(LogLevel::All, message_format());
        assert_eq!(logger.min_level(), LogLevel::All);
        assert_eq!(*logger.log_format(), message_format());
    }

    #[test]
    fn test_min_level_gate() {
        let sink = MemorySink::new();
        let logger = sync_logger(&sink);
        logger.set_min_level(LogLevel::Warn);

        logger.info(&[&"hidden"], SITE);
        logger.warn(&[&"shown"], SITE);
        logger.fatal(&[&"also shown"], SITE);

        assert_eq!(sink.lines(), vec!["WARN shown", "FATAL also shown"]);
    }

    #[test]
    fn test_each_leveled_call_uses_its_level() {
        let sink = MemorySink::new();
        let logger = sync_logger(&sink);
        logger.set_min_level(LogLevel::All);

        logger.debug(&[&"d"], SITE);
        logger.trace(&[&"t"], SITE);
        logger.info(&[&"i"], SITE);
        logger.warn(&[&"w"], SITE);
        logger.error(&[&"e"], SITE);
        logger.fatal(&[&"f"], SITE);

        assert_eq!(
            sink.lines(),
            vec!["DEBUG d", "TRACE t", "INFO i", "WARN w", "ERROR e", "FATAL f"]
        );
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let sink = MemorySink::new();
        let logger = sync_logger(&sink);
        logger.set_enabled(false);

        for level in LogLevel::ALL_LEVELS {
            logger.log(level, &[&"nope"], SITE);
        }

        assert!(sink.is_empty());
        assert_eq!(logger.metrics().lines_written(), 0);
    }

    #[test]
    fn test_file_level_replaces_global_level() {
        let sink = MemorySink::new();
        let logger = sync_logger(&sink);

        logger.register_file(LogLevel::Fatal, SITE.file);
        logger.error(&[&"suppressed"], SITE);
        assert!(sink.is_empty());

        logger.set_min_level(LogLevel::Off);
        logger.register_file(LogLevel::All, "other/dir/ViewController.rs");
        logger.debug(&[&"allowed"], SITE);
        assert_eq!(sink.lines(), vec!["DEBUG allowed"]);

        let elsewhere = CallSite::new("src/app/Model.rs", 1, 1, "app::model");
        logger.fatal(&[&"global off"], elsewhere);
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_register_file_last_wins() {
        let logger = Logger::default();
        logger.register_file(LogLevel::Info, "a/b/net.rs");
        logger.register_file(LogLevel::Error, "net.rs");
        assert_eq!(logger.file_level("net"), Some(LogLevel::Error));

        assert_eq!(logger.unregister_file("x/net.swift"), Some(LogLevel::Error));
        assert_eq!(logger.file_level("net.rs"), None);
    }

    #[test]
    fn test_is_enabled_for() {
        let logger = Logger::new(LogLevel::Info, LogFormat::default());
        assert!(logger.is_enabled_for(LogLevel::Info, "main.rs"));
        assert!(!logger.is_enabled_for(LogLevel::Debug, "main.rs"));

        logger.register_file(LogLevel::All, "main.rs");
        assert!(logger.is_enabled_for(LogLevel::All, "src/main.rs"));

        logger.set_enabled(false);
        assert!(!logger.is_enabled_for(LogLevel::Fatal, "src/main.rs"));
    }

    #[test]
    fn test_separator_joins_parts() {
        let sink = MemorySink::new();
        let logger = sync_logger(&sink);

        logger.info(&[&"user", &42, &true], SITE);
        logger.set_separator(" | ");
        logger.info(&[&"user", &42], SITE);
        logger.info(&[], SITE);

        assert_eq!(sink.contents(), "INFO user, 42, true\nINFO user | 42\nINFO \n");
    }

    #[test]
    fn test_terminator_and_passthrough_format() {
        let sink = MemorySink::new();
        let logger = sync_logger(&sink);

        logger.set_terminator("\r\n");
        logger.info(&[&"a"], SITE);
        logger.set_log_format(LogFormat::message_only());
        logger.info(&[&"raw"], SITE);

        assert_eq!(sink.contents(), "INFO a\r\nraw");
    }

    #[test]
    fn test_async_writes_after_flush() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .format(message_format())
            .sink(sink.clone())
            .build();

        for i in 0..100 {
            logger.info(&[&"message", &i], SITE);
        }
        logger.flush().expect("flush");

        let lines = sink.lines();
        assert_eq!(lines.len(), 100);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line, &format!("INFO message, {}", i));
        }
        assert_eq!(logger.metrics().lines_written(), 100);
    }

    #[test]
    fn test_write_errors_reach_observer() {
        struct BrokenSink;

        impl Sink for BrokenSink {
            fn write(&mut self, _bytes: &[u8]) -> Result<()> {
                Err(LoggerError::writer("pipe closed"))
            }

            fn name(&self) -> &str {
                "broken"
            }
        }

        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = Arc::clone(&seen);
        let logger = Logger::builder()
            .sink(BrokenSink)
            .on_write_error(Arc::new(move |err| {
                if matches!(err, LoggerError::WriterError(_)) {
                    seen_clone.fetch_add(1, Ordering::Relaxed);
                }
            }))
            .build();

        for _ in 0..3 {
            logger.error(&[&"lost"], SITE);
        }
        logger.flush().expect("flush");

        assert_eq!(seen.load(Ordering::Relaxed), 3);
        assert_eq!(logger.metrics().write_failures(), 3);
        assert_eq!(logger.metrics().lines_written(), 0);
    }

    #[test]
    fn test_panicking_sink_does_not_stop_worker() {
        struct PanicOnce {
            panicked: bool,
            inner: MemorySink,
        }

        impl Sink for PanicOnce {
            fn write(&mut self, bytes: &[u8]) -> Result<()> {
                if !self.panicked {
                    self.panicked = true;
                    panic!("sink exploded");
                }
                self.inner.write(bytes)
            }

            fn name(&self) -> &str {
                "panic-once"
            }
        }

        let sink = MemorySink::new();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let failures_clone = Arc::clone(&failures);
        let logger = Logger::builder()
            .format(message_format())
            .sink(PanicOnce {
                panicked: false,
                inner: sink.clone(),
            })
            .on_write_error(Arc::new(move |err| failures_clone.lock().push(err.to_string())))
            .build();

        logger.info(&[&"first"], SITE);
        logger.info(&[&"second"], SITE);
        logger.flush().expect("flush");

        assert_eq!(sink.lines(), vec!["INFO second"]);
        assert_eq!(
            failures.lock().as_slice(),
            ["Sink 'panic-once' panicked: sink exploded"]
        );
    }

    #[test]
    fn test_sink_management() {
        let logger = Logger::default();
        assert!(!logger.has_sink());

        logger.pipe(MemorySink::new());
        assert!(logger.has_sink());
        assert_eq!(logger.take_sink().map(|s| s.name().to_string()), Some("memory".to_string()));
        assert!(!logger.has_sink());

        logger.set_sink(MemorySink::new());
        logger.clear_sink();
        assert!(!logger.has_sink());
    }

    #[test]
    fn test_config_roundtrip() {
        let logger = Logger::builder()
            .min_level(LogLevel::Warn)
            .separator(" ")
            .file_level("src/net/client.rs", LogLevel::Error)
            .build();

        let config = logger.config();
        assert_eq!(config.min_level, LogLevel::Warn);
        assert_eq!(config.separator, " ");
        assert_eq!(config.file_levels.get("client"), Some(&LogLevel::Error));

        let rebuilt = Logger::from_config(config.clone());
        assert_eq!(rebuilt.config(), config);
    }

    #[test]
    fn test_shutdown_then_log_synchronously() {
        let sink = MemorySink::new();
        let mut logger = Logger::builder()
            .format(message_format())
            .sink(sink.clone())
            .build();

        logger.info(&[&"queued"], SITE);
        assert!(logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));
        logger.info(&[&"after"], SITE);

        assert_eq!(sink.lines(), vec!["INFO queued", "INFO after"]);
    }

    /// Run `f` on its own thread; `false` if it did not finish in time.
    fn finishes_within(timeout: Duration, f: impl FnOnce() + Send + 'static) -> bool {
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            f();
            let _ = done_tx.send(());
        });
        done_rx.recv_timeout(timeout).is_ok()
    }

    #[test]
    fn test_panicking_observer_does_not_stop_worker() {
        struct FailFirst {
            failed: bool,
            inner: MemorySink,
        }

        impl Sink for FailFirst {
            fn write(&mut self, bytes: &[u8]) -> Result<()> {
                if !self.failed {
                    self.failed = true;
                    return Err(LoggerError::writer("first write fails"));
                }
                self.inner.write(bytes)
            }

            fn name(&self) -> &str {
                "fail-first"
            }
        }

        let sink = MemorySink::new();
        let logger = Logger::builder()
            .format(LogFormat::message_only())
            .sink(FailFirst {
                failed: false,
                inner: sink.clone(),
            })
            .on_write_error(Arc::new(|_: &LoggerError| panic!("observer bug")))
            .build();

        for i in 0..5 {
            logger.info(&[&format!("m{} ", i)], SITE);
        }
        logger.flush().expect("worker still running");

        assert_eq!(sink.contents(), "m1 m2 m3 m4 ");
        assert_eq!(logger.metrics().write_failures(), 1);
        assert_eq!(logger.metrics().lines_written(), 4);
    }

    #[test]
    fn test_display_part_may_use_its_logger() {
        struct Nested {
            logger: Arc<Logger>,
            entered: crossbeam_channel::Sender<()>,
        }

        impl Display for Nested {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let _ = self.entered.send(());
                thread::sleep(Duration::from_millis(50));
                self.logger.info(&[&"inner"], SITE);
                self.logger.set_min_level(LogLevel::Debug);
                f.write_str("outer")
            }
        }

        let sink = MemorySink::new();
        let logger = Arc::new(sync_logger(&sink));
        let (entered_tx, entered_rx) = crossbeam_channel::bounded(1);

        // A second thread reconfigures while the part is being rendered
        let reconfigurer = {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                if entered_rx.recv_timeout(Duration::from_secs(5)).is_ok() {
                    logger.set_separator(" | ");
                }
            })
        };

        let nested_logger = Arc::clone(&logger);
        let finished = finishes_within(Duration::from_secs(5), move || {
            let part = Nested {
                logger: Arc::clone(&nested_logger),
                entered: entered_tx,
            };
            nested_logger.info(&[&part, &"tail"], SITE);
        });

        assert!(finished, "log() blocked while rendering a part");
        reconfigurer.join().expect("reconfigurer panicked");
        // The separator in effect when the call passed the gate is used
        assert_eq!(sink.lines(), vec!["INFO inner", "INFO outer, tail"]);
        assert_eq!(logger.separator(), " | ");
    }

    #[test]
    fn test_sink_logging_through_own_logger_is_dropped() {
        struct EchoSink {
            inner: MemorySink,
            owner: Arc<std::sync::OnceLock<std::sync::Weak<Logger>>>,
        }

        impl Sink for EchoSink {
            fn write(&mut self, bytes: &[u8]) -> Result<()> {
                self.inner.write(bytes)?;
                if let Some(logger) = self.owner.get().and_then(std::sync::Weak::upgrade) {
                    logger.info(&[&"echo"], SITE);
                }
                Ok(())
            }

            fn name(&self) -> &str {
                "echo"
            }
        }

        let sink = MemorySink::new();
        let owner = Arc::new(std::sync::OnceLock::new());
        let reentrant = Arc::new(AtomicU64::new(0));
        let reentrant_clone = Arc::clone(&reentrant);
        let logger = Arc::new(
            Logger::builder()
                .format(message_format())
                .sink(EchoSink {
                    inner: sink.clone(),
                    owner: Arc::clone(&owner),
                })
                .use_current_thread(true)
                .on_write_error(Arc::new(move |err: &LoggerError| {
                    if matches!(err, LoggerError::ReentrantWrite) {
                        reentrant_clone.fetch_add(1, Ordering::Relaxed);
                    }
                }))
                .build(),
        );
        let _ = owner.set(Arc::downgrade(&logger));

        let caller = Arc::clone(&logger);
        let finished = finishes_within(Duration::from_secs(5), move || {
            caller.info(&[&"outer"], SITE);
            caller.info(&[&"again"], SITE);
        });

        assert!(finished, "sink deadlocked logging through its own logger");
        assert_eq!(sink.lines(), vec!["INFO outer", "INFO again"]);
        assert_eq!(reentrant.load(Ordering::Relaxed), 2);
        assert_eq!(logger.metrics().lines_written(), 2);
        assert_eq!(logger.metrics().write_failures(), 2);
    }
}
