//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Level rank outside `0..=7`
    #[error("Invalid log level rank: {rank}")]
    InvalidLevelRank { rank: u8 },

    /// Unrecognized level name
    #[error("Invalid log level: '{0}'")]
    InvalidLevelName(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A sink panicked while writing
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },

    /// A sink logged through its own logger from inside `Sink::write`
    #[error("Sink logged through its own logger while writing; nested record dropped")]
    ReentrantWrite,

    /// Logger already stopped
    #[error("Logger already stopped")]
    LoggerStopped,

    /// An `io::Write` behind a sink failed
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn sink_panicked(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a writer error
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
