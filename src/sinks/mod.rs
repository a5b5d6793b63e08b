//! Output sinks
//!
//! A sink receives the fully rendered bytes of one log line at a time. When a
//! logger has no sink configured it writes to stdout, the same destination as
//! [`ConsoleSink`].

pub mod console;
pub mod file;
pub mod memory;
pub mod writer;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use memory::MemorySink;
pub use writer::WriterSink;

use crate::core::Result;

/// Byte-stream destination for rendered log lines.
///
/// Sinks are only ever driven from one thread at a time: the logger's worker,
/// or the calling thread when the logger runs on the current thread.
///
/// A sink may log through the logger that owns it. On the worker the nested
/// record is queued behind the current one. On the current thread it is
/// dropped and reported as [`LoggerError::ReentrantWrite`](crate::LoggerError::ReentrantWrite).
pub trait Sink: Send {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Loggers never flush on their own; this runs on [`Logger::flush`](crate::Logger::flush).
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
