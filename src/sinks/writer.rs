//! Sink over any `io::Write`

use super::Sink;
use crate::core::{LoggerError, Result};
use std::io::Write;

/// Adapts a pipe, socket, buffer or other writer into a [`Sink`].
///
/// # Example
///
/// ```
/// use timber_log::sinks::{Sink, WriterSink};
///
/// let mut sink = WriterSink::new(Vec::new());
/// sink.write(b"hello\n").unwrap();
/// assert_eq!(sink.into_inner(), b"hello\n");
/// ```
pub struct WriterSink<W> {
    writer: W,
    name: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::named(writer, "writer")
    }

    pub fn named(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer,
            name: name.into(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| LoggerError::writer(format!("'{}' write failed: {}", self.name, e)))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::writer(format!("'{}' flush failed: {}", self.name, e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
