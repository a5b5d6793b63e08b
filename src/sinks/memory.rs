//! In-memory sink

use super::Sink;
use crate::core::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects output in a shared buffer.
///
/// Clones share the same buffer, so a test can hand one clone to a logger and
/// read the output through another.
///
/// # Example
///
/// ```
/// use timber_log::sinks::{MemorySink, Sink};
///
/// let sink = MemorySink::new();
/// let mut handle = sink.clone();
/// handle.write(b"one\n").unwrap();
/// assert_eq!(sink.contents(), "one\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    /// Buffer contents, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.lock().extend_from_slice(bytes);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
