//! Console sink

use super::Sink;
use crate::core::Result;
use std::io::Write;

/// Writes rendered lines to stdout exactly as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        std::io::stdout().lock().write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
