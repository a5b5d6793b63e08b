//! Logger metrics for observability
//!
//! Counts lines that reached their sink and writes that failed. Suppressed
//! calls are never counted: the level gate does no work beyond the comparison.

use std::sync::atomic::{AtomicU64, Ordering};

/// Write counters for one logger.
///
/// # Example
///
/// ```
/// use timber_log::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_failure();
///
/// assert_eq!(metrics.lines_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Lines successfully handed to the sink
    lines_written: AtomicU64,

    /// Lines whose write returned an error or panicked
    write_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            lines_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.lines_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Percentage of attempted writes that failed
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = failed + self.lines_written() as f64;
        if total == 0.0 {
            0.0
        } else {
            failed / total * 100.0
        }
    }

    pub fn reset(&self) {
        self.lines_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}
