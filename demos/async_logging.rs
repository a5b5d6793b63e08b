//! Background worker example
//!
//! Demonstrates many threads sharing one logger: calls return immediately and
//! the worker writes lines in submission order.
//!
//! Run with: cargo run --example async_logging

use std::sync::Arc;
use std::time::{Duration, Instant};
use timber_log::prelude::*;
use timber_log::{info, shared, warn};

fn main() -> Result<()> {
    println!("=== Timber Log - Background Worker Example ===\n");

    let sink = MemorySink::new();
    let logger = Arc::new(
        Logger::builder()
            .format(LogFormat::with_attributes(
                "%s %s",
                vec![Attribute::Level, Attribute::Message],
            ))
            .sink(sink.clone())
            .build(),
    );

    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..2500 {
                    info!(logger => "worker", worker, "event", i);
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }
    let submitted = start.elapsed();

    logger.flush()?;
    println!(
        "Submitted 10000 lines in {:?}, written after {:?}",
        submitted,
        start.elapsed()
    );
    println!("Lines in sink: {}", sink.lines().len());

    // The shared logger works the same way, through the macros without a target
    shared::set_min_level(LogLevel::Info);
    warn!("Shared logger says hello");
    shared::flush()?;

    if let Ok(mut logger) = Arc::try_unwrap(logger) {
        if !logger.shutdown(Duration::from_secs(5)) {
            eprintln!("Warning: logger shutdown timed out");
        }
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
