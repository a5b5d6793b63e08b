//! File logging example
//!
//! Demonstrates writing to a file sink and loading settings from JSON.
//!
//! Run with: cargo run --example file_logging

use timber_log::prelude::*;
use timber_log::{error, info, warn};

fn main() -> Result<()> {
    println!("=== Timber Log - File Logging Example ===\n");

    let log_dir = std::env::temp_dir().join("timber_log_demo");
    std::fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("application.log");

    let config = LoggerConfig::from_json(
        r#"{
            "min_level": "Info",
            "separator": " ",
            "format": {
                "template": "%s [%s] %s:%s %s",
                "attributes": [
                    { "Date": { "pattern": "yyyy-MM-dd'T'HH:mm:ss.SSSZ" } },
                    "Level",
                    { "FileName": { "full_path": false, "include_extension": true } },
                    "Line",
                    "Message"
                ]
            }
        }"#,
    )?;

    let logger = Logger::builder()
        .config(config)
        .sink(FileSink::new(&log_path)?)
        .on_write_error(std::sync::Arc::new(|err| eprintln!("log write failed: {}", err)))
        .build();

    info!(logger => "Application started");
    info!(logger => "Loading configuration from", log_dir.display());
    warn!(logger => "Cache miss rate at", 0.42);
    error!(logger => "Failed to reach upstream", "retrying");
    logger.flush()?;

    println!("Wrote {} lines to {}", logger.metrics().lines_written(), log_path.display());
    println!("\nCurrent settings:\n{}", logger.config().to_json()?);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
