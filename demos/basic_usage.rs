//! Basic logger usage example
//!
//! Demonstrates the default format, level gating and per-file overrides on
//! stdout.
//!
//! Run with: cargo run --example basic_usage

use timber_log::prelude::*;
use timber_log::{debug, error, fatal, info, register_file, trace, warn};

fn main() -> Result<()> {
    println!("=== Timber Log - Basic Usage Example ===\n");

    // Write on the calling thread so output interleaves with println!
    let logger = Logger::builder()
        .min_level(LogLevel::All)
        .use_current_thread(true)
        .build();

    println!("1. Logging at different levels:");
    debug!(logger => "This is a debug message");
    trace!(logger => "This is a trace message");
    info!(logger => "This is an info message");
    warn!(logger => "This is a warning message");
    error!(logger => "This is an error message");
    fatal!(logger => "This is a fatal message");

    println!("\n2. Several parts joined with the separator:");
    let port = 8080;
    info!(logger => "Listening on port", port, "with", 4, "workers");
    logger.set_separator(" ");
    info!(logger => "Listening on port", port, "with", 4, "workers");

    println!("\n3. Minimum level set to Warn - debug and info won't show:");
    logger.set_min_level(LogLevel::Warn);
    debug!(logger => "Debug message (hidden)");
    info!(logger => "Info message (hidden)");
    warn!(logger => "Warning message (visible)");

    println!("\n4. This file registered at All - its override replaces the global level:");
    register_file!(logger => LogLevel::All);
    debug!(logger => "Debug message (visible again)");

    println!("\n5. A custom template:");
    logger.set_log_format(LogFormat::with_attributes(
        "%2$s | %1$s | %3$s:%4$s | %5$s",
        vec![
            Attribute::Level,
            Attribute::date("yyyy-MM-dd HH:mm:ss.SSS"),
            Attribute::file_name(false, true),
            Attribute::Line,
            Attribute::Message,
        ],
    ));
    info!(logger => "Positional placeholders");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
