//! Tests for the process-wide shared logger
//!
//! The shared logger is global state, so every test here holds `SERIAL`.

use timber_log::prelude::*;
use timber_log::{debug, error, info, register_file, shared, warn};
use std::sync::Arc;

static SERIAL: parking_lot::Mutex<()> = parking_lot::const_mutex(());

fn install_memory_logger(format: LogFormat) -> (MemorySink, Arc<Logger>) {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .format(format)
        .sink(sink.clone())
        .use_current_thread(true)
        .build();
    let previous = shared::set_shared(Arc::new(logger));
    (sink, previous)
}

#[test]
fn test_shared_logger_is_lazily_created() {
    let _guard = SERIAL.lock();

    let first = shared::shared();
    let second = shared::shared();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_replaced_logger_receives_static_calls() {
    let _guard = SERIAL.lock();

    let (sink, previous) = install_memory_logger(LogFormat::message_only());

    info!("one");
    shared::info(&[&"two"], timber_log::call_site!());
    assert_eq!(sink.contents(), "onetwo");

    // Swap again: the first double stops receiving output
    let (second_sink, first) = install_memory_logger(LogFormat::message_only());
    warn!("three");
    assert_eq!(sink.contents(), "onetwo");
    assert_eq!(second_sink.contents(), "three");

    drop(first);
    shared::set_shared(previous);
}

#[test]
fn test_swap_leaves_queued_lines_with_previous_logger() {
    let _guard = SERIAL.lock();

    // A worker-backed logger, so lines are still queued when the swap happens
    let old_sink = MemorySink::new();
    let worker_logger = Logger::builder()
        .format(LogFormat::with_attributes("%s %s", vec![Attribute::Level, Attribute::Message]))
        .sink(old_sink.clone())
        .build();
    let original = shared::set_shared(Arc::new(worker_logger));

    for i in 0..200 {
        info!("queued", i);
    }

    let (new_sink, worker_logger) = install_memory_logger(LogFormat::message_only());
    worker_logger.flush().expect("flush previous logger");
    drop(worker_logger);

    let lines = old_sink.lines();
    assert_eq!(lines.len(), 200);
    assert_eq!(lines[0], "INFO queued, 0");
    assert_eq!(lines[199], "INFO queued, 199");
    assert!(new_sink.is_empty());

    info!("after swap");
    assert_eq!(new_sink.contents(), "after swap");
    assert_eq!(old_sink.lines().len(), 200);

    shared::set_shared(original);
}

#[test]
fn test_static_setters_reach_current_logger() {
    let _guard = SERIAL.lock();

    let (sink, previous) = install_memory_logger(LogFormat::with_attributes(
        "%s %s",
        vec![Attribute::Level, Attribute::Message],
    ));

    shared::set_separator(" ");
    shared::set_terminator(";");
    shared::set_min_level(LogLevel::Warn);
    info!("suppressed");
    error!("kept", 1);
    assert_eq!(sink.contents(), "ERROR kept 1;");

    shared::set_enabled(false);
    error!("disabled");
    assert_eq!(sink.contents(), "ERROR kept 1;");
    shared::set_enabled(true);

    register_file!(LogLevel::All);
    debug!("registered");
    assert_eq!(sink.contents(), "ERROR kept 1;DEBUG registered;");

    shared::reset_format();
    assert_eq!(*shared::shared().log_format(), LogFormat::default());
    shared::flush().expect("flush shared");

    shared::set_shared(previous);
}
