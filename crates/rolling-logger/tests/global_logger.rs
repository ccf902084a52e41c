//! Global logger installation
//!
//! Runs in its own process, so installing the global subscriber here does
//! not interfere with the unit tests.

use std::fs;

use rolling_logger::{init_logger_with, LoggerError, LoggerOptions};

#[test]
fn test_global_logger_captures_log_and_tracing_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = LoggerOptions::new(dir.path(), "kanban-it");
    options.max_files = 2;
    init_logger_with(options.clone()).unwrap();

    // `log` records are bridged into tracing
    log::info!("board 7 loaded");
    log::debug!("below the INFO filter");
    rolling_logger::warn("save retried later").unwrap();
    rolling_logger::error("store unreachable").unwrap();

    let lines = rolling_logger::recent_lines();
    assert!(lines.iter().any(|l| l.contains("board 7 loaded")), "{:?}", lines);
    assert!(lines.iter().any(|l| l.contains("WARN") && l.contains("save retried later")));
    assert!(lines.iter().any(|l| l.contains("ERROR") && l.contains("store unreachable")));
    assert!(!lines.iter().any(|l| l.contains("below the INFO filter")));

    let log_dir = rolling_logger::log_dir().expect("log file open");
    assert_eq!(fs::canonicalize(&log_dir).unwrap(), fs::canonicalize(dir.path()).unwrap());

    let files: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("board 7 loaded"));
    assert!(!content.contains('\u{1b}'), "file output carries no ANSI codes");

    assert!(matches!(init_logger_with(options), Err(LoggerError::AlreadyInitialized)));
}
