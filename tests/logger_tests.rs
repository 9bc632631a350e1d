//! The global subscriber can only be installed once per process, so these
//! live in their own test binary.

use perfviz::logger;
use tracing::{debug, info};

#[test]
fn test_logger_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("logs").join("perfviz.log");

    let guard = logger::init(&log_path, "info").unwrap();
    info!(target: "perfviz", "chart ready");
    debug!("filtered out");
    drop(guard);

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("chart ready"));
    assert!(!contents.contains("filtered out"));
    assert!(!contents.contains("\u{1b}["));

    // A second subscriber is refused rather than panicking.
    assert!(logger::init_stdout("info").is_err());
}
