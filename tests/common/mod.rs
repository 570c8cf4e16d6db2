#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Mutex, Once};
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use commitgen::sink::LogSink;
use commitgen::supervise::{Limits, ToolCommand};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// A sink that records every visible line for assertions.
#[derive(Debug, Default)]
pub struct CapturingSink {
    lines: Mutex<Vec<String>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for CapturingSink {
    fn line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Build a tool command that runs `script` through `sh -c`.
///
/// Integration tests stand in for the external tool with small shell
/// scripts, executed the same way the production path runs any resolved
/// binary.
pub fn sh_tool(script: &str) -> ToolCommand {
    ToolCommand {
        program: PathBuf::from("sh"),
        args: vec!["-c".to_string(), script.to_string()],
        cwd: None,
    }
}

/// Limits that keep tests fast: a generous budget (the watchdog must not
/// fire in these tests) and short kill/supersede windows.
pub fn test_limits() -> Limits {
    Limits {
        budget: Duration::from_secs(40),
        grace: Duration::from_millis(200),
        supersede_wait: Duration::from_millis(1_500),
    }
}
