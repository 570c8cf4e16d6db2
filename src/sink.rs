// src/sink.rs

//! Write-only, line-oriented sink for the visible run log.
//!
//! The sink receives every non-marker line from both of the tool's output
//! streams, plus synthesized status lines (run started, timed out, exited
//! with code N). Production code uses [`StderrSink`]; tests can provide
//! their own implementation that captures lines in memory.

/// Destination for visible log lines.
pub trait LogSink: Send + Sync {
    fn line(&self, line: &str);
}

/// Production sink: tool output goes to stderr so stdout stays reserved
/// for the extracted payload.
#[derive(Debug, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn line(&self, line: &str) {
        eprintln!("{line}");
    }
}
