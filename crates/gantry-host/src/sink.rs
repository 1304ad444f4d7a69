//! Output sinks for host callables.
//!
//! Host callables never print directly; they write through the sink held
//! in the store's `HostState`. That keeps guest-visible side effects
//! observable in tests and lets an embedder redirect guest output.

use std::sync::Mutex;

/// Destination for lines emitted by host callables.
pub trait OutputSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes each line to the process's stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}

/// Captures lines in memory. Used by tests to assert on guest output.
#[derive(Debug, Default)]
pub struct CaptureSink {
    lines: Mutex<Vec<String>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("sink lock poisoned").clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().expect("sink lock poisoned").is_empty()
    }
}

impl OutputSink for CaptureSink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .expect("sink lock poisoned")
            .push(line.to_string());
    }
}
