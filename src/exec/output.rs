// src/exec/output.rs

//! Destination for child process output.
//!
//! The executor never writes to the process-wide stdout/stderr directly; it
//! is handed an [`OutputSink`] instead so tests can capture what tasks print.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::warn;

/// Which child stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable pair of writers receiving task output, one line at a time,
/// prefixed with the task id.
#[derive(Clone)]
pub struct OutputSink {
    stdout: SharedWriter,
    stderr: SharedWriter,
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

impl OutputSink {
    pub fn new(stdout: impl Write + Send + 'static, stderr: impl Write + Send + 'static) -> Self {
        Self {
            stdout: Arc::new(Mutex::new(Box::new(stdout))),
            stderr: Arc::new(Mutex::new(Box::new(stderr))),
        }
    }

    /// Sink forwarding to this process's stdout/stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    /// Sink that discards everything.
    pub fn null() -> Self {
        Self::new(io::sink(), io::sink())
    }

    pub fn write_line(&self, stream: Stream, task_id: &str, line: &str) {
        let writer = match stream {
            Stream::Stdout => &self.stdout,
            Stream::Stderr => &self.stderr,
        };

        let mut guard = match writer.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = writeln!(guard, "[{task_id}] {line}") {
            warn!(task = %task_id, error = %e, "failed to forward task output");
        }
    }
}
