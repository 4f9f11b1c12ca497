//! Host-provided output sink used by the printing builtins
//!
//! The core never writes to the console directly: `print` and `println`
//! go through an [`OutputSink`] supplied by the embedding host. Sinks
//! are shared by every evaluation context, so implementations must
//! serialize their writes; both sinks here are line-granular (one call,
//! one atomic write, never byte-interleaved across contexts).

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Destination for `print`/`println` output.
pub trait OutputSink: Send + Sync {
    /// Emit `text` followed by a newline, as one atomic write.
    fn write_line(&self, text: &str);

    /// Emit `text` without a trailing newline, as one atomic write.
    fn write(&self, text: &str);
}

/// Sink that writes to the process's standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&self, text: &str) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        // Ignore broken-pipe style failures, like println! does.
        let _ = writeln!(lock, "{}", text);
        let _ = lock.flush();
    }

    fn write(&self, text: &str) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        let _ = write!(lock, "{}", text);
        let _ = lock.flush();
    }
}

/// Sink that collects output in memory, for tests and embedders that
/// want to capture program output.
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
    pending: Mutex<String>,
}

impl BufferSink {
    /// Create an empty, shareable buffer sink.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The completed lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Everything written so far, newline-joined, including any
    /// unterminated trailing `print` output.
    pub fn contents(&self) -> String {
        let mut out = self.lines.lock().join("\n");
        let pending = self.pending.lock();
        if !pending.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&pending);
        }
        out
    }
}

impl OutputSink for BufferSink {
    fn write_line(&self, text: &str) {
        let mut pending = self.pending.lock();
        let mut line = std::mem::take(&mut *pending);
        line.push_str(text);
        self.lines.lock().push(line);
    }

    fn write(&self, text: &str) {
        self.pending.lock().push_str(text);
    }
}
