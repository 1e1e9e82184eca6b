// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! A [`Write`] sink that keeps everything written to it in memory, for tests and
//! for programmatically examining log output.
//!
//! Clones share one buffer: hand one clone to a handler and keep the other to
//! read what was logged.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// A cloneable, thread-safe in-memory byte sink.
///
/// # Example
///
/// ```rust
/// use ctxlog::context::Context;
/// use ctxlog::{ContextHandler, HandlerOptions, InMemorySink, Logger};
///
/// let sink = InMemorySink::new();
/// let logger = Logger::new(ContextHandler::new(sink.clone(), HandlerOptions::new()));
///
/// logger.warn_ctx(&Context::background(), "Something suspicious happened", &[]).unwrap();
///
/// let logs = sink.drain_logs();
/// assert!(logs.contains(r#""msg":"Something suspicious happened""#));
/// assert_eq!(sink.drain_logs(), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug/Default: derived
// - Clone: derived, and deliberately shallow: clones observe the same buffer
// - PartialEq/Eq/Hash: NOT implemented, buffer contents change underneath
// - Send/Sync: automatic through Arc<Mutex<_>>

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes everything written so far, without the trailing newline.
    ///
    /// The buffer is empty afterwards.
    pub fn drain_logs(&self) -> String {
        let bytes = std::mem::take(&mut *self.buffer.lock());
        let text = String::from_utf8_lossy(&bytes);
        text.strip_suffix('\n').unwrap_or(&text[..]).to_string()
    }

    /// Takes everything written so far, one entry per line.
    pub fn drain_lines(&self) -> Vec<String> {
        let logs = self.drain_logs();
        if logs.is_empty() {
            return Vec::new();
        }
        logs.lines().map(str::to_string).collect()
    }
}

impl Write for InMemorySink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
