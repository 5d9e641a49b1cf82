//! In-memory sink for capturing log output.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

/// Shared buffer that collects everything written through it.
///
/// Clones share the same buffer, so one clone can be handed to the logger
/// while another is used to read the output back.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        // A poisoned buffer still holds valid bytes.
        self.buf.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Captured output as UTF-8 (lossy).
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Parse each captured line as JSON, skipping lines that do not parse.
    pub fn json_lines(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl io::Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
