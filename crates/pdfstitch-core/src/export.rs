//! Export sink
//!
//! Receives finished document bytes and a filename. Saving is treated as
//! infallible by the pipelines; hosts log their own failures.

/// Destination for finished documents
pub trait ExportSink {
    fn save(&mut self, bytes: &[u8], filename: &str);
}

/// A saved document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Keeps every saved document in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Vec<SavedFile>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> &[SavedFile] {
        &self.saved
    }

    pub fn last(&self) -> Option<&SavedFile> {
        self.saved.last()
    }
}

impl ExportSink for MemorySink {
    fn save(&mut self, bytes: &[u8], filename: &str) {
        self.saved.push(SavedFile {
            filename: filename.to_string(),
            bytes: bytes.to_vec(),
        });
    }
}
