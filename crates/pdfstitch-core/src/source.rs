//! Input boundary
//!
//! A `FileSource` is an opaque handle to one user-provided file: a display
//! name and a single-shot, awaited read of its full contents.

use crate::error::StitchError;

/// Handle to one user-selected file.
///
/// Reads never consume the handle, so a selection can be read again after a
/// failed run.
#[allow(async_fn_in_trait)]
pub trait FileSource {
    /// Display name shown to the user and used in error messages
    fn name(&self) -> &str;

    /// Read the entire file into memory
    async fn read_bytes(&self) -> Result<Vec<u8>, StitchError>;
}

/// A file already held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, StitchError> {
        Ok(self.bytes.clone())
    }
}
