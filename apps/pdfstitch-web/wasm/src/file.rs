//! Browser file handles
//!
//! Wraps a `File` from an `<input type="file">` selection. Contents are read
//! with `Blob.arrayBuffer()` when a pipeline runs, not when the file is
//! picked.

use js_sys::Uint8Array;
use pdfstitch_core::{FileSource, StitchError};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList};

#[derive(Debug, Clone)]
pub struct BrowserFile {
    name: String,
    file: File,
}

impl BrowserFile {
    pub fn new(file: File) -> Self {
        Self {
            name: file.name(),
            file,
        }
    }

    /// Size reported by the browser, without reading the file
    pub fn size(&self) -> f64 {
        self.file.size()
    }
}

impl FileSource for BrowserFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, StitchError> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|e| StitchError::ReadError {
                name: self.name.clone(),
                reason: e.as_string().unwrap_or_else(|| format!("{:?}", e)),
            })?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}

/// Collect a `FileList` in selection order
pub fn from_file_list(files: &FileList) -> Vec<BrowserFile> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .map(BrowserFile::new)
        .collect()
}
