//! Ordered selection of user-provided files
//!
//! A selection only grows by appending a batch and only shrinks by removing
//! one entry by position (or by clearing it after a successful run). Entries
//! are never edited in place, and insertion order is the page order of the
//! output document.

use crate::error::StitchError;
use crate::source::FileSource;

/// One selected file together with its display name
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEntry<F> {
    name: String,
    file: F,
}

impl<F: FileSource> SelectionEntry<F> {
    pub fn new(file: F) -> Self {
        Self {
            name: file.name().to_string(),
            file,
        }
    }
}

impl<F> SelectionEntry<F> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file(&self) -> &F {
        &self.file
    }
}

/// Ordered list of selected files for one pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionList<F> {
    entries: Vec<SelectionEntry<F>>,
}

impl<F> Default for SelectionList<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: FileSource> SelectionList<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of files at the end, keeping the batch's order.
    ///
    /// No deduplication and no type checks: the file picker's filter is the
    /// only gate.
    pub fn append<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = F>,
    {
        self.entries
            .extend(files.into_iter().map(SelectionEntry::new));
    }
}

impl<F> SelectionList<F> {
    /// Remove exactly one entry by position
    pub fn remove_at(&mut self, index: usize) -> Result<SelectionEntry<F>, StitchError> {
        if index >= self.entries.len() {
            return Err(StitchError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionEntry<F>> {
        self.entries.iter()
    }

    /// Display names in selection order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}

impl<F: Clone> SelectionList<F> {
    /// Copy out the file handles for a pipeline run
    pub fn snapshot(&self) -> Vec<F> {
        self.entries.iter().map(|e| e.file.clone()).collect()
    }
}
