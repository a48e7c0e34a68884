//! Output document under construction
//!
//! Both pipelines start from an empty document with a single flat page tree
//! and append pages to it one at a time.

use crate::error::StitchError;
use lopdf::{Dictionary, Document, Object, ObjectId};

pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    page_refs: Vec<ObjectId>,
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDocument {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            doc,
            pages_id,
            page_refs: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    /// Mutable access for importing objects
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Store a page dictionary and append it to the page tree
    pub fn push_page(&mut self, mut page: Dictionary) -> ObjectId {
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(self.pages_id));
        let id = self.doc.add_object(page);
        self.page_refs.push(id);
        id
    }

    /// Append a page whose dictionary is already stored under `id`
    pub fn push_existing_page(&mut self, id: ObjectId) -> Result<(), StitchError> {
        let pages_id = self.pages_id;
        match self.doc.objects.get_mut(&id) {
            Some(Object::Dictionary(page)) => {
                page.set("Parent", Object::Reference(pages_id));
            }
            _ => {
                return Err(StitchError::OperationError(format!(
                    "Page object {} {} R is not a dictionary",
                    id.0, id.1
                )))
            }
        }
        self.page_refs.push(id);
        Ok(())
    }

    /// Write the page tree and serialize the document
    pub fn finish(mut self, compress: bool) -> Result<Vec<u8>, StitchError> {
        let kids = self
            .page_refs
            .iter()
            .map(|&id| Object::Reference(id))
            .collect::<Vec<_>>();
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(self.page_refs.len() as i64)),
            ("Kids", Object::Array(kids)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        // Drop leftovers of imported documents (old catalogs, page trees)
        self.doc.prune_objects();
        if compress {
            self.doc.compress();
        }

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| StitchError::OperationError(format!("Failed to save PDF: {}", e)))?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_output_is_valid_pdf() {
        let bytes = OutputDocument::new().finish(true).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }

    #[test]
    fn test_pages_are_kept_in_push_order() {
        let mut out = OutputDocument::new();
        let mut ids = Vec::new();
        for width in [100, 200, 300] {
            let page = Dictionary::from_iter(vec![(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(50),
                ]),
            )]);
            ids.push(out.push_page(page));
        }
        assert_eq!(out.page_count(), 3);

        let doc = Document::load_mem(&out.finish(false).unwrap()).unwrap();
        let widths: Vec<i64> = doc
            .get_pages()
            .values()
            .map(|id| {
                let page = doc.get_dictionary(*id).unwrap();
                page.get(b"MediaBox").unwrap().as_array().unwrap()[2]
                    .as_i64()
                    .unwrap()
            })
            .collect();
        assert_eq!(widths, vec![100, 200, 300]);
    }

    #[test]
    fn test_push_existing_page_requires_dictionary() {
        let mut out = OutputDocument::new();
        let id = out.document_mut().add_object(Object::Integer(7));
        assert!(out.push_existing_page(id).is_err());
    }
}
