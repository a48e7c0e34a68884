//! PDF Merge algorithm
//!
//! Copies every page of each source document, in order, into one output
//! document.

use crate::builder::OutputDocument;
use crate::error::StitchError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `Parent` chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

/// Import all pages of one PDF into the output, returning how many were added
///
/// The algorithm:
/// 1. Parse the source and reject encrypted documents
/// 2. Flatten inherited attributes onto each page
/// 3. Shift every object id above the output's current maximum
/// 4. Copy the objects and append the pages in source order
pub fn import_pdf(
    out: &mut OutputDocument,
    name: &str,
    bytes: &[u8],
) -> Result<usize, StitchError> {
    let source = Document::load_mem(bytes).map_err(|e| StitchError::ParseError {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    if source.is_encrypted() {
        return Err(StitchError::Encrypted {
            name: name.to_string(),
        });
    }

    // Pages come back keyed by page number, so values() is page order
    let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();

    let mut flattened = BTreeMap::new();
    for &page_id in &source_pages {
        flattened.insert(page_id, flatten_page(&source, page_id)?);
    }

    let dest = out.document_mut();
    let id_offset = dest.max_id;

    for (old_id, object) in source.objects.into_iter() {
        let object = match flattened.remove(&old_id) {
            Some(page) => Object::Dictionary(page),
            None => object,
        };
        let new_id = (old_id.0 + id_offset, old_id.1);
        dest.objects
            .insert(new_id, remap_object_refs(object, id_offset));
    }
    dest.max_id = (source.max_id + id_offset).max(dest.max_id);

    for old_page_ref in &source_pages {
        out.push_existing_page((old_page_ref.0 + id_offset, old_page_ref.1))?;
    }

    tracing::debug!(name, pages = source_pages.len(), "imported PDF pages");
    Ok(source_pages.len())
}

/// Merge already-loaded PDFs into one, in the given order
///
/// Returns the saved bytes together with the merged page count.
pub fn merge_documents(
    documents: &[(String, Vec<u8>)],
    compress: bool,
) -> Result<(Vec<u8>, usize), StitchError> {
    if documents.is_empty() {
        return Err(StitchError::OperationError("No documents to merge".into()));
    }

    let mut out = OutputDocument::new();
    let mut page_count = 0;
    for (name, bytes) in documents {
        page_count += import_pdf(&mut out, name, bytes)?;
    }
    Ok((out.finish(compress)?, page_count))
}

/// Copy a page dictionary with inherited attributes made explicit
fn flatten_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, StitchError> {
    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|e| {
            StitchError::OperationError(format!(
                "Page object {} {} R is unreadable: {}",
                page_id.0, page_id.1, e
            ))
        })?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(page)
}

/// Recursively remap object references in an object
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(dict) => Object::Dictionary(remap_dictionary(dict, offset)),
        Object::Stream(mut stream) => {
            stream.dict = remap_dictionary(stream.dict, offset);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dictionary(mut dict: Dictionary, offset: u32) -> Dictionary {
    for (_, value) in dict.iter_mut() {
        let taken = std::mem::replace(value, Object::Null);
        *value = remap_object_refs(taken, offset);
    }
    dict
}
