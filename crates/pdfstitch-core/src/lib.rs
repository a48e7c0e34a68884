//! PDF merging and image-to-PDF conversion
//!
//! This crate provides client-side document assembly using lopdf:
//! - `pipeline::merge`: combine several PDFs, pages in list order
//! - `pipeline::convert`: one page per PNG image, sized to its pixels
//!
//! Pipelines are plain async functions over a [`FileSource`] list. The
//! [`Workbench`] adds the selection list, status slot and export step a UI
//! needs around them.

pub mod builder;
pub mod command;
pub mod config;
pub mod error;
pub mod export;
pub mod image;
pub mod inspect;
pub mod merge;
pub mod page_info;
pub mod pipeline;
pub mod selection;
pub mod source;
pub mod status;
pub mod workbench;

pub use command::{process_json, ProcessMetrics, ProcessResult, StitchCommand};
pub use config::PipelineConfig;
pub use error::StitchError;
pub use export::{ExportSink, MemorySink};
pub use inspect::{quick_validate, validate_pdf, PdfInfo};
pub use page_info::{PageInfo, PageOrientation};
pub use pipeline::{convert, merge, ConversionResult, ExportedDocument, PipelineKind};
pub use selection::{SelectionEntry, SelectionList};
pub use source::{FileSource, MemoryFile};
pub use status::{OperationStatus, StatusReporter};
pub use workbench::Workbench;

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, StitchError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| StitchError::OperationError(format!("Failed to parse PDF: {}", e)))?;
    Ok(doc.get_pages().len() as u32)
}
