//! WASM bindings for PDF merging and image-to-PDF conversion
//!
//! Selection lists and operation status live in Rust; JavaScript only wires
//! file inputs and buttons to a `StitchSession` and renders `status()`.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { StitchSession, SessionMode } from './pkg/pdfstitch_wasm.js';
//!
//! await init();
//!
//! const merge = new StitchSession(SessionMode.Merge);
//! pdfInput.onchange = (e) => merge.addFiles(e.target.files);
//! mergeButton.onclick = async () => {
//!     try {
//!         await merge.execute(); // downloads merged.pdf
//!     } finally {
//!         render(merge.status(), merge.getFileNames());
//!     }
//! };
//!
//! const images = new StitchSession(SessionMode.ImagesToPdf);
//! images.addFiles(pngInput.files);
//! await images.execute(); // downloads images.pdf
//! ```

pub mod download;
pub mod file;
pub mod session;

use pdfstitch_core::{PageInfo, PipelineConfig};
use wasm_bindgen::prelude::*;

pub use download::BrowserDownload;
pub use file::BrowserFile;
pub use session::{SessionMode, StitchSession};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"PdfStitch WASM initialized".into());
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Header and `%%EOF` check without a full parse
#[wasm_bindgen(js_name = quickValidate)]
pub fn quick_validate(name: &str, bytes: &[u8]) -> Result<(), JsValue> {
    pdfstitch_core::quick_validate(name, bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Page count, version, encryption and metadata of a PDF
/// Useful for showing file details before merging
#[wasm_bindgen(js_name = getPdfInfo)]
pub fn get_pdf_info(name: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info =
        pdfstitch_core::validate_pdf(name, bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen(js_name = getPageCount)]
pub fn get_page_count(bytes: &[u8]) -> Result<u32, JsValue> {
    pdfstitch_core::get_page_count(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Size, rotation and orientation of every page, in page order
#[wasm_bindgen(js_name = getPageSizes)]
pub fn get_page_sizes(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse PDF: {}", e)))?;
    let pages =
        PageInfo::all_from_document(&doc).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&pages)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Execute a JSON command (`{"type":"Merge","files":[...]}`) and return a
/// JSON result; meant for use from a Web Worker
#[wasm_bindgen(js_name = processCommand)]
pub fn process_command(command: &str) -> String {
    pdfstitch_core::process_json(command, &PipelineConfig::default())
}

/// Format bytes as human-readable string
#[wasm_bindgen]
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
