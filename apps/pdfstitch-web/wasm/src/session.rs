//! Stateful pipeline session
//!
//! Holds one pipeline's selection list and status in Rust memory. The
//! workbench sits behind `Rc<RefCell<..>>` so `execute` can hand a `'static`
//! future to JavaScript; no borrow is held while the pipeline is suspended
//! on a file read.

use crate::download::BrowserDownload;
use crate::file::{from_file_list, BrowserFile};
use pdfstitch_core::{pipeline, PipelineConfig, PipelineKind, StitchError, Workbench};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// Which workflow the session drives
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Merge two or more PDFs
    Merge,
    /// Turn PNG images into a PDF, one page each
    ImagesToPdf,
}

impl From<SessionMode> for PipelineKind {
    fn from(mode: SessionMode) -> Self {
        match mode {
            SessionMode::Merge => PipelineKind::Merge,
            SessionMode::ImagesToPdf => PipelineKind::ImagesToPdf,
        }
    }
}

/// Summary handed back to JavaScript after a successful run
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunSummary {
    pub filename: String,
    pub page_count: usize,
    pub size_bytes: usize,
}

#[wasm_bindgen]
pub struct StitchSession {
    mode: SessionMode,
    bench: Rc<RefCell<Workbench<BrowserFile>>>,
}

#[wasm_bindgen]
impl StitchSession {
    #[wasm_bindgen(constructor)]
    pub fn new(mode: SessionMode) -> Self {
        Self::from_config(mode, PipelineConfig::default())
    }

    /// Create a session with overrides, e.g. `{ mergedFilename: "book.pdf" }`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(mode: SessionMode, config: JsValue) -> Result<StitchSession, JsValue> {
        let config: PipelineConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        Ok(Self::from_config(mode, config))
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Append every file of an input's `FileList`, in order
    #[wasm_bindgen(js_name = addFiles)]
    pub fn add_files(&self, files: &web_sys::FileList) {
        self.bench.borrow_mut().add_files(from_file_list(files));
    }

    #[wasm_bindgen(js_name = addFile)]
    pub fn add_file(&self, file: web_sys::File) {
        self.bench
            .borrow_mut()
            .add_files(std::iter::once(BrowserFile::new(file)));
    }

    #[wasm_bindgen(js_name = removeFile)]
    pub fn remove_file(&self, index: usize) -> Result<(), JsValue> {
        self.bench.borrow_mut().remove_file(index).map_err(to_js)
    }

    /// Display names in selection order
    #[wasm_bindgen(js_name = getFileNames)]
    pub fn get_file_names(&self) -> Result<JsValue, JsValue> {
        let names = self.bench.borrow().selection().names();
        serde_wasm_bindgen::to_value(&names)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = getFileCount)]
    pub fn get_file_count(&self) -> usize {
        self.bench.borrow().selection().len()
    }

    /// Total size of the selected files in bytes
    #[wasm_bindgen(js_name = getTotalSize)]
    pub fn get_total_size(&self) -> f64 {
        self.bench
            .borrow()
            .selection()
            .iter()
            .map(|entry| entry.file().size())
            .sum()
    }

    #[wasm_bindgen(js_name = canExecute)]
    pub fn can_execute(&self) -> bool {
        self.bench.borrow().can_execute()
    }

    /// Current status as `{ state, message? }`
    pub fn status(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.bench.borrow().status())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = statusMessage)]
    pub fn status_message(&self) -> Option<String> {
        self.bench.borrow().status().message().map(str::to_string)
    }

    /// Run the pipeline, download the result and clear the selection
    ///
    /// Resolves to `{ filename, pageCount, sizeBytes }`; rejects with the
    /// failure message, which is also left in `status()`.
    pub fn execute(&self) -> js_sys::Promise {
        let bench = Rc::clone(&self.bench);
        future_to_promise(async move {
            let files = bench.borrow_mut().begin_run().map_err(to_js)?;
            let (kind, config) = {
                let bench = bench.borrow();
                (bench.kind(), bench.config().clone())
            };

            let result = pipeline::run(kind, &files, &config).await;

            let document = bench
                .borrow_mut()
                .finish_run(result, &mut BrowserDownload)
                .map_err(to_js)?;
            let summary = RunSummary {
                size_bytes: document.bytes.len(),
                filename: document.filename,
                page_count: document.page_count,
            };
            serde_wasm_bindgen::to_value(&summary)
                .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
        })
    }
}

impl StitchSession {
    fn from_config(mode: SessionMode, config: PipelineConfig) -> Self {
        Self {
            mode,
            bench: Rc::new(RefCell::new(Workbench::with_config(mode.into(), config))),
        }
    }
}

fn to_js(e: StitchError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
