//! Browser download sink
//!
//! Wraps the bytes in a PDF-typed Blob, points a temporary anchor at an
//! object URL for it, clicks the anchor and revokes the URL.

use js_sys::{Array, Uint8Array};
use pdfstitch_core::ExportSink;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlElement, Url};

const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserDownload;

impl BrowserDownload {
    fn try_save(bytes: &[u8], filename: &str) -> Result<(), JsValue> {
        let parts = Array::of1(&Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(PDF_MIME_TYPE);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let url = Url::create_object_url_with_blob(&blob)?;
        let anchor = document.create_element("a")?;
        anchor.set_attribute("href", &url)?;
        anchor.set_attribute("download", filename)?;
        let clicked = anchor
            .dyn_into::<HtmlElement>()
            .map(|a| a.click())
            .map_err(|_| JsValue::from_str("Download anchor is not an HTML element"));

        // Release the URL even when the click could not be issued
        Url::revoke_object_url(&url)?;
        clicked
    }
}

impl ExportSink for BrowserDownload {
    fn save(&mut self, bytes: &[u8], filename: &str) {
        if let Err(e) = Self::try_save(bytes, filename) {
            web_sys::console::warn_2(&JsValue::from_str("Download failed:"), &e);
        }
    }
}
