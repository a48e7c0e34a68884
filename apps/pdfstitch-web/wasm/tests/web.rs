//! Browser tests for the session bindings
//!
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Reflect, Uint8Array};
use lopdf::{Dictionary, Object};
use pdfstitch_core::builder::OutputDocument;
use pdfstitch_wasm::{SessionMode, StitchSession};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::File;

wasm_bindgen_test_configure!(run_in_browser);

/// A PDF with `pages` empty Letter-size pages
fn blank_pdf(pages: usize) -> Vec<u8> {
    let mut out = OutputDocument::new();
    for _ in 0..pages {
        let page = Dictionary::from_iter(vec![(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        )]);
        out.push_page(page);
    }
    out.finish(true).unwrap()
}

fn browser_file(name: &str, bytes: &[u8]) -> File {
    let parts = Array::of1(&Uint8Array::from(bytes));
    File::new_with_u8_array_sequence(&parts, name).unwrap()
}

fn state_of(session: &StitchSession) -> String {
    let status = session.status().unwrap();
    Reflect::get(&status, &JsValue::from_str("state"))
        .unwrap()
        .as_string()
        .unwrap()
}

#[wasm_bindgen_test]
async fn merge_session_downloads_and_clears() {
    let session = StitchSession::new(SessionMode::Merge);
    session.add_file(browser_file("a.pdf", &blank_pdf(1)));
    session.add_file(browser_file("b.pdf", &blank_pdf(2)));
    assert!(session.can_execute());

    let summary = JsFuture::from(session.execute()).await.unwrap();
    let pages = Reflect::get(&summary, &JsValue::from_str("pageCount"))
        .unwrap()
        .as_f64()
        .unwrap();

    assert_eq!(pages, 3.0);
    assert_eq!(session.get_file_count(), 0);
    assert_eq!(state_of(&session), "success");
}

#[wasm_bindgen_test]
async fn merge_session_with_one_file_is_rejected() {
    let session = StitchSession::new(SessionMode::Merge);
    session.add_file(browser_file("a.pdf", &blank_pdf(1)));

    let err = JsFuture::from(session.execute()).await.unwrap_err();

    assert_eq!(
        err.as_string().unwrap(),
        "Please upload at least 2 PDFs to merge"
    );
    assert_eq!(session.get_file_count(), 1);
    assert_eq!(state_of(&session), "failure");
}

#[wasm_bindgen_test]
async fn image_session_rejects_non_png() {
    let session = StitchSession::new(SessionMode::ImagesToPdf);
    session.add_file(browser_file("photo.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]));

    let err = JsFuture::from(session.execute()).await.unwrap_err();

    assert!(err
        .as_string()
        .unwrap()
        .starts_with("Error converting images to PDF: "));
    assert_eq!(session.get_file_count(), 1);
}

#[wasm_bindgen_test]
fn remove_file_keeps_order() {
    let session = StitchSession::new(SessionMode::ImagesToPdf);
    session.add_file(browser_file("a.png", &[]));
    session.add_file(browser_file("b.png", &[]));
    session.remove_file(0).unwrap();

    let names: Vec<String> =
        serde_wasm_bindgen::from_value(session.get_file_names().unwrap()).unwrap();
    assert_eq!(names, vec!["b.png".to_string()]);
    assert!(session.remove_file(5).is_err());
}
