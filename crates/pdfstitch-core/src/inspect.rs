//! PDF inspection
//!
//! Cheap checks and summary details for a PDF before it is merged, so a UI
//! can show page counts and flag obviously broken files early.

use crate::error::StitchError;
use lopdf::{Dictionary, Document};
use serde::Serialize;

/// Summary of a PDF file
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct PdfInfo {
    pub page_count: u32,
    /// PDF version from the header (e.g., "1.7")
    pub version: String,
    pub encrypted: bool,
    pub size_bytes: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Parse a PDF and collect its summary
pub fn validate_pdf(name: &str, bytes: &[u8]) -> Result<PdfInfo, StitchError> {
    check_header(name, bytes)?;

    let document = Document::load_mem(bytes).map_err(|e| StitchError::ParseError {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(StitchError::ParseError {
            name: name.to_string(),
            reason: "PDF has no pages".into(),
        });
    }

    let info = info_dictionary(&document);
    Ok(PdfInfo {
        page_count,
        version: header_version(bytes),
        encrypted: document.is_encrypted(),
        size_bytes: bytes.len(),
        title: info.and_then(|d| text_entry(d, b"Title")),
        author: info.and_then(|d| text_entry(d, b"Author")),
    })
}

/// Header and trailer sanity check without parsing (for large files)
pub fn quick_validate(name: &str, bytes: &[u8]) -> Result<(), StitchError> {
    check_header(name, bytes)?;

    let tail = &bytes[bytes.len().saturating_sub(1024)..];
    if !tail.windows(5).any(|w| w == b"%%EOF") {
        return Err(StitchError::ParseError {
            name: name.to_string(),
            reason: "PDF appears truncated (missing %%EOF marker)".into(),
        });
    }

    Ok(())
}

fn check_header(name: &str, bytes: &[u8]) -> Result<(), StitchError> {
    let reason = if bytes.len() < 8 {
        "File too small to be a valid PDF"
    } else if !bytes.starts_with(b"%PDF-") {
        "Not a valid PDF file (missing %PDF- header)"
    } else {
        return Ok(());
    };
    Err(StitchError::ParseError {
        name: name.to_string(),
        reason: reason.into(),
    })
}

/// Version from a `%PDF-x.y` header
fn header_version(bytes: &[u8]) -> String {
    bytes
        .get(5..8)
        .and_then(|v| std::str::from_utf8(v).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "1.4".to_string())
}

fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    let id = document.trailer.get(b"Info").ok()?.as_reference().ok()?;
    document.get_dictionary(id).ok()
}

fn text_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let bytes = dict.get(key).ok()?.as_str().ok()?;
    let decoded = String::from_utf8_lossy(bytes);
    (!decoded.is_empty()).then(|| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::tests::create_test_pdf;
    use lopdf::{Object, StringFormat};

    fn with_info(bytes: &[u8], title: &str) -> Vec<u8> {
        let mut doc = Document::load_mem(bytes).unwrap();
        let info = Dictionary::from_iter(vec![(
            "Title",
            Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
        )]);
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", Object::Reference(info_id));
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_quick_validate_rejects_non_pdf() {
        assert!(quick_validate("x", b"not a pdf file").is_err());
    }

    #[test]
    fn test_quick_validate_rejects_small_file() {
        let err = quick_validate("x", b"tiny").unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_quick_validate_rejects_truncated() {
        let pdf = create_test_pdf(1, "T");
        let truncated = &pdf[..pdf.len() - 10];
        assert!(quick_validate("t.pdf", truncated).is_err());
    }

    #[test]
    fn test_quick_validate_accepts_valid_pdf() {
        assert!(quick_validate("ok.pdf", &create_test_pdf(1, "Ok")).is_ok());
    }

    #[test]
    fn test_validate_pdf_reports_details() {
        let pdf = with_info(&create_test_pdf(5, "Info"), "Quarterly");
        let info = validate_pdf("q.pdf", &pdf).unwrap();

        assert_eq!(info.page_count, 5);
        assert_eq!(info.version, "1.5");
        assert!(!info.encrypted);
        assert_eq!(info.size_bytes, pdf.len());
        assert_eq!(info.title.as_deref(), Some("Quarterly"));
        assert_eq!(info.author, None);
    }

    #[test]
    fn test_validate_pdf_rejects_invalid_data() {
        assert!(validate_pdf("bad.pdf", b"not a valid pdf").is_err());
    }

    #[test]
    fn test_header_version() {
        assert_eq!(header_version(b"%PDF-1.7\n"), "1.7");
        assert_eq!(header_version(b"%PDF-2.0\n"), "2.0");
        assert_eq!(header_version(b"%PD"), "1.4");
    }
}
