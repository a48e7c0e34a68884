//! Page geometry
//!
//! Reads the effective size and rotation of pages, following the page tree
//! for inherited values.

use crate::error::StitchError;
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;

/// Information about a single PDF page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub page_num: u32,
    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i32,
    pub orientation: PageOrientation,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
    Square,
}

impl PageInfo {
    pub fn from_document(doc: &Document, page_num: u32) -> Result<Self, StitchError> {
        let pages = doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or_else(|| StitchError::OperationError(format!("Page {} not found", page_num)))?;

        let page_dict = doc.get_dictionary(*page_id).map_err(|_| {
            StitchError::OperationError(format!("Page {} is not a dictionary", page_num))
        })?;

        let media_box = match inherited(doc, page_dict, b"MediaBox") {
            Some(obj) => parse_box(obj)?,
            // US Letter
            None => [0.0, 0.0, 612.0, 792.0],
        };
        let (width, height) = (media_box[2] - media_box[0], media_box[3] - media_box[1]);

        let rotation = inherited(doc, page_dict, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .map(|angle| normalize_rotation(angle as i32))
            .unwrap_or(0);

        let (effective_width, effective_height) = if rotation == 90 || rotation == 270 {
            (height, width)
        } else {
            (width, height)
        };

        let orientation = if (effective_width - effective_height).abs() < 1.0 {
            PageOrientation::Square
        } else if effective_width > effective_height {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        };

        Ok(Self {
            page_num,
            width: width as f32,
            height: height as f32,
            rotation,
            orientation,
        })
    }

    /// Get all page infos for a document, in page order
    pub fn all_from_document(doc: &Document) -> Result<Vec<Self>, StitchError> {
        (1..=doc.get_pages().len() as u32)
            .map(|page_num| Self::from_document(doc, page_num))
            .collect()
    }
}

/// Look up `key` on the page, then on each ancestor
fn inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut node = page;
    // Bounded walk; malformed files can have cyclic Parent links
    for _ in 0..64 {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Parse a box array [x1, y1, x2, y2]
fn parse_box(obj: &Object) -> Result<[f64; 4], StitchError> {
    let array = obj
        .as_array()
        .map_err(|_| StitchError::OperationError("MediaBox is not an array".into()))?;
    if array.len() != 4 {
        return Err(StitchError::OperationError(
            "MediaBox must have 4 elements".into(),
        ));
    }

    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => {
                return Err(StitchError::OperationError(format!(
                    "MediaBox element {} is not a number",
                    i
                )))
            }
        };
    }

    Ok(result)
}

fn normalize_rotation(angle: i32) -> i32 {
    angle.rem_euclid(360)
}
