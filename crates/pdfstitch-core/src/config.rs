//! Pipeline configuration
//!
//! There is no config file; hosts pass a (possibly partial) object and
//! missing fields fall back to the defaults.

use crate::error::StitchError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MERGED_FILENAME: &str = "merged.pdf";
pub const DEFAULT_IMAGES_FILENAME: &str = "images.pdf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Download name for merged PDFs
    pub merged_filename: String,
    /// Download name for image conversions
    pub images_filename: String,
    /// Flate-compress content streams in the output
    pub compress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            merged_filename: DEFAULT_MERGED_FILENAME.to_string(),
            images_filename: DEFAULT_IMAGES_FILENAME.to_string(),
            compress: true,
        }
    }
}

impl PipelineConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(s: &str) -> Result<Self, StitchError> {
        serde_json::from_str(s).map_err(|e| StitchError::SerializationError(e.to_string()))
    }
}
