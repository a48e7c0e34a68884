use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StitchError {
    #[error("Please upload at least 2 PDFs to merge")]
    NotEnoughPdfs,

    #[error("Please upload at least 1 image to convert to PDF")]
    NoImages,

    #[error("A conversion is already in progress")]
    Busy,

    #[error("Index {index} is out of range (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to read {name}: {reason}")]
    ReadError { name: String, reason: String },

    #[error("Failed to parse PDF {name}: {reason}")]
    ParseError { name: String, reason: String },

    #[error("{name} is encrypted")]
    Encrypted { name: String },

    #[error("Failed to decode image {name}: {reason}")]
    ImageDecode { name: String, reason: String },

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Error merging PDFs: {0}")]
    MergeFailed(Box<StitchError>),

    #[error("Error converting images to PDF: {0}")]
    ConvertFailed(Box<StitchError>),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl StitchError {
    /// True for input-count failures reported before any file is read.
    pub fn is_precondition(&self) -> bool {
        matches!(self, StitchError::NotEnoughPdfs | StitchError::NoImages)
    }
}
