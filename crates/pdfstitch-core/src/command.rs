//! JSON command interface
//!
//! Worker-message style entry point: one serialized command in, one
//! serialized result out, with the PDF base64-encoded.

use crate::config::PipelineConfig;
use crate::error::StitchError;
use crate::image::images_to_pdf;
use crate::merge::merge_documents;
use crate::pipeline::PipelineKind;
use base64::Engine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CommandFile {
    pub name: String,
    /// Base64-encoded file contents
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StitchCommand {
    Merge {
        files: Vec<CommandFile>,
    },
    ImagesToPdf {
        images: Vec<CommandFile>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub success: bool,
    pub filename: Option<String>,
    /// Base64-encoded PDF data
    pub data: Option<String>,
    pub error: Option<String>,
    pub metrics: Option<ProcessMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: u32,
}

impl ProcessResult {
    fn failure(error: StitchError) -> Self {
        Self {
            success: false,
            filename: None,
            data: None,
            error: Some(error.to_string()),
            metrics: None,
        }
    }
}

/// Parse and execute a JSON command, returning a JSON result
pub fn process_json(command: &str, config: &PipelineConfig) -> String {
    let result = match serde_json::from_str::<StitchCommand>(command) {
        Ok(cmd) => execute(cmd, config),
        Err(e) => ProcessResult::failure(StitchError::SerializationError(e.to_string())),
    };
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"error":"Serialization error: {}"}}"#, e)
    })
}

/// Execute a decoded command
pub fn execute(command: StitchCommand, config: &PipelineConfig) -> ProcessResult {
    match run(command, config) {
        Ok(Built {
            filename,
            input_size,
            bytes,
            page_count,
        }) => ProcessResult {
            success: true,
            filename: Some(filename),
            metrics: Some(ProcessMetrics {
                input_size_bytes: input_size,
                output_size_bytes: bytes.len(),
                page_count: page_count as u32,
            }),
            data: Some(base64::engine::general_purpose::STANDARD.encode(&bytes)),
            error: None,
        },
        Err(e) => ProcessResult::failure(e),
    }
}

/// Output of a successful command before encoding
struct Built {
    filename: String,
    input_size: usize,
    bytes: Vec<u8>,
    page_count: usize,
}

fn run(command: StitchCommand, config: &PipelineConfig) -> Result<Built, StitchError> {
    match command {
        StitchCommand::Merge { files } => {
            PipelineKind::Merge.check_inputs(files.len())?;
            let (inputs, (bytes, page_count)) = decode_files(files)
                .and_then(|inputs| {
                    let built = merge_documents(&inputs, config.compress)?;
                    Ok((inputs, built))
                })
                .map_err(|e| StitchError::MergeFailed(Box::new(e)))?;
            Ok(Built {
                filename: config.merged_filename.clone(),
                input_size: inputs.iter().map(|(_, b)| b.len()).sum(),
                bytes,
                page_count,
            })
        }
        StitchCommand::ImagesToPdf { images } => {
            PipelineKind::ImagesToPdf.check_inputs(images.len())?;
            let (inputs, (bytes, page_count)) = decode_files(images)
                .and_then(|inputs| {
                    let built = images_to_pdf(&inputs, config.compress)?;
                    Ok((inputs, built))
                })
                .map_err(|e| StitchError::ConvertFailed(Box::new(e)))?;
            Ok(Built {
                filename: config.images_filename.clone(),
                input_size: inputs.iter().map(|(_, b)| b.len()).sum(),
                bytes,
                page_count,
            })
        }
    }
}

fn decode_files(files: Vec<CommandFile>) -> Result<Vec<(String, Vec<u8>)>, StitchError> {
    files
        .into_iter()
        .map(|f| {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(f.data.as_bytes())
                .map_err(|e| StitchError::ReadError {
                    name: f.name.clone(),
                    reason: e.to_string(),
                })?;
            Ok((f.name, bytes))
        })
        .collect()
}
