//! Merge and image-to-PDF pipelines
//!
//! Each pipeline takes its input list explicitly and returns a result; it
//! never touches selection or status state. Files are read and processed
//! strictly one after another, and the first failure aborts the batch with
//! no partial output.

use crate::builder::OutputDocument;
use crate::config::PipelineConfig;
use crate::error::StitchError;
use crate::image::embed_png;
use crate::merge::import_pdf;
use crate::source::FileSource;
use serde::Serialize;

/// Which workflow a selection feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineKind {
    Merge,
    ImagesToPdf,
}

impl PipelineKind {
    /// Minimum number of selected files before a run is attempted
    pub fn min_inputs(self) -> usize {
        match self {
            PipelineKind::Merge => 2,
            PipelineKind::ImagesToPdf => 1,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            PipelineKind::Merge => "PDFs merged successfully!",
            PipelineKind::ImagesToPdf => "Images converted to PDF successfully!",
        }
    }

    fn precondition_error(self) -> StitchError {
        match self {
            PipelineKind::Merge => StitchError::NotEnoughPdfs,
            PipelineKind::ImagesToPdf => StitchError::NoImages,
        }
    }

    /// Fail fast when too few files are selected
    pub fn check_inputs(self, count: usize) -> Result<(), StitchError> {
        if count < self.min_inputs() {
            return Err(self.precondition_error());
        }
        Ok(())
    }
}

/// A finished document ready for export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
}

/// Either a finished document or the error that aborted the run
pub type ConversionResult = Result<ExportedDocument, StitchError>;

/// Merge PDFs in list order
pub async fn merge<F: FileSource>(pdf_files: &[F], config: &PipelineConfig) -> ConversionResult {
    PipelineKind::Merge.check_inputs(pdf_files.len())?;

    build(pdf_files, config, import_pdf)
        .await
        .map(|(bytes, page_count)| ExportedDocument {
            bytes,
            filename: config.merged_filename.clone(),
            page_count,
        })
        .map_err(|e| StitchError::MergeFailed(Box::new(e)))
}

/// Convert PNG images to a PDF with one page per image
pub async fn convert<F: FileSource>(images: &[F], config: &PipelineConfig) -> ConversionResult {
    PipelineKind::ImagesToPdf.check_inputs(images.len())?;

    build(images, config, |out, name, bytes| {
        embed_png(out, name, bytes).map(|_| 1)
    })
    .await
    .map(|(bytes, page_count)| ExportedDocument {
        bytes,
        filename: config.images_filename.clone(),
        page_count,
    })
    .map_err(|e| StitchError::ConvertFailed(Box::new(e)))
}

/// Run the pipeline selected by `kind`
pub async fn run<F: FileSource>(
    kind: PipelineKind,
    files: &[F],
    config: &PipelineConfig,
) -> ConversionResult {
    match kind {
        PipelineKind::Merge => merge(files, config).await,
        PipelineKind::ImagesToPdf => convert(files, config).await,
    }
}

/// Read each file and feed it to `add` before moving to the next one
async fn build<F, A>(
    files: &[F],
    config: &PipelineConfig,
    mut add: A,
) -> Result<(Vec<u8>, usize), StitchError>
where
    F: FileSource,
    A: FnMut(&mut OutputDocument, &str, &[u8]) -> Result<usize, StitchError>,
{
    let mut out = OutputDocument::new();
    let mut page_count = 0;

    for file in files {
        page_count += add_file(file, &mut out, &mut add)
            .await
            .inspect_err(|e| {
                tracing::warn!(name = file.name(), error = %e, "aborting batch");
            })?;
    }

    let bytes = out.finish(config.compress)?;
    tracing::info!(
        inputs = files.len(),
        pages = page_count,
        size = bytes.len(),
        "document built"
    );
    Ok((bytes, page_count))
}

/// Read one file, then hand its bytes to `add`
async fn add_file<F, A>(
    file: &F,
    out: &mut OutputDocument,
    add: &mut A,
) -> Result<usize, StitchError>
where
    F: FileSource,
    A: FnMut(&mut OutputDocument, &str, &[u8]) -> Result<usize, StitchError>,
{
    let bytes = file.read_bytes().await?;
    tracing::debug!(name = file.name(), size = bytes.len(), "processing input");
    add(out, file.name(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::tests::create_test_png;
    use crate::merge::tests::{create_encrypted_pdf, create_test_pdf, page_texts};
    use crate::page_info::PageInfo;
    use crate::source::tests::TestFile;
    use crate::source::MemoryFile;
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    fn pdf(name: &str, pages: u32) -> MemoryFile {
        MemoryFile::new(format!("{}.pdf", name), create_test_pdf(pages, name))
    }

    fn image_file(name: &str, width: u32, height: u32) -> MemoryFile {
        MemoryFile::new(name, create_test_png(width, height, png::ColorType::Rgb))
    }

    #[tokio::test]
    async fn test_merge_requires_two_files() {
        let config = PipelineConfig::default();

        let err = merge::<MemoryFile>(&[], &config).await.unwrap_err();
        assert_eq!(err.to_string(), "Please upload at least 2 PDFs to merge");

        let err = merge(&[pdf("Only", 1)], &config).await.unwrap_err();
        assert!(err.is_precondition());
    }

    #[tokio::test]
    async fn test_merge_output_named_and_ordered() {
        let files = vec![pdf("Left", 2), pdf("Right", 1)];
        let result = merge(&files, &PipelineConfig::default()).await.unwrap();

        assert_eq!(result.filename, "merged.pdf");
        assert_eq!(result.page_count, 3);
        let texts = page_texts(&result.bytes);
        assert!(texts[0].contains("Left-Page-1"));
        assert!(texts[1].contains("Left-Page-2"));
        assert!(texts[2].contains("Right-Page-1"));
    }

    #[tokio::test]
    async fn test_merge_failure_is_labelled() {
        let files = vec![pdf("Good", 1), MemoryFile::new("junk.pdf", b"garbage".to_vec())];
        let err = merge(&files, &PipelineConfig::default()).await.unwrap_err();

        assert!(matches!(err, StitchError::MergeFailed(_)));
        assert!(err.to_string().starts_with("Error merging PDFs: "));
        assert!(err.to_string().contains("junk.pdf"));
    }

    #[tokio::test]
    async fn test_merge_encrypted_input_is_labelled() {
        let files = vec![
            pdf("Open", 1),
            MemoryFile::new("secret.pdf", create_encrypted_pdf(1, "Secret")),
        ];
        let err = merge(&files, &PipelineConfig::default()).await.unwrap_err();

        assert_eq!(
            err,
            StitchError::MergeFailed(Box::new(StitchError::Encrypted {
                name: "secret.pdf".into()
            }))
        );
        assert_eq!(err.to_string(), "Error merging PDFs: secret.pdf is encrypted");
    }

    #[tokio::test]
    async fn test_unreadable_input_aborts_batch() {
        let files = vec![
            TestFile::Ready(pdf("First", 1)),
            TestFile::Unreadable("gone.pdf".into()),
            TestFile::Ready(pdf("Last", 1)),
        ];
        let err = merge(&files, &PipelineConfig::default()).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error merging PDFs: Failed to read gone.pdf: permission denied"
        );

        let images = vec![TestFile::Unreadable("scan.png".into())];
        let err = convert(&images, &PipelineConfig::default()).await.unwrap_err();
        assert!(matches!(err, StitchError::ConvertFailed(ref inner)
            if matches!(**inner, StitchError::ReadError { .. })));
    }

    #[tokio::test]
    async fn test_merge_result_can_be_merged_again() {
        let config = PipelineConfig::default();
        let first = merge(&[pdf("A", 1), pdf("B", 2)], &config).await.unwrap();

        let again = vec![MemoryFile::new("merged.pdf", first.bytes), pdf("C", 1)];
        let result = merge(&again, &config).await.unwrap();

        let texts = page_texts(&result.bytes);
        let labels = ["A-Page-1", "B-Page-1", "B-Page-2", "C-Page-1"];
        assert_eq!(texts.len(), labels.len());
        for (text, label) in texts.iter().zip(labels) {
            assert!(text.contains(label));
        }
    }

    #[tokio::test]
    async fn test_convert_requires_one_image() {
        let err = convert::<MemoryFile>(&[], &PipelineConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please upload at least 1 image to convert to PDF");
    }

    #[tokio::test]
    async fn test_convert_one_page_per_image() {
        let images = vec![
            image_file("a.png", 120, 80),
            image_file("b.png", 50, 200),
            image_file("c.png", 1, 1),
        ];
        let result = convert(&images, &PipelineConfig::default()).await.unwrap();

        assert_eq!(result.filename, "images.pdf");
        assert_eq!(result.page_count, 3);

        let doc = Document::load_mem(&result.bytes).unwrap();
        let sizes: Vec<(f32, f32)> = PageInfo::all_from_document(&doc)
            .unwrap()
            .into_iter()
            .map(|p| (p.width, p.height))
            .collect();
        assert_eq!(sizes, vec![(120.0, 80.0), (50.0, 200.0), (1.0, 1.0)]);
    }

    #[tokio::test]
    async fn test_convert_rejects_non_png_batch() {
        let images = vec![
            image_file("ok.png", 10, 10),
            MemoryFile::new("photo.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0]),
        ];
        let err = convert(&images, &PipelineConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, StitchError::ConvertFailed(_)));
        assert!(err.to_string().starts_with("Error converting images to PDF: "));
        assert!(err.to_string().contains("photo.jpg"));
    }

    #[tokio::test]
    async fn test_run_uses_configured_filenames() {
        let config = PipelineConfig {
            images_filename: "scans.pdf".into(),
            ..PipelineConfig::default()
        };
        let result = run(PipelineKind::ImagesToPdf, &[image_file("a.png", 4, 4)], &config)
            .await
            .unwrap();
        assert_eq!(result.filename, "scans.pdf");
    }
}
