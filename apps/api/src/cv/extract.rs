//! Text extraction from uploaded CV files.
//!
//! PDFs are parsed in-process with `pdf-extract` on the blocking pool. Images
//! go through the `tesseract` CLI, which needs a file on disk, so the bytes
//! are written to a temp file first. Other MIME types yield empty text.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::models::cv::ExtractedData;

const OCR_LANGUAGE: &str = "ita";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// `file_name` is the client-supplied name; only its extension is used.
    async fn extract(
        &self,
        mime_type: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<ExtractedData, ExtractError>;
}

#[derive(Debug, Clone)]
pub struct DocumentTextExtractor {
    tesseract_bin: String,
}

impl DocumentTextExtractor {
    pub fn new(tesseract_bin: impl Into<String>) -> Self {
        Self {
            tesseract_bin: tesseract_bin.into(),
        }
    }

    async fn pdf_text(&self, bytes: Bytes) -> Result<String, ExtractError> {
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await?
            .map_err(|e| ExtractError::Pdf(e.to_string()))
    }

    async fn ocr_text(&self, file_name: &str, bytes: Bytes) -> Result<String, ExtractError> {
        let suffix = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let image = tempfile::Builder::new()
            .prefix("cv-ocr-")
            .suffix(&suffix)
            .tempfile()?;
        tokio::fs::write(image.path(), &bytes).await?;

        let output = Command::new(&self.tesseract_bin)
            .arg(image.path())
            .arg("stdout")
            .arg("-l")
            .arg(OCR_LANGUAGE)
            .output()
            .await
            .map_err(|e| ExtractError::Ocr(format!("could not run {}: {e}", self.tesseract_bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Ocr(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for DocumentTextExtractor {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(
        &self,
        mime_type: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<ExtractedData, ExtractError> {
        let text = match ExtractionKind::for_mime(mime_type) {
            ExtractionKind::Pdf => self.pdf_text(bytes).await?,
            ExtractionKind::Image => self.ocr_text(file_name, bytes).await?,
            ExtractionKind::Unsupported => {
                debug!("No extractor for MIME type '{mime_type}'");
                String::new()
            }
        };
        Ok(ExtractedData { text })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionKind {
    Pdf,
    Image,
    Unsupported,
}

impl ExtractionKind {
    fn for_mime(mime_type: &str) -> Self {
        let mime = mime_type.to_ascii_lowercase();
        if mime.contains("image") {
            ExtractionKind::Image
        } else if mime.contains("pdf") {
            ExtractionKind::Pdf
        } else {
            ExtractionKind::Unsupported
        }
    }
}
