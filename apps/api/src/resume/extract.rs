//! Document text extraction.
//!
//! Uploaded documents are matched against a registry of extractors at call
//! time. Each backend probes the document (magic bytes, content type, file
//! extension) and the first that accepts it does the work. When nothing
//! matches the upload fails with `AppError::UnsupportedCapability`.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";
const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// An uploaded document as received from the client.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Document {
    fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Media type without parameters, lowercased.
    fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    fn describe(&self) -> String {
        format!(
            "{} ({})",
            self.file_name.as_deref().unwrap_or("unnamed"),
            self.content_type.as_deref().unwrap_or("no content type")
        )
    }
}

pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this backend can handle `doc`. Must be cheap.
    fn probe(&self, doc: &Document) -> bool;

    /// Blocking; called from `spawn_blocking`.
    fn extract(&self, doc: &Document) -> Result<String, ExtractionError>;
}

pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn probe(&self, doc: &Document) -> bool {
        doc.bytes.starts_with(PDF_MAGIC)
            || doc.media_type().as_deref() == Some("application/pdf")
            || doc.extension().as_deref() == Some("pdf")
    }

    fn extract(&self, doc: &Document) -> Result<String, ExtractionError> {
        pdf_extract::extract_text_from_mem(&doc.bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "plain_text"
    }

    fn probe(&self, doc: &Document) -> bool {
        let declared = doc
            .media_type()
            .is_some_and(|mt| mt.starts_with("text/"))
            || doc
                .extension()
                .is_some_and(|ext| PLAIN_TEXT_EXTENSIONS.contains(&ext.as_str()));
        declared && std::str::from_utf8(&doc.bytes).is_ok()
    }

    fn extract(&self, doc: &Document) -> Result<String, ExtractionError> {
        Ok(std::str::from_utf8(&doc.bytes)?.to_string())
    }
}

/// Ordered set of extractors; the first whose probe accepts a document wins.
pub struct ExtractorRegistry {
    backends: Vec<Box<dyn TextExtractor>>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new(vec![Box::new(PdfTextExtractor), Box::new(PlainTextExtractor)])
    }
}

impl ExtractorRegistry {
    pub fn new(backends: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { backends }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn resolve(&self, doc: &Document) -> Result<&dyn TextExtractor, AppError> {
        self.backends
            .iter()
            .find(|b| b.probe(doc))
            .map(|b| b.as_ref())
            .ok_or_else(|| {
                AppError::UnsupportedCapability(format!(
                    "No text extractor supports {}. Supported: {}",
                    doc.describe(),
                    self.names().join(", ")
                ))
            })
    }

    /// Extracts text on the blocking pool. Blank output is an error.
    pub async fn extract_text(self: Arc<Self>, doc: Document) -> Result<String, AppError> {
        let text = tokio::task::spawn_blocking(move || {
            let extractor = self.resolve(&doc)?;
            debug!("Extracting {} with {}", doc.describe(), extractor.name());
            extractor
                .extract(&doc)
                .map_err(|e| AppError::Extraction(e.to_string()))
        })
        .await
        .map_err(|e| AppError::Extraction(format!("Extraction task failed: {e}")))??;

        if text.trim().is_empty() {
            return Err(AppError::Extraction(
                "No text could be extracted from the document".to_string(),
            ));
        }

        info!("Extracted {} characters of résumé text", text.len());
        Ok(text)
    }
}
