//! PDF decoder.
//!
//! Uses pdf-extract for text extraction, which walks pages in order so the
//! concatenated blob matches the document's page order.

use async_trait::async_trait;
use eduquiz_core::{ExtractError, SourceFormat};
use std::path::Path;
use tracing::debug;

use crate::registry::DocumentDecoder;

/// Decoder for PDF uploads.
pub struct PdfDecoder;

impl PdfDecoder {
    /// Create a new PDF decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentDecoder for PdfDecoder {
    fn formats(&self) -> &[SourceFormat] {
        &[SourceFormat::Pdf]
    }

    async fn decode(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("Extracting PDF: {:?}", path);
        let bytes = tokio::fs::read(path).await?;

        // pdf-extract is CPU-bound, keep it off the async runtime
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
        .map_err(ExtractError::Parse)?;

        debug!("Extracted {} characters of PDF text", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_garbage_bytes_fail_with_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not a pdf at all").unwrap();

        let err = PdfDecoder::new().decode(file.path()).await.unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = PdfDecoder::new()
            .decode(Path::new("/nonexistent/slides.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
