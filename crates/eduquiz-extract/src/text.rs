//! Plain text decoder.

use async_trait::async_trait;
use eduquiz_core::{ExtractError, SourceFormat};
use std::path::Path;
use tokio::fs;

use crate::registry::DocumentDecoder;

/// Decoder for plain text uploads.
///
/// Anything not declared as PDF or Word falls through to this decoder, as
/// the upload handler only distinguishes those formats.
pub struct TextDecoder;

impl TextDecoder {
    /// Create a new text decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentDecoder for TextDecoder {
    fn formats(&self) -> &[SourceFormat] {
        &[SourceFormat::Other]
    }

    async fn decode(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
