//! Decoder registry keyed by declared source format.

use async_trait::async_trait;
use eduquiz_core::{ExtractError, SourceFormat};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::{DocxDecoder, PdfDecoder, TextDecoder};

/// Trait for decoding one document format into plain text.
#[async_trait]
pub trait DocumentDecoder: Send + Sync {
    /// Formats this decoder handles.
    fn formats(&self) -> &[SourceFormat];

    /// Decode the file at `path` into a single text blob, in page/section
    /// order.
    async fn decode(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Registry of document decoders.
pub struct LoaderRegistry {
    decoders: HashMap<SourceFormat, Arc<dyn DocumentDecoder>>,
}

impl LoaderRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Create a registry with all built-in decoders registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TextDecoder::new());
        registry.register(PdfDecoder::new());
        registry.register(DocxDecoder::new());
        registry
    }

    /// Register a decoder for every format it declares.
    pub fn register<D: DocumentDecoder + 'static>(&mut self, decoder: D) {
        let decoder: Arc<dyn DocumentDecoder> = Arc::new(decoder);
        for format in decoder.formats() {
            self.decoders.insert(*format, Arc::clone(&decoder));
        }
    }

    /// Get the decoder registered for a format.
    #[must_use]
    pub fn get(&self, format: SourceFormat) -> Option<Arc<dyn DocumentDecoder>> {
        self.decoders.get(&format).cloned()
    }

    /// Load a document with the decoder registered for its declared format.
    pub async fn load(&self, path: &Path, format: SourceFormat) -> Result<String, ExtractError> {
        debug!("Loading document {:?} (declared: {:?})", path, format);
        let decoder = self
            .get(format)
            .ok_or_else(|| ExtractError::UnsupportedType(format!("{format:?}")))?;
        decoder.decode(path).await
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
