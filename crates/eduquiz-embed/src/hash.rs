//! Deterministic hash embedder for tests and offline development.

use async_trait::async_trait;
use eduquiz_core::{EmbedError, Embedder};

/// Embedder that derives vectors from a content hash.
///
/// Identical inputs always produce identical vectors and distinct inputs
/// almost always produce distinct ones, which is all the pipeline's own
/// logic (index build, top-k search, dedup) needs. No model, no network.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create a hash embedder with the default dimension (384).
    #[must_use]
    pub fn new() -> Self {
        Self { dimension: 384 }
    }

    /// Create a hash embedder with a custom dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let hash = blake3::hash(text.as_bytes());
        let bytes = hash.as_bytes();
        // Components stay non-negative so two hash vectors never come out
        // anti-correlated; the retriever treats similarity <= 0 as a miss.
        (0..self.dimension)
            .map(|i| f32::from(bytes[i % 32]) / 255.0)
            .collect()
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
