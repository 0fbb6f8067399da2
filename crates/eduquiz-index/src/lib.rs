//! # eduquiz-index
//!
//! Per-request in-memory vector index.
//!
//! A [`VectorIndex`] is built once from the chunk set of a single
//! generation request, searched a handful of times by the retriever, and
//! then dropped with the request. Nothing is persisted or shared across
//! requests, so brute-force cosine similarity over a `Vec` is the whole
//! data structure.

use eduquiz_core::{Chunk, EmbedError, ScoredChunk};
use eduquiz_embed::EmbedderPool;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// One indexed chunk with its embedding.
struct IndexEntry {
    embedding: Vec<f32>,
    chunk: Chunk,
}

/// In-memory vector index over one document's chunks.
///
/// Read-only after construction. Holds the embedder pool so queries can be
/// embedded with the same model that embedded the chunks.
pub struct VectorIndex {
    embedder: Arc<EmbedderPool>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index by embedding every chunk.
    ///
    /// Chunk embeddings are independent, so they are dispatched through the
    /// pool's bounded-concurrency batching. Construction is deterministic
    /// given identical chunk text and embedder.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: Arc<EmbedderPool>,
    ) -> Result<Self, EmbedError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_many(texts).await?;
        debug!("Built vector index over {} chunks", chunks.len());

        let entries = embeddings
            .into_iter()
            .zip(chunks)
            .map(|(embedding, chunk)| IndexEntry { embedding, chunk })
            .collect();

        Ok(Self { embedder, entries })
    }

    /// Number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the top-`k` chunks by cosine similarity to `query`.
    ///
    /// Ties break toward the earlier chunk, keeping results deterministic.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, EmbedError> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed_query(query).await?;

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                score: cosine_similarity(&query_vec, &entry.embedding),
                chunk: entry.chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.index.cmp(&b.chunk.index))
        });
        scored.truncate(k);
        Ok(scored)
    }
}

/// Compute cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduquiz_embed::HashEmbedder;

    fn pool() -> Arc<EmbedderPool> {
        Arc::new(EmbedderPool::new(Arc::new(HashEmbedder::new()), 8, 4))
    }

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Chunk {
                text: (*text).to_string(),
                index,
            })
            .collect()
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_exact_text_match_ranks_first() {
        let index = VectorIndex::build(
            chunks(&["the krebs cycle", "planetary orbits", "verb conjugation"]),
            pool(),
        )
        .await
        .unwrap();

        let hits = index.search("planetary orbits", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.text, "planetary orbits");
        assert!((hits[0].score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_k_truncates_results() {
        let index = VectorIndex::build(chunks(&["a", "b", "c", "d", "e"]), pool())
            .await
            .unwrap();
        let hits = index.search("a", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_index_returns_no_hits() {
        let index = VectorIndex::build(Vec::new(), pool()).await.unwrap();
        assert!(index.is_empty());
        assert!(index.search("anything", 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_is_deterministic() {
        let index = VectorIndex::build(chunks(&["alpha", "beta", "gamma"]), pool())
            .await
            .unwrap();
        let first = index.search("beta", 3).await.unwrap();
        let second = index.search("beta", 3).await.unwrap();
        let order = |hits: &[ScoredChunk]| hits.iter().map(|h| h.chunk.index).collect::<Vec<_>>();
        assert_eq!(order(&first), order(&second));
    }
}
