//! Embedder pool with bounded concurrency.

use eduquiz_core::{EmbedError, Embedder};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Wraps an [`Embedder`] with a semaphore bounding concurrent dispatch.
///
/// Chunk embeddings have no cross-chunk dependency, so batches are sent in
/// parallel up to `max_concurrent` in-flight requests.
pub struct EmbedderPool {
    embedder: Arc<dyn Embedder>,
    semaphore: Arc<Semaphore>,
    batch_size: usize,
    max_concurrent: usize,
}

impl EmbedderPool {
    /// Create a new pool.
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize, max_concurrent: usize) -> Self {
        Self {
            embedder,
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            batch_size: batch_size.max(1),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Embedding dimension of the underlying model.
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    /// Name of the underlying model.
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Maximum concurrent in-flight batches.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Embed one query string.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| EmbedError::Request(format!("semaphore closed: {e}")))?;
        self.embedder.embed_query(query).await
    }

    /// Embed many texts, preserving input order.
    ///
    /// Texts are cut into batches of `batch_size`; batches run concurrently,
    /// each holding one semaphore permit while its request is in flight.
    pub async fn embed_many(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batches: Vec<Vec<String>> = texts
            .chunks(self.batch_size)
            .map(|batch| batch.to_vec())
            .collect();
        debug!(
            "Embedding {} texts in {} batches (max {} concurrent)",
            texts.len(),
            batches.len(),
            self.max_concurrent
        );

        let mut set = JoinSet::new();
        for (batch_idx, batch) in batches.into_iter().enumerate() {
            let embedder = Arc::clone(&self.embedder);
            let semaphore = Arc::clone(&self.semaphore);
            set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| EmbedError::Request(format!("semaphore closed: {e}")))?;
                let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
                let vectors = embedder.embed_texts(&refs).await?;
                Ok::<_, EmbedError>((batch_idx, vectors))
            });
        }

        let mut results: Vec<Option<Vec<Vec<f32>>>> = Vec::new();
        results.resize_with(set.len(), || None);
        while let Some(joined) = set.join_next().await {
            let (batch_idx, vectors) =
                joined.map_err(|e| EmbedError::Request(format!("embed task panicked: {e}")))??;
            results[batch_idx] = Some(vectors);
        }

        let mut out = Vec::with_capacity(texts.len());
        for slot in results {
            out.extend(slot.ok_or_else(|| EmbedError::Response("missing batch result".into()))?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashEmbedder;

    fn pool(batch_size: usize, max_concurrent: usize) -> EmbedderPool {
        EmbedderPool::new(Arc::new(HashEmbedder::new()), batch_size, max_concurrent)
    }

    #[tokio::test]
    async fn test_embed_many_preserves_order() {
        let texts: Vec<String> = (0..23).map(|i| format!("chunk {i}")).collect();
        let sequential = pool(64, 1).embed_many(texts.clone()).await.unwrap();
        let concurrent = pool(4, 8).embed_many(texts).await.unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn test_embed_many_empty_input() {
        assert!(pool(4, 2).embed_many(Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_embed_query_matches_batch() {
        let p = pool(4, 2);
        let single = p.embed_query("volcanoes").await.unwrap();
        let batch = p.embed_many(vec!["volcanoes".to_string()]).await.unwrap();
        assert_eq!(single, batch[0]);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let p = pool(4, 0);
        assert_eq!(p.max_concurrent(), 1);
        assert!(p.embed_query("still works").await.is_ok());
    }
}
