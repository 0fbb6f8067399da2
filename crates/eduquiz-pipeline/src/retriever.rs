//! Multi-query retriever.
//!
//! One difficulty-derived query rarely covers a whole document, so the
//! retriever asks the language model for a few paraphrases, searches the
//! index once per phrasing, and merges the hits.

use eduquiz_core::{Difficulty, LanguageModel, PipelineError};
use eduquiz_index::VectorIndex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Number of paraphrased variants requested from the model.
const NUM_VARIANTS: usize = 3;

/// Retriever bound to one request's index.
///
/// Explicitly a value (index handle + model handle + config) rather than a
/// closure, so the pipeline state stays inspectable in tests.
pub struct MultiQueryRetriever {
    index: VectorIndex,
    llm: Arc<dyn LanguageModel>,
    /// Results fetched per query variant
    base_k: usize,
    /// Hits at or below this similarity are discarded
    min_score: f32,
}

impl MultiQueryRetriever {
    /// Bind a retriever to a built index.
    pub fn new(index: VectorIndex, llm: Arc<dyn LanguageModel>, base_k: usize) -> Self {
        Self {
            index,
            llm,
            base_k: base_k.max(1),
            min_score: 0.0,
        }
    }

    /// Override the similarity cutoff.
    #[must_use]
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Number of chunks in the underlying index.
    #[must_use]
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// Retrieve content for a difficulty level.
    ///
    /// Runs the base query first, then each usable paraphrase, unions the
    /// hits deduplicated by chunk identity in first-seen order (the earliest
    /// variant wins ties), and joins the chunk texts with blank lines.
    /// Fails with [`PipelineError::EmptyRetrieval`] when no variant hits
    /// anything.
    pub async fn retrieve(&self, difficulty: Difficulty) -> Result<String, PipelineError> {
        let base_query = difficulty.retrieval_query();
        let mut queries = vec![base_query.clone()];
        queries.extend(self.expand_query(&base_query).await);

        let mut seen: HashSet<usize> = HashSet::new();
        let mut texts: Vec<String> = Vec::new();
        for query in &queries {
            let hits = self.index.search(query, self.base_k).await?;
            debug!("Query {:?} hit {} chunks", query, hits.len());
            for hit in hits {
                if hit.score <= self.min_score {
                    continue;
                }
                if seen.insert(hit.chunk.index) {
                    texts.push(hit.chunk.text);
                }
            }
        }

        if texts.is_empty() {
            return Err(PipelineError::EmptyRetrieval);
        }
        debug!(
            "Retrieved {} unique chunks across {} query variants",
            texts.len(),
            queries.len()
        );
        Ok(texts.join("\n\n"))
    }

    /// Ask the model for paraphrased variants of the base query.
    ///
    /// Expansion is best-effort: a failed or unusable reply falls back to
    /// the base query alone rather than aborting retrieval.
    async fn expand_query(&self, query: &str) -> Vec<String> {
        let prompt = format!(
            "You are an AI language model assistant. Generate {NUM_VARIANTS} different \
             rephrasings of the following search query, to retrieve relevant document \
             passages from a vector database. Provide one rephrasing per line, with no \
             numbering and no additional text.\n\nOriginal query: {query}"
        );

        let reply = match self.llm.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Query expansion failed, using base query only: {e}");
                return Vec::new();
            }
        };

        reply
            .lines()
            .map(|line| line.trim().trim_start_matches(['-', '*', ' ']))
            .map(|line| line.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')'))
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != query)
            .take(NUM_VARIANTS)
            .map(String::from)
            .collect()
    }
}
