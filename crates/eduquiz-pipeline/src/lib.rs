//! # eduquiz-pipeline
//!
//! The document-to-quiz generation pipeline.
//!
//! One call to [`QuizGenerator::generate_quiz`] runs the full staged flow
//! for a single request:
//!
//! ```text
//! upload → load → chunk → embed+index → retrieve → synthesize → validate
//! ```
//!
//! Everything built along the way (chunks, vector index, retriever) is
//! ephemeral: owned by the request, discarded at the end, never cached or
//! shared across requests.
//!
//! ## Failure taxonomy
//!
//! Each stage fails with a distinct [`PipelineError`] variant so callers
//! can map them to distinct user-facing responses:
//!
//! | Stage | Failure |
//! |-------|---------|
//! | parameter check | `InvalidParameter` |
//! | load | `DocumentLoad` |
//! | chunk | `EmptyDocument` |
//! | embed/index | `Embed` |
//! | retrieve | `EmptyRetrieval` (or `Llm`/`Embed` from the calls it makes) |
//! | synthesize | `Llm` (unreachable) / `GenerationParse` (garbage) |
//! | validate | `Validation { index, reason }` |
//!
//! Failures abort immediately; no error is swallowed or downgraded.

pub mod orchestrator;
pub mod retriever;
pub mod synthesizer;
pub mod validator;

pub use eduquiz_chunker::ChunkConfig;
pub use retriever::MultiQueryRetriever;
pub use synthesizer::{parse_questions, RawQuestion};
pub use validator::validate;

use eduquiz_core::{Difficulty, LanguageModel, PipelineError, QuestionDraft, SourceFormat};
use eduquiz_embed::EmbedderPool;
use eduquiz_extract::LoaderRegistry;
use eduquiz_index::VectorIndex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Bounds on how many questions one quiz may request.
pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 20;

/// Tunables for one generator instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Chunking window parameters
    pub chunk: ChunkConfig,
    /// Index results fetched per query variant
    pub base_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk: ChunkConfig::default(),
            base_k: 4,
        }
    }
}

/// Parameters of one generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Path to the uploaded file
    pub document: PathBuf,
    /// Declared file format (from the upload's extension)
    pub format: SourceFormat,
    /// Requested difficulty
    pub difficulty: Difficulty,
    /// Requested question count (1..=20)
    pub num_questions: usize,
}

/// The quiz generation pipeline, bound to an embedder and a language model.
pub struct QuizGenerator {
    loaders: LoaderRegistry,
    embedder: Arc<EmbedderPool>,
    llm: Arc<dyn LanguageModel>,
    config: PipelineConfig,
}

impl QuizGenerator {
    /// Create a generator with the default loader registry.
    pub fn new(
        embedder: Arc<EmbedderPool>,
        llm: Arc<dyn LanguageModel>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            loaders: LoaderRegistry::with_defaults(),
            embedder,
            llm,
            config,
        }
    }

    /// Load, chunk and index a document, returning the bound retriever.
    ///
    /// This is the expensive half of the pipeline (one embedding call per
    /// chunk); the chunk/empty check runs before any of that cost is
    /// spent.
    pub async fn prepare_retriever(
        &self,
        document: &Path,
        format: SourceFormat,
    ) -> Result<MultiQueryRetriever, PipelineError> {
        let text = self.loaders.load(document, format).await?;
        let chunks = eduquiz_chunker::split(&text, &self.config.chunk)?;
        debug!("Document yielded {} chunks", chunks.len());

        let index = VectorIndex::build(chunks, Arc::clone(&self.embedder)).await?;
        Ok(MultiQueryRetriever::new(
            index,
            Arc::clone(&self.llm),
            self.config.base_k,
        ))
    }

    /// Run the full pipeline for one request.
    pub async fn generate_quiz(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<QuestionDraft>, PipelineError> {
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&request.num_questions) {
            return Err(PipelineError::InvalidParameter(format!(
                "number of questions must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}, got {}",
                request.num_questions
            )));
        }

        let retriever = self
            .prepare_retriever(&request.document, request.format)
            .await?;
        orchestrator::run(
            &retriever,
            self.llm.as_ref(),
            request.difficulty,
            request.num_questions,
        )
        .await
    }
}
