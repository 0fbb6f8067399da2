//! # eduquiz-core
//!
//! Core types and traits for the EduQuiz quiz-generation backend.
//!
//! This crate provides the foundational abstractions used throughout EduQuiz:
//!
//! - **Embedding Generation**: [`Embedder`] trait for converting text to vector embeddings
//! - **Language Model Access**: [`LanguageModel`] trait for chat-completion calls
//! - **Document Persistence**: [`DocumentStore`] trait for the Mongo-like document store
//! - **Form Publishing**: [`FormService`] trait for the external quiz-form collaborator
//!
//! ## Architecture
//!
//! The crate is organized around a generation pipeline:
//!
//! ```text
//! Upload → Loader → Chunker → VectorIndex → Retriever → Synthesizer → Validator
//!                                                                        ↓
//!                                             Quiz → DocumentStore + FormService
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Chunk`] | A text window taken from an uploaded document |
//! | [`Difficulty`] | Requested quiz difficulty (easy/medium/hard) |
//! | [`QuestionDraft`] | An unvalidated generated question |
//! | [`Quiz`] | A persisted quiz with its published form link |
//! | [`Classroom`] | A classroom record tying students to quizzes |
//!
//! ## Related Crates
//!
//! - `eduquiz-pipeline`: the staged generation workflow
//! - `eduquiz-store`: document store implementation

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    ChunkError, EmbedError, Error, ExtractError, FormError, LlmError, PipelineError, Result,
    StoreError,
};
pub use traits::{DocumentStore, Embedder, FormItemInfo, FormService, LanguageModel};
pub use types::{
    Chunk, Classroom, Difficulty, Evaluation, FormItem, FormMetadata, FormQuestion, FormResponse,
    QuestionDraft, QuestionResult, Quiz, ScoredChunk, SourceFormat, StoredResponse, StudentRef,
};
