//! Error types for EduQuiz.

use thiserror::Error;

/// Main error type for EduQuiz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Quiz generation pipeline failed
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Document store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Form service operation failed
    #[error("form error: {0}")]
    Form(#[from] FormError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Document loading errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Failed(String),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("no extractable text in document")]
    EmptyDocument,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Embedding errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("embedding API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    Response(String),
}

/// Language model errors.
///
/// These cover transport and API failures only; a reply that arrives but
/// cannot be parsed is a [`PipelineError::GenerationParse`], so callers can
/// tell "model unreachable" from "model produced garbage".
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion response carried no choices")]
    EmptyResponse,
}

/// Quiz generation pipeline errors.
///
/// Every stage failure is terminal for the request; the pipeline never
/// retries and never downgrades an error to a warning.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Generation parameters rejected before any work was done
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Uploaded document could not be read or decoded
    #[error("failed to load document: {0}")]
    DocumentLoad(#[from] ExtractError),

    /// Document produced no chunks
    #[error("{0}")]
    EmptyDocument(#[from] ChunkError),

    /// Chunk or query embedding failed
    #[error("embedding failed: {0}")]
    Embed(#[from] EmbedError),

    /// Language model call failed (transport/API)
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),

    /// Index search returned no content for any query variant
    #[error("no relevant content retrieved")]
    EmptyRetrieval,

    /// Model output was not a well-formed question list
    #[error("failed to parse generated questions: {0}")]
    GenerationParse(String),

    /// A generated question violated the structural contract
    #[error("question {index} failed validation: {reason}")]
    Validation { index: usize, reason: String },
}

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("insert failed: {0}")]
    Insert(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("update failed: {0}")]
    Update(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Form service errors.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("form API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed form API response: {0}")]
    Parse(String),

    #[error("form not found: {0}")]
    NotFound(String),
}

/// Result type alias for EduQuiz operations.
pub type Result<T> = std::result::Result<T, Error>;
