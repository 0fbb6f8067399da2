//! Configuration for the EduQuiz backend.
//!
//! Plain serde-default structs; API keys come from the environment, never
//! from the config itself.

use serde::{Deserialize, Serialize};

/// Environment variable holding the chat-completions API key.
pub const GROQ_API_KEY: &str = "GROQ_API_KEY";

/// Environment variable holding the embeddings API key.
pub const EMBEDDINGS_API_KEY: &str = "EMBEDDINGS_API_KEY";

/// Environment variable holding the form service OAuth access token.
pub const FORMS_ACCESS_TOKEN: &str = "FORMS_ACCESS_TOKEN";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Language model configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Form service configuration
    #[serde(default)]
    pub forms: FormsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Embedding-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model to use
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// API root for the embeddings endpoint
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// Embedding dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Batch size for embedding
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Max concurrent embedding requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_batch_size() -> usize {
    32
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            base_url: default_embedding_base_url(),
            dimension: default_dimension(),
            batch_size: default_batch_size(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Language model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model to use
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API root for the chat-completions endpoint
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_llm_base_url() -> String {
    eduquiz_llm::GROQ_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Chunking-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size (characters)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between windows (characters)
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_chunk_size() -> usize {
    2000
}

fn default_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

/// Retrieval-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Index results fetched per query variant
    #[serde(default = "default_base_k")]
    pub base_k: usize,
}

fn default_base_k() -> usize {
    4
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_k: default_base_k(),
        }
    }
}

/// Form service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Read a required API credential from the environment.
pub fn env_credential(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
