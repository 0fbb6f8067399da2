//! # eduquiz-embed
//!
//! Embedding generation for the EduQuiz pipeline.
//!
//! Two [`Embedder`](eduquiz_core::Embedder) implementations are provided:
//!
//! - [`HttpEmbedder`]: talks to an OpenAI-compatible `/embeddings` endpoint
//! - [`HashEmbedder`]: deterministic content-hash vectors for tests and
//!   offline development
//!
//! [`EmbedderPool`] wraps an embedder with a semaphore so independent chunk
//! batches can be dispatched concurrently without unbounded fan-out.

pub mod hash;
pub mod http;
pub mod pool;

pub use hash::HashEmbedder;
pub use http::HttpEmbedder;
pub use pool::EmbedderPool;
