//! # eduquiz-llm
//!
//! Language model access for the EduQuiz pipeline.
//!
//! Provides two [`LanguageModel`](eduquiz_core::LanguageModel)
//! implementations:
//!
//! - [`ChatClient`]: a Groq/OpenAI-compatible chat-completions client
//! - [`ScriptedModel`]: replays canned replies for deterministic tests
//!
//! The pipeline itself only depends on the trait; which implementation is
//! wired in is an application decision.

pub mod chat;
pub mod script;

pub use chat::{ChatClient, GROQ_BASE_URL};
pub use script::ScriptedModel;
