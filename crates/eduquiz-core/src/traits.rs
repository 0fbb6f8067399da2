//! Core traits for EduQuiz collaborators.
//!
//! This module defines the capability interfaces at the system's seams:
//!
//! - [`Embedder`]: Convert text to vector embeddings
//! - [`LanguageModel`]: Chat-completion calls (query expansion, synthesis)
//! - [`DocumentStore`]: Mongo-like persistence for quizzes and classrooms
//! - [`FormService`]: The external form-publishing collaborator
//!
//! The pipeline only ever sees these traits, so tests can substitute
//! deterministic stubs for the hosted model providers and remote services.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{EmbedError, FormError, LlmError, StoreError};
use crate::types::{FormItem, FormResponse};

// ============================================================================
// Embeddings
// ============================================================================

/// Trait for generating text embeddings.
///
/// Assumed deterministic for identical input within one request.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Name of the backing model.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single query string.
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vectors = self.embed_texts(&[query]).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbedError::Response("empty batch result".to_string()))
    }
}

// ============================================================================
// Language Model
// ============================================================================

/// Trait for chat-completion calls.
///
/// Output is untrusted text to be parsed, never executed.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Name of the backing model.
    fn model_name(&self) -> &str;

    /// Send a single prompt and return the model's reply text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

// ============================================================================
// Document Store
// ============================================================================

/// Trait for the Mongo-like document store.
///
/// Documents are JSON objects; filters match on top-level field equality.
/// `update_one` merges the patch's top-level fields into the first matching
/// document (set semantics).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning its assigned id.
    async fn insert(&self, collection: &str, doc: Value) -> Result<Uuid, StoreError>;

    /// Find all documents matching the filter.
    async fn find(&self, collection: &str, filter: &Value) -> Result<Vec<Value>, StoreError>;

    /// Find the first document matching the filter.
    async fn find_one(&self, collection: &str, filter: &Value)
        -> Result<Option<Value>, StoreError>;

    /// Find the matching document with the greatest value in `sort_field`.
    async fn find_latest(
        &self,
        collection: &str,
        filter: &Value,
        sort_field: &str,
    ) -> Result<Option<Value>, StoreError>;

    /// Merge `patch`'s top-level fields into the first matching document.
    /// Returns the number of documents modified (0 or 1).
    async fn update_one(
        &self,
        collection: &str,
        filter: &Value,
        patch: Value,
    ) -> Result<u64, StoreError>;

    /// Delete the first matching document. Returns the number deleted.
    async fn delete_one(&self, collection: &str, filter: &Value) -> Result<u64, StoreError>;
}

// ============================================================================
// Form Service
// ============================================================================

/// Metadata about one published form item, as reported by the service.
#[derive(Debug, Clone)]
pub struct FormItemInfo {
    /// Service-assigned question identifier
    pub question_id: String,
    /// Item title (the question text)
    pub title: String,
}

/// Trait for the external form-publishing collaborator.
#[async_trait]
pub trait FormService: Send + Sync {
    /// Create an empty form and return its id.
    async fn create_form(&self, title: &str) -> Result<String, FormError>;

    /// Append multiple-choice items to a form, in the given order.
    async fn add_items(&self, form_id: &str, items: &[FormItem]) -> Result<(), FormError>;

    /// List the form's items with their service-assigned question ids.
    async fn get_form(&self, form_id: &str) -> Result<Vec<FormItemInfo>, FormError>;

    /// List submitted responses for a form.
    async fn list_responses(&self, form_id: &str) -> Result<Vec<FormResponse>, FormError>;
}
