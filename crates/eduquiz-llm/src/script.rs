//! Scripted language model for deterministic tests.

use async_trait::async_trait;
use eduquiz_core::{LanguageModel, LlmError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Language model that replays canned replies in order.
///
/// Each `complete` call pops the next scripted reply; when the script runs
/// out, the last reply repeats. An empty script fails every call, which is
/// handy for exercising the unreachable-model path.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// Create a scripted model from a reply sequence.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a model whose every call fails as unreachable.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());

        let mut replies = self.replies.lock().expect("replies lock");
        if let Some(reply) = replies.pop_front() {
            *self.last.lock().expect("last lock") = Some(reply.clone());
            return Ok(reply);
        }
        drop(replies);

        if let Some(last) = self.last.lock().expect("last lock").clone() {
            return Ok(last);
        }
        Err(LlmError::Request("scripted model has no replies".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_repeats_last() {
        let model = ScriptedModel::new(["one", "two"]);
        assert_eq!(model.complete("a").await.unwrap(), "one");
        assert_eq!(model.complete("b").await.unwrap(), "two");
        assert_eq!(model.complete("c").await.unwrap(), "two");
    }

    #[tokio::test]
    async fn test_unreachable_always_fails() {
        let model = ScriptedModel::unreachable();
        assert!(matches!(
            model.complete("hello").await,
            Err(LlmError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_records_prompts() {
        let model = ScriptedModel::new(["ok"]);
        model.complete("first prompt").await.unwrap();
        assert_eq!(model.prompts(), vec!["first prompt".to_string()]);
    }
}
