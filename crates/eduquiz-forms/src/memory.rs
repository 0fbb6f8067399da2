//! In-memory form service for tests.

use async_trait::async_trait;
use eduquiz_core::{FormError, FormItem, FormItemInfo, FormResponse, FormService};
use std::collections::HashMap;
use std::sync::Mutex;

struct StoredForm {
    title: String,
    items: Vec<FormItem>,
    responses: Vec<FormResponse>,
}

/// In-process [`FormService`] with the same observable behavior as the
/// remote one: forms hold ordered items, each item gets a question id, and
/// responses are keyed by that id.
#[derive(Default)]
pub struct InMemoryForms {
    forms: Mutex<HashMap<String, StoredForm>>,
    fail_add_items: Mutex<bool>,
}

impl InMemoryForms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `add_items` call fail, for rollback tests.
    pub fn fail_next_add_items(&self) {
        *self.fail_add_items.lock().unwrap() = true;
    }

    /// Submit a response as a student would.
    ///
    /// `answers` maps item titles to selected options; they are re-keyed by
    /// question id like the real service does.
    pub fn submit_response(
        &self,
        form_id: &str,
        response_id: &str,
        create_time: &str,
        answers: &[(&str, &str)],
    ) -> Result<(), FormError> {
        let mut forms = self.forms.lock().unwrap();
        let form = forms
            .get_mut(form_id)
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))?;

        let by_id = answers
            .iter()
            .filter_map(|(title, answer)| {
                form.items
                    .iter()
                    .position(|item| item.title == *title)
                    .map(|idx| (question_id(form_id, idx), (*answer).to_string()))
            })
            .collect();
        form.responses.push(FormResponse {
            response_id: response_id.to_string(),
            create_time: create_time.to_string(),
            answers: by_id,
        });
        Ok(())
    }

    /// Title of a stored form, if it exists.
    pub fn form_title(&self, form_id: &str) -> Option<String> {
        self.forms
            .lock()
            .unwrap()
            .get(form_id)
            .map(|form| form.title.clone())
    }

    /// Number of forms currently stored.
    pub fn form_count(&self) -> usize {
        self.forms.lock().unwrap().len()
    }
}

fn question_id(form_id: &str, index: usize) -> String {
    format!("{form_id}-q{index}")
}

#[async_trait]
impl FormService for InMemoryForms {
    async fn create_form(&self, title: &str) -> Result<String, FormError> {
        let mut forms = self.forms.lock().unwrap();
        let form_id = format!("form-{}", forms.len() + 1);
        forms.insert(
            form_id.clone(),
            StoredForm {
                title: title.to_string(),
                items: Vec::new(),
                responses: Vec::new(),
            },
        );
        Ok(form_id)
    }

    async fn add_items(&self, form_id: &str, items: &[FormItem]) -> Result<(), FormError> {
        if std::mem::take(&mut *self.fail_add_items.lock().unwrap()) {
            return Err(FormError::Api {
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        let mut forms = self.forms.lock().unwrap();
        let form = forms
            .get_mut(form_id)
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))?;
        form.items.extend_from_slice(items);
        Ok(())
    }

    async fn get_form(&self, form_id: &str) -> Result<Vec<FormItemInfo>, FormError> {
        let forms = self.forms.lock().unwrap();
        let form = forms
            .get(form_id)
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))?;
        Ok(form
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| FormItemInfo {
                question_id: question_id(form_id, idx),
                title: item.title.clone(),
            })
            .collect())
    }

    async fn list_responses(&self, form_id: &str) -> Result<Vec<FormResponse>, FormError> {
        let forms = self.forms.lock().unwrap();
        let form = forms
            .get(form_id)
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))?;
        Ok(form.responses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> FormItem {
        FormItem {
            title: title.to_string(),
            options: vec!["A".to_string(), "B".to_string()],
        }
    }

    #[tokio::test]
    async fn test_items_get_stable_question_ids() {
        let service = InMemoryForms::new();
        let form_id = service.create_form("Quiz for Bio 101").await.unwrap();
        service
            .add_items(&form_id, &[item("Q1"), item("Q2")])
            .await
            .unwrap();

        let infos = service.get_form(&form_id).await.unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].title, "Q1");
        assert_ne!(infos[0].question_id, infos[1].question_id);
    }

    #[tokio::test]
    async fn test_responses_are_keyed_by_question_id() {
        let service = InMemoryForms::new();
        let form_id = service.create_form("t").await.unwrap();
        service.add_items(&form_id, &[item("Q1")]).await.unwrap();
        service
            .submit_response(&form_id, "r1", "2026-05-01T10:00:00Z", &[("Q1", "A")])
            .unwrap();

        let responses = service.list_responses(&form_id).await.unwrap();
        assert_eq!(responses.len(), 1);
        let qid = &service.get_form(&form_id).await.unwrap()[0].question_id;
        assert_eq!(responses[0].answers[qid], "A");
    }

    #[tokio::test]
    async fn test_unknown_form_is_not_found() {
        let service = InMemoryForms::new();
        let err = service.get_form("missing").await.unwrap_err();
        assert!(matches!(err, FormError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_injected_add_items_failure_fires_once() {
        let service = InMemoryForms::new();
        let form_id = service.create_form("t").await.unwrap();
        service.fail_next_add_items();

        assert!(service.add_items(&form_id, &[item("Q1")]).await.is_err());
        assert!(service.add_items(&form_id, &[item("Q1")]).await.is_ok());
    }
}
