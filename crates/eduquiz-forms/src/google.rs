//! Google Forms REST client.
//!
//! Three endpoints are used:
//!
//! - `POST /v1/forms` creates an empty form with a title
//! - `POST /v1/forms/{id}:batchUpdate` appends radio-choice items
//! - `GET /v1/forms/{id}` and `GET /v1/forms/{id}/responses` read the
//!   published items and the submitted answers
//!
//! Answers come back keyed by the service-assigned question id, so scoring
//! has to map question ids back to titles via [`get_form`](GoogleForms::get_form).

use async_trait::async_trait;
use eduquiz_core::{FormError, FormItem, FormItemInfo, FormResponse, FormService};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://forms.googleapis.com";

/// Google Forms API client.
#[derive(Debug)]
pub struct GoogleForms {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFormResponse {
    form_id: String,
}

#[derive(Deserialize, Default)]
struct GetFormResponse {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    #[serde(default)]
    title: String,
    question_item: Option<RawQuestionItem>,
}

#[derive(Deserialize)]
struct RawQuestionItem {
    question: RawQuestion,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question_id: String,
}

#[derive(Deserialize, Default)]
struct ListResponsesResponse {
    #[serde(default)]
    responses: Vec<RawResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    response_id: String,
    #[serde(default)]
    create_time: String,
    #[serde(default)]
    answers: HashMap<String, RawAnswer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnswer {
    text_answers: Option<RawTextAnswers>,
}

#[derive(Deserialize)]
struct RawTextAnswers {
    #[serde(default)]
    answers: Vec<RawAnswerValue>,
}

#[derive(Deserialize)]
struct RawAnswerValue {
    value: String,
}

impl GoogleForms {
    /// Build a client against the public Google Forms endpoint.
    pub fn new(access_token: &str, timeout: Duration) -> Result<Self, FormError> {
        Self::with_base_url(access_token, DEFAULT_BASE_URL, timeout)
    }

    /// Build a client against a custom endpoint (testing, proxies).
    pub fn with_base_url(
        access_token: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, FormError> {
        if access_token.trim().is_empty() {
            return Err(FormError::Request("missing form API access token".into()));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", access_token.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| FormError::Request("invalid form API access token".into()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FormError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn check(response: reqwest::Response, form_id: &str) -> Result<reqwest::Response, FormError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FormError::NotFound(form_id.to_string()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(FormError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Build the `createItem` request for one multiple-choice item.
fn create_item_request(item: &FormItem, index: usize) -> Value {
    let options: Vec<Value> = item
        .options
        .iter()
        .map(|option| json!({ "value": option }))
        .collect();
    json!({
        "createItem": {
            "item": {
                "title": item.title,
                "questionItem": {
                    "question": {
                        "required": true,
                        "choiceQuestion": {
                            "type": "RADIO",
                            "options": options,
                            "shuffle": false
                        }
                    }
                }
            },
            "location": { "index": index }
        }
    })
}

#[async_trait]
impl FormService for GoogleForms {
    async fn create_form(&self, title: &str) -> Result<String, FormError> {
        let body = json!({
            "info": {
                "title": title,
                "documentTitle": title
            }
        });
        let response = self
            .client
            .post(format!("{}/v1/forms", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| FormError::Request(e.to_string()))?;
        let response = Self::check(response, "").await?;

        let parsed: CreateFormResponse = response
            .json()
            .await
            .map_err(|e| FormError::Parse(e.to_string()))?;
        info!("Created form {} ({:?})", parsed.form_id, title);
        Ok(parsed.form_id)
    }

    async fn add_items(&self, form_id: &str, items: &[FormItem]) -> Result<(), FormError> {
        if items.is_empty() {
            return Ok(());
        }
        let requests: Vec<Value> = items
            .iter()
            .enumerate()
            .map(|(index, item)| create_item_request(item, index))
            .collect();
        let response = self
            .client
            .post(format!("{}/v1/forms/{}:batchUpdate", self.base_url, form_id))
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| FormError::Request(e.to_string()))?;
        Self::check(response, form_id).await?;
        debug!("Added {} items to form {}", items.len(), form_id);
        Ok(())
    }

    async fn get_form(&self, form_id: &str) -> Result<Vec<FormItemInfo>, FormError> {
        let response = self
            .client
            .get(format!("{}/v1/forms/{}", self.base_url, form_id))
            .send()
            .await
            .map_err(|e| FormError::Request(e.to_string()))?;
        let response = Self::check(response, form_id).await?;

        let parsed: GetFormResponse = response
            .json()
            .await
            .map_err(|e| FormError::Parse(e.to_string()))?;

        // Non-question items (section headers, media) carry no question id
        // and are skipped.
        Ok(parsed
            .items
            .into_iter()
            .filter_map(|item| {
                item.question_item.map(|q| FormItemInfo {
                    question_id: q.question.question_id,
                    title: item.title,
                })
            })
            .collect())
    }

    async fn list_responses(&self, form_id: &str) -> Result<Vec<FormResponse>, FormError> {
        let response = self
            .client
            .get(format!("{}/v1/forms/{}/responses", self.base_url, form_id))
            .send()
            .await
            .map_err(|e| FormError::Request(e.to_string()))?;
        let response = Self::check(response, form_id).await?;

        let parsed: ListResponsesResponse = response
            .json()
            .await
            .map_err(|e| FormError::Parse(e.to_string()))?;
        debug!("Form {} has {} responses", form_id, parsed.responses.len());

        Ok(parsed
            .responses
            .into_iter()
            .map(|raw| {
                let answers = raw
                    .answers
                    .into_iter()
                    .filter_map(|(question_id, answer)| {
                        answer
                            .text_answers
                            .and_then(|t| t.answers.into_iter().next())
                            .map(|first| (question_id, first.value))
                    })
                    .collect();
                FormResponse {
                    response_id: raw.response_id,
                    create_time: raw.create_time,
                    answers,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_rejected() {
        let err = GoogleForms::new("  ", Duration::from_secs(10)).unwrap_err();
        assert!(matches!(err, FormError::Request(_)));
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let client =
            GoogleForms::with_base_url("token", "https://forms.example.com/", Duration::from_secs(10))
                .unwrap();
        assert_eq!(client.base_url, "https://forms.example.com");
    }

    #[test]
    fn test_create_item_request_shape() {
        let item = FormItem {
            title: "What drives the water cycle?".to_string(),
            options: vec!["A. The Sun".to_string(), "B. Tides".to_string()],
        };
        let request = create_item_request(&item, 3);

        assert_eq!(
            request["createItem"]["item"]["title"],
            "What drives the water cycle?"
        );
        assert_eq!(request["createItem"]["location"]["index"], 3);
        let question = &request["createItem"]["item"]["questionItem"]["question"];
        assert_eq!(question["choiceQuestion"]["type"], "RADIO");
        assert_eq!(question["choiceQuestion"]["options"][0]["value"], "A. The Sun");
        assert_eq!(question["required"], true);
    }

    #[test]
    fn test_response_parsing_flattens_text_answers() {
        let raw = r#"{
            "responses": [{
                "responseId": "r1",
                "createTime": "2026-05-01T10:00:00Z",
                "answers": {
                    "qid1": {"textAnswers": {"answers": [{"value": "A. The Sun"}]}},
                    "qid2": {"textAnswers": {"answers": []}}
                }
            }]
        }"#;
        let parsed: ListResponsesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.responses.len(), 1);
        assert_eq!(parsed.responses[0].response_id, "r1");

        let answer = parsed.responses[0].answers["qid1"]
            .text_answers
            .as_ref()
            .unwrap();
        assert_eq!(answer.answers[0].value, "A. The Sun");
    }

    #[test]
    fn test_form_parsing_skips_non_question_items() {
        let raw = r#"{
            "items": [
                {"title": "Section header"},
                {"title": "Q1", "questionItem": {"question": {"questionId": "abc"}}}
            ]
        }"#;
        let parsed: GetFormResponse = serde_json::from_str(raw).unwrap();
        let questions: Vec<_> = parsed
            .items
            .into_iter()
            .filter_map(|item| item.question_item.map(|q| (q.question.question_id, item.title)))
            .collect();
        assert_eq!(questions, vec![("abc".to_string(), "Q1".to_string())]);
    }
}
