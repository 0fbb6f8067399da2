//! Structural validation of generated questions.
//!
//! Validation is fail-fast and all-or-nothing: the first violating draft
//! aborts the batch with its index and reason, and no draft is promoted.

use eduquiz_core::{PipelineError, QuestionDraft};
use serde_json::Value;
use tracing::debug;

use crate::synthesizer::RawQuestion;

const REQUIRED_FIELDS: [&str; 4] = ["question", "options", "correct_answer", "explanation"];

/// Validate a batch of raw question records and promote them to drafts.
///
/// Per draft, in order: all four required fields present with the right
/// JSON types, non-empty question text, exactly 4 options,
/// `correct_answer` byte-equal to one option. The comparison is case-sensitive because answers are later
/// matched by exact string compare when responses come back.
pub fn validate(raw: &[RawQuestion]) -> Result<Vec<QuestionDraft>, PipelineError> {
    let mut drafts = Vec::with_capacity(raw.len());
    for (index, question) in raw.iter().enumerate() {
        drafts.push(validate_one(question).map_err(|reason| PipelineError::Validation {
            index,
            reason,
        })?);
    }
    debug!("Validated {} question drafts", drafts.len());
    Ok(drafts)
}

fn validate_one(question: &RawQuestion) -> Result<QuestionDraft, String> {
    for field in REQUIRED_FIELDS {
        if !question.contains_key(field) {
            return Err(format!("missing required field: {field}"));
        }
    }

    let text = string_field(question, "question")?;
    if text.trim().is_empty() {
        return Err("question text is empty".into());
    }
    let correct_answer = string_field(question, "correct_answer")?;
    let explanation = string_field(question, "explanation")?;

    let Some(Value::Array(raw_options)) = question.get("options") else {
        return Err("field options is not an array".into());
    };
    if raw_options.len() != 4 {
        return Err(format!(
            "wrong option count: expected 4, got {}",
            raw_options.len()
        ));
    }
    let mut options = Vec::with_capacity(4);
    for option in raw_options {
        match option {
            Value::String(s) => options.push(s.clone()),
            _ => return Err("option is not a string".into()),
        }
    }

    if !options.iter().any(|option| *option == correct_answer) {
        return Err("correct answer is not one of the options".into());
    }

    Ok(QuestionDraft {
        question: text,
        options,
        correct_answer,
        explanation,
    })
}

fn string_field(question: &RawQuestion, field: &str) -> Result<String, String> {
    match question.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("field {field} is not a string")),
        None => Err(format!("missing required field: {field}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::parse_questions;

    fn raw(json: &str) -> Vec<RawQuestion> {
        parse_questions(json).unwrap()
    }

    const VALID: &str = r#"[
        {"question": "What causes tides?",
         "options": ["A. Wind", "B. The Moon", "C. Salt", "D. Whales"],
         "correct_answer": "B. The Moon",
         "explanation": "Lunar gravity pulls the oceans."}
    ]"#;

    #[test]
    fn test_valid_batch_is_promoted() {
        let drafts = validate(&raw(VALID)).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].correct_answer, "B. The Moon");
    }

    #[test]
    fn test_empty_batch_trivially_passes() {
        assert!(validate(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_field_reports_index_and_reason() {
        let batch = raw(r#"[
            {"question": "ok",
             "options": ["A", "B", "C", "D"],
             "correct_answer": "A",
             "explanation": "fine"},
            {"question": "no options here",
             "correct_answer": "A",
             "explanation": "oops"}
        ]"#);
        match validate(&batch).unwrap_err() {
            PipelineError::Validation { index, reason } => {
                assert_eq!(index, 1);
                assert_eq!(reason, "missing required field: options");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_question_text_is_rejected() {
        // A titleless question could not be matched when responses come
        // back, so it must never be promoted.
        let batch = raw(r#"[
            {"question": "   ",
             "options": ["A", "B", "C", "D"],
             "correct_answer": "A",
             "explanation": "e"}
        ]"#);
        match validate(&batch).unwrap_err() {
            PipelineError::Validation { index, reason } => {
                assert_eq!(index, 0);
                assert_eq!(reason, "question text is empty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_three_options_fails_with_count_reason() {
        let batch = raw(r#"[
            {"question": "q",
             "options": ["A", "B", "C"],
             "correct_answer": "A",
             "explanation": "e"}
        ]"#);
        match validate(&batch).unwrap_err() {
            PipelineError::Validation { index, reason } => {
                assert_eq!(index, 0);
                assert_eq!(reason, "wrong option count: expected 4, got 3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_correct_answer_comparison_is_case_sensitive() {
        let batch = raw(r#"[
            {"question": "q",
             "options": ["A. yes", "B. no", "C. maybe", "D. dunno"],
             "correct_answer": "a. YES",
             "explanation": "e"}
        ]"#);
        match validate(&batch).unwrap_err() {
            PipelineError::Validation { index: 0, reason } => {
                assert_eq!(reason, "correct answer is not one of the options");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_stops_at_first_failure() {
        // Both drafts are bad; only index 0 may be reported.
        let batch = raw(r#"[
            {"question": "q", "options": ["A"], "correct_answer": "A", "explanation": "e"},
            {"question": "q", "options": [], "correct_answer": "A", "explanation": "e"}
        ]"#);
        match validate(&batch).unwrap_err() {
            PipelineError::Validation { index, .. } => assert_eq!(index, 0),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_string_option_is_rejected() {
        let batch = raw(r#"[
            {"question": "q",
             "options": ["A", "B", "C", 4],
             "correct_answer": "A",
             "explanation": "e"}
        ]"#);
        match validate(&batch).unwrap_err() {
            PipelineError::Validation { index: 0, reason } => {
                assert_eq!(reason, "option is not a string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
