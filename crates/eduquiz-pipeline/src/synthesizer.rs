//! Question synthesizer.
//!
//! Formats retrieved content into a single structured prompt, invokes the
//! language model, and parses the reply into raw question records. The
//! records stay as JSON objects here; the structural contract is enforced
//! by the validator so that a missing field is reported as a validation
//! failure with its question index, not a blanket parse error.

use eduquiz_core::{Difficulty, LanguageModel, PipelineError};
use serde_json::{Map, Value};
use tracing::debug;

/// A parsed-but-unvalidated question record.
pub type RawQuestion = Map<String, Value>;

/// Build the generation prompt.
fn build_prompt(content: &str, difficulty: Difficulty, num_questions: usize) -> String {
    format!(
        r#"You are an expert quiz creator. Create {num_questions} quiz questions with the following parameters:

1. Difficulty level: {difficulty}
2. Each question should have four possible answers (A, B, C, D)
3. Only use information found in the provided content

Content:
{content}

Return the quiz in the following JSON format:

[
    {{"question": "Question text",
      "options": [
          "A. Option A",
          "B. Option B",
          "C. Option C",
          "D. Option D"
      ],
      "correct_answer": "A. Option A",
      "explanation": "Brief explanation of why this is correct"
    }}
]

Only return the JSON without any additional explanation or text."#
    )
}

/// Generate raw question records from retrieved content.
///
/// Transport/API failures surface as [`PipelineError::Llm`]; a reply that
/// arrives but is not a JSON array of objects fails with
/// [`PipelineError::GenerationParse`].
pub async fn synthesize(
    llm: &dyn LanguageModel,
    content: &str,
    difficulty: Difficulty,
    num_questions: usize,
) -> Result<Vec<RawQuestion>, PipelineError> {
    debug!(
        "Generating {} questions (difficulty: {}, content length: {})",
        num_questions,
        difficulty,
        content.len()
    );

    let prompt = build_prompt(content, difficulty, num_questions);
    let reply = llm.complete(&prompt).await?;
    parse_questions(&reply)
}

/// Parse a model reply into raw question records.
pub fn parse_questions(reply: &str) -> Result<Vec<RawQuestion>, PipelineError> {
    let body = strip_code_fence(reply);

    let value: Value = serde_json::from_str(body)
        .map_err(|e| PipelineError::GenerationParse(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(PipelineError::GenerationParse(
            "expected a JSON array of questions".into(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(PipelineError::GenerationParse(format!(
                "element {i} is not an object (got {})",
                type_name(&other)
            ))),
        })
        .collect()
}

/// Strip a Markdown code fence if the model wrapped its reply in one.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
