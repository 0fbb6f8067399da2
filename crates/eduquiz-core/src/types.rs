//! Core types for EduQuiz.
//!
//! This module contains the shared data structures used across the backend:
//!
//! ## Generation
//! - [`SourceFormat`]: Declared format of an uploaded document
//! - [`Chunk`]: A text window taken from the document
//! - [`Difficulty`]: Requested quiz difficulty
//! - [`QuestionDraft`]: An unvalidated generated question
//! - [`ScoredChunk`]: A chunk with its similarity score
//!
//! ## Persistence
//! - [`Quiz`]: A generated quiz and its published form link
//! - [`Classroom`]: Classroom record tying students to quizzes
//! - [`FormMetadata`]: Answer key stored alongside the published form
//!
//! ## Responses
//! - [`FormResponse`]: A raw response pulled from the form service
//! - [`StoredResponse`]: A response persisted for later evaluation
//! - [`Evaluation`]: Scoring result for one response

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Generation
// ============================================================================

/// Declared format of an uploaded document.
///
/// The format is declared by the caller (from the upload's file extension),
/// not sniffed from content; it selects which decoder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// PDF document
    Pdf,
    /// Legacy Word document
    Doc,
    /// Office Open XML Word document
    Docx,
    /// Anything else is treated as plain text
    Other,
}

impl SourceFormat {
    /// Map a file extension to a format. Unknown extensions decode as text.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "doc" => Self::Doc,
            "docx" => Self::Docx,
            _ => Self::Other,
        }
    }
}

/// A text window taken from a source document.
///
/// Chunks live only for the duration of one generation request; they are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The window's text
    pub text: String,
    /// Position of the window in the document (0-indexed)
    pub index: usize,
}

/// A chunk paired with its similarity score from an index search.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matching chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is closer)
    pub score: f32,
}

/// Requested quiz difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The query text used to retrieve content for this difficulty.
    #[must_use]
    pub fn retrieval_query(self) -> String {
        format!("Information for {self} difficulty quiz")
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("invalid difficulty level: {other}")),
        }
    }
}

/// An unvalidated generated question.
///
/// Produced by the synthesizer straight from model output; it becomes part
/// of a [`Quiz`] only after the whole batch passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    /// Question text
    pub question: String,
    /// The four candidate answers, in display order
    pub options: Vec<String>,
    /// Must be byte-equal to exactly one element of `options`
    pub correct_answer: String,
    /// Brief explanation of the correct answer
    pub explanation: String,
}

// ============================================================================
// Persistence
// ============================================================================

/// A generated quiz as persisted in the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique quiz identifier
    pub id: Uuid,
    /// Display title ("Quiz for {classroom}")
    pub title: String,
    /// Validated questions, in generation order
    pub questions: Vec<QuestionDraft>,
    /// When the quiz was generated
    pub created_date: DateTime<Utc>,
    /// Link to the published form; set only after publishing succeeds
    pub form_link: Option<String>,
    /// Classroom name the quiz was generated for
    pub name: String,
    /// Classroom subject
    pub subject: String,
}

/// Reference to an enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    /// Student email address
    pub email: String,
}

/// A classroom record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier
    pub id: Uuid,
    /// Classroom name
    pub name: String,
    /// Subject taught
    pub subject: String,
    /// Free-form description
    pub description: String,
    /// Path of the uploaded source document
    pub document: String,
    /// Owning teacher's name
    pub teacher: String,
    /// Enrolled students
    pub students: Vec<StudentRef>,
    /// Quizzes generated for this classroom
    pub quizzes: Vec<Uuid>,
    /// Creation timestamp
    pub created_date: DateTime<Utc>,
    /// Lifecycle status ("active")
    pub status: String,
}

/// One question of the stored answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

/// Answer key and form identifiers stored when a quiz is published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormMetadata {
    /// The persisted quiz this form belongs to
    pub quiz_id: Uuid,
    /// Identifier assigned by the form service
    pub form_id: String,
    /// Form title
    pub title: String,
    /// Questions with correct answers (never sent to the form service)
    pub questions: Vec<FormQuestion>,
    /// Public link to the form
    pub form_link: String,
    /// When the form was published
    pub created_date: DateTime<Utc>,
}

// ============================================================================
// Responses
// ============================================================================

/// A multiple-choice item to publish on a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormItem {
    /// Question text shown as the item title
    pub title: String,
    /// Radio options, in display order
    pub options: Vec<String>,
}

/// A raw response pulled from the form service.
///
/// `answers` maps the service's question id to the selected option text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    /// Identifier assigned by the form service
    pub response_id: String,
    /// Submission time as reported by the service
    pub create_time: String,
    /// Question id → selected answer text
    pub answers: HashMap<String, String>,
}

/// A form response persisted for later evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub response_id: String,
    pub response_time: String,
    pub answers: HashMap<String, String>,
    pub form_id: String,
    pub created_date: DateTime<Utc>,
}

/// Per-question outcome of an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub correct_answer: String,
    pub user_answer: String,
    pub is_correct: bool,
}

/// Scoring result for one stored response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// The stored response that was scored
    pub response_id: String,
    /// The form the response belongs to
    pub form_id: String,
    /// Number of correct answers
    pub score: usize,
    /// Score as a percentage, rounded to two decimals
    pub percentage: f64,
    /// Number of questions on the quiz
    pub total_questions: usize,
    /// Per-question breakdown
    pub question_results: Vec<QuestionResult>,
    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
    /// Student email, if supplied by the caller
    pub email: String,
    /// Quiz subject, if supplied by the caller
    pub subject: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_roundtrip() {
        for (s, d) in [
            ("easy", Difficulty::Easy),
            ("medium", Difficulty::Medium),
            ("hard", Difficulty::Hard),
        ] {
            assert_eq!(s.parse::<Difficulty>().unwrap(), d);
            assert_eq!(d.to_string(), s);
        }
    }

    #[test]
    fn test_difficulty_parse_is_case_insensitive() {
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_retrieval_query() {
        assert_eq!(
            Difficulty::Hard.retrieval_query(),
            "Information for hard difficulty quiz"
        );
    }

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("PDF"), SourceFormat::Pdf);
        assert_eq!(SourceFormat::from_extension("docx"), SourceFormat::Docx);
        assert_eq!(SourceFormat::from_extension("md"), SourceFormat::Other);
    }

    #[test]
    fn test_question_draft_serde() {
        let json = r#"{
            "question": "What is Rust?",
            "options": ["A. A language", "B. A fungus", "C. A game", "D. A car"],
            "correct_answer": "A. A language",
            "explanation": "Rust is a systems programming language."
        }"#;
        let draft: QuestionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.options.len(), 4);
        assert_eq!(draft.correct_answer, draft.options[0]);
    }
}
