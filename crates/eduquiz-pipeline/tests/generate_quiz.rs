//! Integration tests for the full generation pipeline.
//!
//! Tests the complete flow: load → chunk → index → retrieve → synthesize
//! → validate, with a deterministic hash embedder and a scripted language
//! model standing in for the hosted providers.

use eduquiz_core::{Difficulty, PipelineError, SourceFormat};
use eduquiz_embed::{EmbedderPool, HashEmbedder};
use eduquiz_llm::ScriptedModel;
use eduquiz_pipeline::{GenerationRequest, PipelineConfig, QuizGenerator};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

const EXPANSION_REPLY: &str = "key facts from the document\nmain ideas of the text";

const TWO_QUESTIONS: &str = r#"[
    {"question": "What drives the water cycle?",
     "options": ["A. The Sun", "B. The wind", "C. Gravity", "D. Tides"],
     "correct_answer": "A. The Sun",
     "explanation": "Solar energy drives evaporation."},
    {"question": "What is condensation?",
     "options": ["A. Freezing", "B. Vapor to liquid", "C. Liquid to vapor", "D. Melting"],
     "correct_answer": "B. Vapor to liquid",
     "explanation": "Vapor cools into droplets."}
]"#;

fn fixture(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{text}").unwrap();
    file
}

fn generator(replies: &[&str]) -> QuizGenerator {
    let pool = Arc::new(EmbedderPool::new(Arc::new(HashEmbedder::new()), 16, 4));
    let llm = Arc::new(ScriptedModel::new(replies.iter().copied()));
    QuizGenerator::new(pool, llm, PipelineConfig::default())
}

fn request(path: &Path, num_questions: usize) -> GenerationRequest {
    GenerationRequest {
        document: path.to_path_buf(),
        format: SourceFormat::Other,
        difficulty: Difficulty::Medium,
        num_questions,
    }
}

#[tokio::test]
async fn generates_validated_questions_from_plain_text() {
    let doc = fixture(&"the water cycle moves water between land, sea and sky. ".repeat(10));
    let generator = generator(&[EXPANSION_REPLY, TWO_QUESTIONS]);

    let questions = generator
        .generate_quiz(&request(doc.path(), 2))
        .await
        .unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].correct_answer, "A. The Sun");
    assert!(questions.iter().all(|q| q.options.len() == 4));
}

#[tokio::test]
async fn repeated_runs_are_structurally_identical() {
    let text = "photosynthesis converts light into chemical energy. ".repeat(20);

    let mut shapes = Vec::new();
    for _ in 0..2 {
        let doc = fixture(&text);
        let generator = generator(&[EXPANSION_REPLY, TWO_QUESTIONS]);
        let questions = generator
            .generate_quiz(&request(doc.path(), 2))
            .await
            .unwrap();
        shapes.push(
            questions
                .iter()
                .map(|q| (q.question.clone(), q.options.len()))
                .collect::<Vec<_>>(),
        );
    }
    assert_eq!(shapes[0], shapes[1]);
}

#[tokio::test]
async fn short_document_becomes_one_chunk_and_full_content() {
    // 500 characters with chunk_size=2000: exactly one chunk, and the
    // retrieved content must be that chunk's full text.
    let text = "b".repeat(500);
    let doc = fixture(&text);
    let generator = generator(&[EXPANSION_REPLY, TWO_QUESTIONS]);

    let retriever = generator
        .prepare_retriever(doc.path(), SourceFormat::Other)
        .await
        .unwrap();
    assert_eq!(retriever.index_len(), 1);

    let content = retriever.retrieve(Difficulty::Easy).await.unwrap();
    assert_eq!(content, text);
}

#[tokio::test]
async fn zero_questions_fails_fast_without_model_calls() {
    let doc = fixture("some content");
    let llm = Arc::new(ScriptedModel::new([EXPANSION_REPLY]));
    let pool = Arc::new(EmbedderPool::new(Arc::new(HashEmbedder::new()), 16, 4));
    let generator = QuizGenerator::new(pool, llm.clone(), PipelineConfig::default());

    let err = generator
        .generate_quiz(&request(doc.path(), 0))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidParameter(_)));
    assert!(llm.prompts().is_empty(), "no model call should have happened");
}

#[tokio::test]
async fn empty_document_halts_before_any_model_call() {
    let doc = fixture("");
    let llm = Arc::new(ScriptedModel::new([EXPANSION_REPLY]));
    let pool = Arc::new(EmbedderPool::new(Arc::new(HashEmbedder::new()), 16, 4));
    let generator = QuizGenerator::new(pool, llm.clone(), PipelineConfig::default());

    let err = generator
        .generate_quiz(&request(doc.path(), 3))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::EmptyDocument(_)));
    assert!(llm.prompts().is_empty());
}

#[tokio::test]
async fn missing_file_fails_with_document_load_error() {
    let generator = generator(&[EXPANSION_REPLY]);
    let err = generator
        .generate_quiz(&request(Path::new("/nonexistent/upload.txt"), 3))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::DocumentLoad(_)));
}

#[tokio::test]
async fn three_option_question_rejects_whole_batch() {
    let bad_batch = r#"[
        {"question": "fine",
         "options": ["A. a", "B. b", "C. c", "D. d"],
         "correct_answer": "A. a",
         "explanation": "ok"},
        {"question": "broken",
         "options": ["A. a", "B. b", "C. c"],
         "correct_answer": "A. a",
         "explanation": "only three options"}
    ]"#;
    let doc = fixture("enough content to retrieve from");
    let generator = generator(&[EXPANSION_REPLY, bad_batch]);

    let err = generator
        .generate_quiz(&request(doc.path(), 2))
        .await
        .unwrap_err();
    match err {
        PipelineError::Validation { index, reason } => {
            assert_eq!(index, 1);
            assert_eq!(reason, "wrong option count: expected 4, got 3");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_question_text_rejects_whole_batch() {
    let bad_batch = r#"[
        {"question": "",
         "options": ["A. a", "B. b", "C. c", "D. d"],
         "correct_answer": "A. a",
         "explanation": "no question text"}
    ]"#;
    let doc = fixture("enough content to retrieve from");
    let generator = generator(&[EXPANSION_REPLY, bad_batch]);

    let err = generator
        .generate_quiz(&request(doc.path(), 1))
        .await
        .unwrap_err();
    match err {
        PipelineError::Validation { index, reason } => {
            assert_eq!(index, 0);
            assert_eq!(reason, "question text is empty");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn prose_reply_fails_with_parse_error() {
    let doc = fixture("enough content to retrieve from");
    let generator = generator(&[EXPANSION_REPLY, "Here are your questions! 1) ..."]);

    let err = generator
        .generate_quiz(&request(doc.path(), 2))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::GenerationParse(_)));
}
