//! Two-stage generation workflow.
//!
//! The workflow is a fixed sequence, `retrieve → generate`, modeled as an
//! explicit state machine rather than a generic graph engine. Every stage
//! failure is terminal and carries the originating error; there are no
//! retries here — if a caller wants retries it re-invokes the whole
//! pipeline.

use eduquiz_core::{Difficulty, LanguageModel, PipelineError, QuestionDraft};
use tracing::{debug, info, warn};

use crate::retriever::MultiQueryRetriever;
use crate::synthesizer;
use crate::validator;

/// Workflow stages. `Done`/failure are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Retrieving,
    Generating,
    Done,
}

/// State threaded through the workflow, mirroring what each stage reads
/// and writes. Not visible outside the pipeline call.
struct GenerationState {
    difficulty: Difficulty,
    num_questions: usize,
    content: Option<String>,
    questions: Option<Vec<QuestionDraft>>,
}

/// Run the two-stage workflow against a prepared retriever.
pub async fn run(
    retriever: &MultiQueryRetriever,
    llm: &dyn LanguageModel,
    difficulty: Difficulty,
    num_questions: usize,
) -> Result<Vec<QuestionDraft>, PipelineError> {
    let mut state = GenerationState {
        difficulty,
        num_questions,
        content: None,
        questions: None,
    };

    let mut stage = Stage::Retrieving;
    while stage != Stage::Done {
        stage = match stage {
            Stage::Retrieving => {
                debug!("Retrieving content for difficulty: {}", state.difficulty);
                let content = retriever.retrieve(state.difficulty).await?;
                debug!("Retrieved content length: {}", content.len());
                state.content = Some(content);
                Stage::Generating
            }
            Stage::Generating => {
                let content = state.content.as_deref().unwrap_or_default();
                let raw =
                    synthesizer::synthesize(llm, content, state.difficulty, state.num_questions)
                        .await?;
                let questions = validator::validate(&raw)?;

                // The source never reconciled requested vs. generated counts;
                // keep that behavior but make the drift visible.
                if questions.len() != state.num_questions {
                    warn!(
                        "Requested {} questions but model generated {}",
                        state.num_questions,
                        questions.len()
                    );
                }
                state.questions = Some(questions);
                Stage::Done
            }
            Stage::Done => unreachable!("loop exits on Done"),
        };
    }

    let questions = state.questions.unwrap_or_default();
    info!("Pipeline complete: {} validated questions", questions.len());
    Ok(questions)
}
