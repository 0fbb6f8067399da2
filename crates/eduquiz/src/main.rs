//! # EduQuiz CLI
//!
//! Command-line interface for the EduQuiz backend.
//!
//! ## Commands
//!
//! - `eduquiz generate <DOCUMENT>` - Generate quiz questions from a document
//! - `eduquiz create-classroom <DOCUMENT>` - Generate, persist and publish a quiz for a classroom
//! - `eduquiz responses <FORM_ID>` - Fetch submitted responses for a published form
//!
//! ## Examples
//!
//! ```bash
//! # Draft five medium questions from a PDF
//! eduquiz generate notes.pdf --num-questions 5
//!
//! # Full classroom flow, JSON output
//! eduquiz create-classroom notes.pdf --name "Bio 101" --subject Biology \
//!     --teacher ada --student a@school.edu --format json
//! ```
//!
//! `GROQ_API_KEY` must be set; `EMBEDDINGS_API_KEY` and
//! `FORMS_ACCESS_TOKEN` are required by the commands that use them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eduquiz::config::{self, Config};
use eduquiz::service::{CreateClassroomRequest, QuizService};
use eduquiz_core::{Difficulty, QuestionDraft, SourceFormat};
use eduquiz_embed::{EmbedderPool, HashEmbedder, HttpEmbedder};
use eduquiz_forms::GoogleForms;
use eduquiz_llm::ChatClient;
use eduquiz_pipeline::{ChunkConfig, GenerationRequest, PipelineConfig, QuizGenerator};
use eduquiz_store::MemoryStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "eduquiz")]
#[command(about = "Generate quizzes from documents and publish them as forms")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate quiz questions from a document
    Generate {
        /// Path to the source document (pdf, doc, docx, or plain text)
        document: PathBuf,

        /// Quiz difficulty
        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,

        /// Number of questions (1-20)
        #[arg(short, long, default_value = "5")]
        num_questions: usize,
    },

    /// Create a classroom: generate a quiz, persist it, publish the form
    CreateClassroom {
        /// Path to the source document
        document: PathBuf,

        /// Classroom name
        #[arg(long)]
        name: String,

        /// Subject taught
        #[arg(long)]
        subject: String,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// Teacher's name
        #[arg(long)]
        teacher: String,

        /// Student email (repeatable)
        #[arg(long = "student")]
        students: Vec<String>,

        /// Quiz difficulty
        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,

        /// Number of questions (1-20)
        #[arg(short, long, default_value = "5")]
        num_questions: usize,
    },

    /// Fetch submitted responses for a published form
    Responses {
        /// Form identifier
        form_id: String,
    },
}

/// Build the generation pipeline from config and environment credentials.
fn build_generator(config: &Config) -> Result<QuizGenerator> {
    let embedder: Arc<dyn eduquiz_core::Embedder> =
        match config::env_credential(config::EMBEDDINGS_API_KEY) {
            Some(key) => Arc::new(
                HttpEmbedder::new(
                    &key,
                    &config.embedding.base_url,
                    config.embedding.model.clone(),
                    config.embedding.dimension,
                    Duration::from_secs(config.llm.timeout_secs),
                )
                .context("Failed to build embeddings client")?,
            ),
            None => {
                warn!(
                    "{} not set, using deterministic hash embeddings",
                    config::EMBEDDINGS_API_KEY
                );
                Arc::new(HashEmbedder::with_dimension(config.embedding.dimension))
            }
        };
    let pool = Arc::new(EmbedderPool::new(
        embedder,
        config.embedding.batch_size,
        config.embedding.max_concurrent,
    ));

    let api_key = config::env_credential(config::GROQ_API_KEY)
        .with_context(|| format!("{} must be set", config::GROQ_API_KEY))?;
    let llm = Arc::new(
        ChatClient::new(
            &api_key,
            &config.llm.base_url,
            config.llm.model.clone(),
            config.llm.temperature,
            Duration::from_secs(config.llm.timeout_secs),
        )
        .context("Failed to build chat client")?,
    );

    Ok(QuizGenerator::new(
        pool,
        llm,
        PipelineConfig {
            chunk: ChunkConfig {
                chunk_size: config.chunking.chunk_size,
                overlap: config.chunking.overlap,
            },
            base_k: config.retrieval.base_k,
        },
    ))
}

fn build_service(config: &Config) -> Result<QuizService> {
    let token = config::env_credential(config::FORMS_ACCESS_TOKEN)
        .with_context(|| format!("{} must be set", config::FORMS_ACCESS_TOKEN))?;
    let forms = Arc::new(
        GoogleForms::new(&token, Duration::from_secs(config.forms.timeout_secs))
            .context("Failed to build form service client")?,
    );
    Ok(QuizService::new(
        Arc::new(MemoryStore::new()),
        forms,
        build_generator(config)?,
    ))
}

fn declared_format(document: &Path) -> SourceFormat {
    document
        .extension()
        .and_then(|ext| ext.to_str())
        .map(SourceFormat::from_extension)
        .unwrap_or(SourceFormat::Other)
}

fn print_questions(questions: &[QuestionDraft]) {
    for (i, q) in questions.iter().enumerate() {
        println!("{}. {}", i + 1, q.question);
        for option in &q.options {
            println!("   {option}");
        }
        println!("   Answer: {}", q.correct_answer);
        println!("   {}", q.explanation);
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = Config::default();

    match cli.command {
        Commands::Generate {
            document,
            difficulty,
            num_questions,
        } => {
            if !document.exists() {
                anyhow::bail!("Document does not exist: {}", document.display());
            }
            let generator = build_generator(&config)?;
            let questions = generator
                .generate_quiz(&GenerationRequest {
                    format: declared_format(&document),
                    document,
                    difficulty,
                    num_questions,
                })
                .await
                .context("Quiz generation failed")?;

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&questions)?);
                }
                OutputFormat::Text => print_questions(&questions),
            }
        }

        Commands::CreateClassroom {
            document,
            name,
            subject,
            description,
            teacher,
            students,
            difficulty,
            num_questions,
        } => {
            if !document.exists() {
                anyhow::bail!("Document does not exist: {}", document.display());
            }
            if students.is_empty() {
                anyhow::bail!("At least one --student email is required");
            }
            let service = build_service(&config)?;
            let created = service
                .create_classroom(CreateClassroomRequest {
                    name,
                    subject,
                    description,
                    teacher,
                    student_emails: students.join("\n"),
                    format: declared_format(&document),
                    document,
                    difficulty,
                    num_questions,
                })
                .await
                .context("Classroom creation failed")?;

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&created)?);
                }
                OutputFormat::Text => {
                    println!("Classroom: {}", created.classroom_id);
                    println!("Quiz:      {}", created.quiz_id);
                    println!("Form:      {}", created.form_id);
                    println!("Link:      {}", created.form_link);
                }
            }
        }

        Commands::Responses { form_id } => {
            let service = build_service(&config)?;
            let responses = service
                .fetch_responses(&form_id)
                .await
                .context("Failed to fetch responses")?;

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&responses)?);
                }
                OutputFormat::Text => {
                    if responses.is_empty() {
                        println!("No responses submitted yet.");
                    }
                    for response in &responses {
                        println!(
                            "{} ({}): {} answers",
                            response.response_id,
                            response.response_time,
                            response.answers.len()
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
