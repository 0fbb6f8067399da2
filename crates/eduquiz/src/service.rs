//! Classroom and quiz lifecycle service.
//!
//! Ties the generation pipeline to the document store and the form
//! service. One [`QuizService`] instance serves all teachers; per-request
//! state lives in the pipeline.
//!
//! ## Collections
//!
//! | Collection | Holds |
//! |------------|-------|
//! | `classrooms` | classroom records with enrolled students |
//! | `quizzes` | generated quizzes and their form links |
//! | `form_responses` | per-form answer keys (correct answers never reach the form service) |
//! | `user_responses` | fetched student responses, with evaluations merged in |

use chrono::Utc;
use eduquiz_core::{
    Classroom, Difficulty, Error, Evaluation, FormItem, FormMetadata, FormQuestion, FormResponse,
    FormService, DocumentStore, Quiz, QuestionResult, Result, SourceFormat, StoreError,
    StoredResponse, StudentRef,
};
use eduquiz_pipeline::{GenerationRequest, QuizGenerator};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const CLASSROOMS: &str = "classrooms";
const QUIZZES: &str = "quizzes";
const FORM_METADATA: &str = "form_responses";
const USER_RESPONSES: &str = "user_responses";

/// Everything needed to create a classroom with its generated quiz.
#[derive(Debug, Clone)]
pub struct CreateClassroomRequest {
    pub name: String,
    pub subject: String,
    pub description: String,
    pub teacher: String,
    /// Newline-separated student email addresses
    pub student_emails: String,
    /// Path to the uploaded source document
    pub document: PathBuf,
    pub format: SourceFormat,
    pub difficulty: Difficulty,
    pub num_questions: usize,
}

/// Identifiers of everything a successful creation produced.
#[derive(Debug, Clone, Serialize)]
pub struct ClassroomCreated {
    pub classroom_id: Uuid,
    pub quiz_id: Uuid,
    pub form_id: String,
    pub form_link: String,
}

/// A quiz as shown in a student's classroom listing.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub id: Uuid,
    pub title: String,
    pub form_link: Option<String>,
    pub name: String,
    pub subject: String,
}

/// A classroom as shown to a logged-in student.
#[derive(Debug, Clone, Serialize)]
pub struct StudentClassroom {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub quizzes: Vec<QuizSummary>,
}

/// One row of the per-subject results table.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub email: String,
    pub score: usize,
    pub total_questions: usize,
    pub timestamp: String,
}

/// The most recently published form.
#[derive(Debug, Clone, Serialize)]
pub struct LatestForm {
    pub form_id: String,
    pub quiz_id: Uuid,
}

/// The classroom/quiz service.
pub struct QuizService {
    store: Arc<dyn DocumentStore>,
    forms: Arc<dyn FormService>,
    generator: QuizGenerator,
}

/// Answers compare trimmed and lowercased, so options differing only in
/// case or surrounding whitespace are treated as the same answer.
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn form_link_for(form_id: &str) -> String {
    format!("https://docs.google.com/forms/d/{form_id}/viewform")
}

impl QuizService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        forms: Arc<dyn FormService>,
        generator: QuizGenerator,
    ) -> Self {
        Self {
            store,
            forms,
            generator,
        }
    }

    /// Create a classroom end-to-end: generate the quiz, persist it,
    /// publish the form, store the answer key, then insert the classroom.
    ///
    /// Any failure after the quiz document is inserted rolls the quiz and
    /// its answer key back before the error is returned.
    pub async fn create_classroom(
        &self,
        request: CreateClassroomRequest,
    ) -> Result<ClassroomCreated> {
        info!("Creating classroom {:?} for {}", request.name, request.teacher);

        let questions = self
            .generator
            .generate_quiz(&GenerationRequest {
                document: request.document.clone(),
                format: request.format,
                difficulty: request.difficulty,
                num_questions: request.num_questions,
            })
            .await?;
        info!("Generated {} questions", questions.len());

        let quiz = Quiz {
            id: Uuid::new_v4(),
            title: format!("Quiz for {}", request.name),
            questions,
            created_date: Utc::now(),
            form_link: None,
            name: request.name.clone(),
            subject: request.subject.clone(),
        };
        self.store
            .insert(QUIZZES, serde_json::to_value(&quiz)?)
            .await?;
        debug!("Quiz saved with id {}", quiz.id);

        // Everything past this point must roll the quiz back on failure.
        match self.publish_and_save(&request, &quiz).await {
            Ok(created) => Ok(created),
            Err(e) => {
                self.rollback(quiz.id).await;
                Err(e)
            }
        }
    }

    async fn publish_and_save(
        &self,
        request: &CreateClassroomRequest,
        quiz: &Quiz,
    ) -> Result<ClassroomCreated> {
        let form_id = self.forms.create_form(&quiz.title).await?;
        debug!("Form created with id {}", form_id);

        let items: Vec<FormItem> = quiz
            .questions
            .iter()
            .map(|q| FormItem {
                title: q.question.clone(),
                options: q.options.clone(),
            })
            .collect();
        self.forms.add_items(&form_id, &items).await?;

        let form_link = form_link_for(&form_id);
        self.store
            .update_one(
                QUIZZES,
                &json!({ "id": quiz.id.to_string() }),
                json!({ "form_link": form_link }),
            )
            .await?;

        let metadata = FormMetadata {
            quiz_id: quiz.id,
            form_id: form_id.clone(),
            title: quiz.title.clone(),
            questions: quiz
                .questions
                .iter()
                .map(|q| FormQuestion {
                    question_text: q.question.clone(),
                    options: q.options.clone(),
                    correct_answer: q.correct_answer.clone(),
                    explanation: q.explanation.clone(),
                })
                .collect(),
            form_link: form_link.clone(),
            created_date: Utc::now(),
        };
        self.store
            .insert(FORM_METADATA, serde_json::to_value(&metadata)?)
            .await?;

        let students: Vec<StudentRef> = request
            .student_emails
            .lines()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(|email| StudentRef {
                email: email.to_string(),
            })
            .collect();
        let classroom = Classroom {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            subject: request.subject.clone(),
            description: request.description.clone(),
            document: request.document.to_string_lossy().into_owned(),
            teacher: request.teacher.clone(),
            students,
            quizzes: vec![quiz.id],
            created_date: Utc::now(),
            status: "active".to_string(),
        };
        self.store
            .insert(CLASSROOMS, serde_json::to_value(&classroom)?)
            .await?;
        info!(
            "Classroom {} created with quiz {} and form {}",
            classroom.id, quiz.id, form_id
        );

        Ok(ClassroomCreated {
            classroom_id: classroom.id,
            quiz_id: quiz.id,
            form_id,
            form_link,
        })
    }

    /// Best-effort removal of the quiz and its answer key after a failed
    /// creation. Rollback failures are logged, not returned; the original
    /// error is what the caller needs to see.
    async fn rollback(&self, quiz_id: Uuid) {
        warn!("Rolling back quiz {}", quiz_id);
        if let Err(e) = self
            .store
            .delete_one(QUIZZES, &json!({ "id": quiz_id.to_string() }))
            .await
        {
            warn!("Rollback failed to delete quiz {}: {}", quiz_id, e);
        }
        if let Err(e) = self
            .store
            .delete_one(FORM_METADATA, &json!({ "quiz_id": quiz_id.to_string() }))
            .await
        {
            warn!("Rollback failed to delete answer key for {}: {}", quiz_id, e);
        }
    }

    /// Classrooms the student is enrolled in, with quiz ids resolved to
    /// summaries. Unresolvable quiz ids are skipped, not fatal.
    pub async fn student_classrooms(&self, email: &str) -> Result<Vec<StudentClassroom>> {
        let docs = self
            .store
            .find(CLASSROOMS, &json!({ "students.email": email }))
            .await?;
        debug!("Student {} is in {} classrooms", email, docs.len());

        let mut classrooms = Vec::with_capacity(docs.len());
        for doc in docs {
            let classroom: Classroom = serde_json::from_value(doc)?;
            let mut quizzes = Vec::with_capacity(classroom.quizzes.len());
            for quiz_id in &classroom.quizzes {
                match self.find_quiz(*quiz_id).await? {
                    Some(quiz) => quizzes.push(QuizSummary {
                        id: quiz.id,
                        title: quiz.title,
                        form_link: quiz.form_link,
                        name: quiz.name,
                        subject: quiz.subject,
                    }),
                    None => warn!("Classroom {} references missing quiz {}", classroom.id, quiz_id),
                }
            }
            classrooms.push(StudentClassroom {
                id: classroom.id,
                name: classroom.name,
                subject: classroom.subject,
                quizzes,
            });
        }
        Ok(classrooms)
    }

    async fn find_quiz(&self, id: Uuid) -> Result<Option<Quiz>> {
        let doc = self
            .store
            .find_one(QUIZZES, &json!({ "id": id.to_string() }))
            .await?;
        Ok(match doc {
            Some(doc) => Some(serde_json::from_value(doc)?),
            None => None,
        })
    }

    /// Stored quiz with questions and form link.
    pub async fn get_quiz(&self, id: Uuid) -> Result<Quiz> {
        self.find_quiz(id)
            .await?
            .ok_or_else(|| Error::Store(StoreError::NotFound(format!("quiz {id}"))))
    }

    /// Pull submitted responses from the form service and persist the ones
    /// not seen before. Returns every response currently on the form.
    pub async fn fetch_responses(&self, form_id: &str) -> Result<Vec<StoredResponse>> {
        let responses = self.forms.list_responses(form_id).await?;
        info!("Form {} has {} responses", form_id, responses.len());

        let mut stored = Vec::with_capacity(responses.len());
        for response in responses {
            let record = self.store_response(form_id, response).await?;
            stored.push(record);
        }
        Ok(stored)
    }

    async fn store_response(
        &self,
        form_id: &str,
        response: FormResponse,
    ) -> Result<StoredResponse> {
        let filter = json!({
            "form_id": form_id,
            "response_id": response.response_id,
        });
        if let Some(existing) = self.store.find_one(USER_RESPONSES, &filter).await? {
            return Ok(serde_json::from_value(existing)?);
        }

        let record = StoredResponse {
            response_id: response.response_id,
            response_time: response.create_time,
            answers: response.answers,
            form_id: form_id.to_string(),
            created_date: Utc::now(),
        };
        self.store
            .insert(USER_RESPONSES, serde_json::to_value(&record)?)
            .await?;
        debug!("Stored response {} for form {}", record.response_id, form_id);
        Ok(record)
    }

    /// Score a stored response against the stored answer key.
    ///
    /// With no `response_id` the most recently fetched response is scored;
    /// if none is stored yet, responses are fetched from the form service
    /// first. Questions are matched to form items by title, answers are
    /// compared normalized, and the evaluation is merged back onto the
    /// stored response document.
    pub async fn evaluate(
        &self,
        form_id: &str,
        response_id: Option<&str>,
        email: Option<&str>,
        subject: Option<&str>,
    ) -> Result<Evaluation> {
        let metadata_doc = self
            .store
            .find_one(FORM_METADATA, &json!({ "form_id": form_id }))
            .await?
            .ok_or_else(|| {
                Error::Store(StoreError::NotFound(format!("answer key for form {form_id}")))
            })?;
        let metadata: FormMetadata = serde_json::from_value(metadata_doc)?;
        if metadata.questions.is_empty() {
            return Err(Error::Store(StoreError::NotFound(format!(
                "no questions stored for form {form_id}"
            ))));
        }

        let stored = match self.find_response(form_id, response_id).await? {
            Some(stored) => stored,
            None => {
                debug!("No stored response for form {}, fetching", form_id);
                self.fetch_responses(form_id).await?;
                self.find_response(form_id, response_id)
                    .await?
                    .ok_or_else(|| {
                        Error::Store(StoreError::NotFound(format!(
                            "no responses for form {form_id}"
                        )))
                    })?
            }
        };

        // Answers come keyed by the service's question id; the published
        // items map those ids back to question titles.
        let items = self.forms.get_form(form_id).await?;

        let mut score = 0;
        let mut question_results = Vec::with_capacity(metadata.questions.len());
        for question in &metadata.questions {
            let user_answer = items
                .iter()
                .find(|item| normalize(&item.title) == normalize(&question.question_text))
                .and_then(|item| stored.answers.get(&item.question_id))
                .map(|answer| answer.trim().to_string())
                .unwrap_or_default();

            let is_correct =
                !user_answer.is_empty() && normalize(&user_answer) == normalize(&question.correct_answer);
            if is_correct {
                score += 1;
            }
            question_results.push(QuestionResult {
                question: question.question_text.clone(),
                correct_answer: question.correct_answer.clone(),
                user_answer: if user_answer.is_empty() {
                    "Not answered".to_string()
                } else {
                    user_answer
                },
                is_correct,
            });
        }

        let total_questions = metadata.questions.len();
        let percentage = if total_questions > 0 {
            (score as f64 / total_questions as f64 * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };
        info!(
            "Form {} response {}: {}/{} ({}%)",
            form_id, stored.response_id, score, total_questions, percentage
        );

        let evaluation = Evaluation {
            response_id: stored.response_id.clone(),
            form_id: form_id.to_string(),
            score,
            percentage,
            total_questions,
            question_results,
            evaluated_at: Utc::now(),
            email: email.unwrap_or("Unknown").to_string(),
            subject: subject.unwrap_or("General Knowledge").to_string(),
        };

        // Merged top-level so per-subject result queries can filter on the
        // evaluation fields directly.
        self.store
            .update_one(
                USER_RESPONSES,
                &json!({
                    "form_id": form_id,
                    "response_id": stored.response_id,
                }),
                serde_json::to_value(&evaluation)?,
            )
            .await?;

        Ok(evaluation)
    }

    async fn find_response(
        &self,
        form_id: &str,
        response_id: Option<&str>,
    ) -> Result<Option<StoredResponse>> {
        let doc = match response_id {
            Some(rid) => {
                self.store
                    .find_one(
                        USER_RESPONSES,
                        &json!({ "form_id": form_id, "response_id": rid }),
                    )
                    .await?
            }
            None => {
                self.store
                    .find_latest(USER_RESPONSES, &json!({ "form_id": form_id }), "created_date")
                    .await?
            }
        };
        Ok(match doc {
            Some(doc) => Some(serde_json::from_value(doc)?),
            None => None,
        })
    }

    /// Evaluated scores for every response in a subject.
    pub async fn quiz_results(&self, subject: &str) -> Result<Vec<ResultRow>> {
        let docs = self
            .store
            .find(USER_RESPONSES, &json!({ "subject": subject }))
            .await?;
        debug!("Found {} evaluated responses for {:?}", docs.len(), subject);

        Ok(docs
            .into_iter()
            .map(|doc| ResultRow {
                email: doc
                    .get("email")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown")
                    .to_string(),
                score: doc.get("score").and_then(|v| v.as_u64()).unwrap_or(0) as usize,
                total_questions: doc
                    .get("total_questions")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as usize,
                timestamp: doc
                    .get("evaluated_at")
                    .and_then(|v| v.as_str())
                    .unwrap_or("N/A")
                    .to_string(),
            })
            .collect())
    }

    /// The most recently published form's identifiers.
    pub async fn latest_form(&self) -> Result<LatestForm> {
        let doc = self
            .store
            .find_latest(FORM_METADATA, &json!({}), "created_date")
            .await?
            .ok_or_else(|| Error::Store(StoreError::NotFound("no forms published".into())))?;
        let metadata: FormMetadata = serde_json::from_value(doc)?;
        Ok(LatestForm {
            form_id: metadata.form_id,
            quiz_id: metadata.quiz_id,
        })
    }
}
