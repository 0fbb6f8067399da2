//! # eduquiz
//!
//! Application crate for the EduQuiz backend: configuration, the
//! classroom/quiz service layer, and the CLI binary.
//!
//! The heavy lifting lives in the pipeline crates; this crate wires a
//! [`QuizGenerator`](eduquiz_pipeline::QuizGenerator), a document store and
//! a form service together into [`QuizService`](service::QuizService).

pub mod config;
pub mod service;

pub use config::Config;
pub use service::{
    ClassroomCreated, CreateClassroomRequest, LatestForm, QuizService, QuizSummary, ResultRow,
    StudentClassroom,
};
