//! # eduquiz-forms
//!
//! Form-publishing collaborator for EduQuiz.
//!
//! Quizzes are published as multiple-choice forms on an external service;
//! students answer there, and the backend pulls their responses back for
//! scoring. This crate provides:
//!
//! - [`GoogleForms`]: the Google Forms REST client
//! - [`InMemoryForms`]: an in-process stand-in for tests
//!
//! Both implement [`FormService`](eduquiz_core::FormService). The service
//! never learns which option is correct; answer keys stay in the document
//! store.

pub mod google;
pub mod memory;

pub use google::GoogleForms;
pub use memory::InMemoryForms;
