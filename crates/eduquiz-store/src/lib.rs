//! # eduquiz-store
//!
//! In-memory document store for EduQuiz.
//!
//! This crate provides a [`MemoryStore`] implementing the
//! [`DocumentStore`](eduquiz_core::DocumentStore) trait: named collections
//! of JSON documents with Mongo-flavored filters. It backs tests and
//! single-process deployments; a real database client would implement the
//! same trait.
//!
//! Filter semantics:
//! - top-level fields match by equality
//! - dotted paths descend into nested objects
//! - when a path segment hits an array, any element may match the rest
//!   (so `{"students.email": "a@b.c"}` finds a classroom by enrollee)

pub mod memory;

pub use memory::MemoryStore;
