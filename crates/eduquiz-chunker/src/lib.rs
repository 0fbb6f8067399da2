//! # eduquiz-chunker
//!
//! Fixed-size overlapping chunking for the EduQuiz generation pipeline.
//!
//! A loaded document is split into contiguous character windows of
//! `chunk_size` characters with `overlap` characters shared between
//! consecutive windows. Every character of the input lands in at least one
//! window, so retrieval never loses content at window boundaries.

pub mod fixed;

pub use fixed::{split, ChunkConfig};
