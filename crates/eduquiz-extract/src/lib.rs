//! # eduquiz-extract
//!
//! Document loading for the EduQuiz generation pipeline.
//!
//! This crate reads an uploaded file and produces a single concatenated text
//! blob for downstream chunking. The decoder is selected by the *declared*
//! file type ([`SourceFormat`](eduquiz_core::SourceFormat)), never sniffed:
//!
//! | Decoder | Formats | Notes |
//! |---------|---------|-------|
//! | [`TextDecoder`] | everything else | UTF-8 (lossy) |
//! | [`PdfDecoder`] | `.pdf` | text in page order |
//! | [`DocxDecoder`] | `.doc`, `.docx` | `word/document.xml` runs, paragraphs as newlines |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eduquiz_extract::LoaderRegistry;
//! use eduquiz_core::SourceFormat;
//!
//! let registry = LoaderRegistry::with_defaults();
//! let text = registry.load(Path::new("notes.pdf"), SourceFormat::Pdf).await?;
//! ```

pub mod docx;
pub mod pdf;
pub mod registry;
pub mod text;

pub use docx::DocxDecoder;
pub use pdf::PdfDecoder;
pub use registry::{DocumentDecoder, LoaderRegistry};
pub use text::TextDecoder;
