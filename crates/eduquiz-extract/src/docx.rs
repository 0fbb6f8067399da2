//! Word document decoder.
//!
//! A `.docx` file is a zip archive; the body text lives in
//! `word/document.xml` as `<w:t>` runs grouped into `<w:p>` paragraphs.
//! Runs are concatenated in document order and paragraph boundaries become
//! newlines, which preserves section order for downstream chunking.

use async_trait::async_trait;
use eduquiz_core::{ExtractError, SourceFormat};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::registry::DocumentDecoder;

/// Decoder for Word uploads.
///
/// Declared `.doc` files are routed here too, matching the upstream upload
/// handler; a genuine legacy binary `.doc` is not a zip archive and fails
/// with a parse error.
pub struct DocxDecoder;

impl DocxDecoder {
    /// Create a new Word decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentDecoder for DocxDecoder {
    fn formats(&self) -> &[SourceFormat] {
        &[SourceFormat::Doc, SourceFormat::Docx]
    }

    async fn decode(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("Extracting DOCX: {:?}", path);
        let bytes = tokio::fs::read(path).await?;

        let text = tokio::task::spawn_blocking(move || extract_docx_text(&bytes))
            .await
            .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
            .map_err(ExtractError::Parse)?;

        debug!("Extracted {} characters of DOCX text", text.len());
        Ok(text)
    }
}

/// Unzip `word/document.xml` and flatten its text runs.
fn extract_docx_text(bytes: &[u8]) -> Result<String, String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| format!("not a docx archive: {e}"))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| format!("missing word/document.xml: {e}"))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable word/document.xml: {e}"))?;

    let mut reader = Reader::from_str(&xml);
    let mut out = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:br" => out.push('\n'),
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:tab" => out.push('\t'),
            Ok(Event::Text(t)) if in_run_text => {
                out.push_str(&t.unescape().map_err(|e| e.to_string())?);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("malformed document.xml: {e}")),
            Ok(_) => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zip::write::SimpleFileOptions;

    fn make_docx(document_xml: &str) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    const TWO_PARAGRAPHS: &str = r#"<?xml version="1.0"?>
        <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
          <w:body>
            <w:p><w:r><w:t>Cells divide</w:t></w:r><w:r><w:t> by mitosis.</w:t></w:r></w:p>
            <w:p><w:r><w:t>Meiosis halves the chromosome count.</w:t></w:r></w:p>
          </w:body>
        </w:document>"#;

    #[test]
    fn test_runs_concatenate_and_paragraphs_break() {
        let text = extract_docx_text(&make_docx(TWO_PARAGRAPHS)).unwrap();
        assert_eq!(
            text,
            "Cells divide by mitosis.\nMeiosis halves the chromosome count.\n"
        );
    }

    #[test]
    fn test_not_a_zip_fails() {
        let err = extract_docx_text(b"plain old bytes").unwrap_err();
        assert!(err.contains("not a docx archive"));
    }

    #[test]
    fn test_zip_without_document_xml_fails() {
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("unrelated.txt", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"hi").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_docx_text(&buf.into_inner()).unwrap_err();
        assert!(err.contains("missing word/document.xml"));
    }

    #[tokio::test]
    async fn test_decode_through_registry_contract() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&make_docx(TWO_PARAGRAPHS)).unwrap();

        let text = DocxDecoder::new().decode(file.path()).await.unwrap();
        assert!(text.contains("Cells divide by mitosis."));
    }
}
