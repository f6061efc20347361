//! Text extraction from raw document bytes
//!
//! PDFs go through an ordered chain of extraction strategies: the first one
//! that yields non-empty text wins. A PDF without a text layer (a scanned
//! image) comes back as an empty string, which callers treat as unreadable.

use crate::error::{CvRankerError, Result};
use crate::input::file_detector::FileType;
use log::{debug, warn};
use pulldown_cmark::{Event, Parser, Tag};
use std::panic::{self, AssertUnwindSafe};

/// One way of reading the text layer of a PDF, page by page
pub trait PdfStrategy {
    fn name(&self) -> &'static str;
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

/// Primary reader, based on `pdf-extract`
pub struct PdfExtractStrategy;

impl PdfStrategy for PdfExtractStrategy {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        // pdf-extract panics on some malformed inputs
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(CvRankerError::PdfExtraction(format!("pdf-extract: {}", e))),
            Err(payload) => Err(CvRankerError::PdfExtraction(format!(
                "pdf-extract panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }
}

/// Fallback reader, walking the page tree with `lopdf`
pub struct LopdfStrategy;

impl PdfStrategy for LopdfStrategy {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| CvRankerError::PdfExtraction(format!("lopdf: {}", e)))?;

        let mut pages = Vec::new();
        for page_no in document.get_pages().keys() {
            let text = document
                .extract_text(&[*page_no])
                .map_err(|e| CvRankerError::PdfExtraction(format!("lopdf page {}: {}", page_no, e)))?;
            pages.push(text);
        }
        Ok(pages)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct PdfExtractor {
    strategies: Vec<Box<dyn PdfStrategy>>,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::with_strategies(vec![Box::new(PdfExtractStrategy), Box::new(LopdfStrategy)])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn PdfStrategy>>) -> Self {
        Self { strategies }
    }

    /// Returns the first non-empty text produced by the chain.
    ///
    /// Errors only when every strategy failed; if at least one strategy read
    /// the document but found no text, the result is `Ok("")`.
    pub fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut last_error = None;
        let mut any_succeeded = false;

        for strategy in &self.strategies {
            match strategy.extract_pages(bytes) {
                Ok(pages) => {
                    any_succeeded = true;
                    let text = pages.join("\n").trim().to_string();
                    if !text.is_empty() {
                        debug!("{} extracted {} characters", strategy.name(), text.len());
                        return Ok(text);
                    }
                    debug!("{} found no text layer", strategy.name());
                }
                Err(e) => {
                    warn!("{} failed: {}", strategy.name(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_succeeded => Err(e),
            _ => Ok(String::new()),
        }
    }
}

/// Decode bytes as UTF-8, dropping any invalid sequences
pub fn decode_plain_text(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Render Markdown to plain text, one block per line
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph) | Event::End(Tag::Heading(..)) | Event::End(Tag::Item) => {
                text.push('\n')
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Routes a named document to the right extraction method
#[derive(Default)]
pub struct DocumentTextExtractor {
    pdf: PdfExtractor,
}

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pdf_extractor(pdf: PdfExtractor) -> Self {
        Self { pdf }
    }

    pub fn extract_text(&self, name: &str, bytes: &[u8]) -> Result<String> {
        match FileType::from_name(name) {
            FileType::Pdf => self.pdf.extract(bytes),
            FileType::Text => Ok(decode_plain_text(bytes)),
            FileType::Markdown => Ok(markdown_to_text(&decode_plain_text(bytes))),
            FileType::Unknown if bytes.starts_with(b"%PDF") => self.pdf.extract(bytes),
            FileType::Unknown => Err(CvRankerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Option<Vec<&'static str>>);

    impl PdfStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>> {
            match &self.1 {
                Some(pages) => Ok(pages.iter().map(|p| p.to_string()).collect()),
                None => Err(CvRankerError::PdfExtraction(format!("{} broke", self.0))),
            }
        }
    }

    fn chain(strategies: Vec<Fixed>) -> PdfExtractor {
        PdfExtractor::with_strategies(
            strategies
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn PdfStrategy>)
                .collect(),
        )
    }

    #[test]
    fn test_primary_result_wins() {
        let extractor = chain(vec![
            Fixed("primary", Some(vec!["  page one", "page two  "])),
            Fixed("secondary", Some(vec!["other"])),
        ]);
        assert_eq!(extractor.extract(b"").unwrap(), "page one\npage two");
    }

    #[test]
    fn test_falls_back_when_primary_is_empty() {
        let extractor = chain(vec![
            Fixed("primary", Some(vec!["", "  "])),
            Fixed("secondary", Some(vec!["found"])),
        ]);
        assert_eq!(extractor.extract(b"").unwrap(), "found");
    }

    #[test]
    fn test_falls_back_when_primary_fails() {
        let extractor = chain(vec![
            Fixed("primary", None),
            Fixed("secondary", Some(vec!["found"])),
        ]);
        assert_eq!(extractor.extract(b"").unwrap(), "found");
    }

    #[test]
    fn test_empty_when_no_strategy_finds_text() {
        let extractor = chain(vec![Fixed("primary", None), Fixed("secondary", Some(vec![""]))]);
        assert_eq!(extractor.extract(b"").unwrap(), "");
    }

    #[test]
    fn test_error_when_every_strategy_fails() {
        let extractor = chain(vec![Fixed("primary", None), Fixed("secondary", None)]);
        assert!(extractor.extract(b"").is_err());
    }

    #[test]
    fn test_plain_text_drops_invalid_bytes() {
        let bytes = b"Data \xff\xfeEngineer";
        assert_eq!(decode_plain_text(bytes), "Data Engineer");
    }

    #[test]
    fn test_markdown_is_flattened() {
        let text = markdown_to_text("# Offer\n\n**Rust** developer\n\n- SQL\n- Docker\n");
        assert!(text.contains("Offer"));
        assert!(text.contains("Rust developer"));
        assert!(text.contains("SQL"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let extractor = DocumentTextExtractor::new();
        assert!(extractor.extract_text("photo.png", b"\x89PNG").is_err());
        assert_eq!(extractor.extract_text("cv.txt", b"hello").unwrap(), "hello");
    }
}
