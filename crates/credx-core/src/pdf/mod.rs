//! PDF text recovery.
//!
//! The extraction engine only ever sees decoded text; this module turns
//! PDF bytes into that text for callers such as the CLI.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text recovery implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF, pages separated by newlines.
    fn extract_text(&self) -> Result<String>;

    /// Whether the PDF carries at least `min_text_length` characters of text.
    ///
    /// Scanned reports fail this check and cannot be parsed.
    fn is_text_based(&self, min_text_length: usize) -> bool {
        self.extract_text()
            .map(|text| text.trim().chars().count() >= min_text_length)
            .unwrap_or(false)
    }
}
