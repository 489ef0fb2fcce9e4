//! Error types for the credx-core library.

use thiserror::Error;

/// Main error type for the credx library.
#[derive(Error, Debug)]
pub enum CredxError {
    /// PDF text recovery error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Report extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text recovery.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Fatal errors raised while extracting a report.
///
/// Missing sections, missing fields and normalization fallbacks are not
/// errors; they are recorded as [`crate::Issue`]s on the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// None of the bureau family markers were found in the text.
    #[error("unrecognized report format: no bureau family marker found")]
    UnrecognizedFormat,
}

/// Result type for the credx library.
pub type Result<T> = std::result::Result<T, CredxError>;
