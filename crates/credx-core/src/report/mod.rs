//! Report text extraction engine.

pub mod blocks;
pub mod dispatcher;
pub mod fields;
pub mod history;
mod parser;
pub mod rules;
pub mod segment;
pub mod tables;

pub use dispatcher::{classify, detect};
pub use parser::BureauReportParser;

use crate::error::ExtractionError;
use crate::models::report::ReportResult;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for report parsing.
pub trait ReportParser {
    /// Parse a report from its decoded text.
    fn parse(&self, text: &str) -> Result<ReportResult>;
}
