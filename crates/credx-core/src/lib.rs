//! Core library for credit bureau report extraction.
//!
//! This crate provides:
//! - Format detection across CRIF, consumer and commercial bureau reports
//! - Section segmentation and repeated facility/account block parsing
//! - Rule-based field extraction with per-dialect pattern tables
//! - Value normalization (amounts, dates, account status, payment history)
//! - A tabular projection of results for spreadsheet-style export
//! - Optional PDF text recovery (`pdf` feature)

pub mod error;
pub mod export;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod report;

pub use error::{CredxError, ExtractionError, Result};
pub use export::{Table, artifact_name, file_name_component, proposed_sheet_name};
pub use models::config::CredxConfig;
pub use models::report::{
    AccountStatus, Dialect, FacilityRecord, FieldRecord, FieldValue, Issue, PaymentHistoryEntry,
    ReportDate, ReportDocument, ReportFamily, ReportResult,
};
#[cfg(feature = "pdf")]
pub use pdf::{PdfExtractor, PdfProcessor};
pub use report::{BureauReportParser, ReportParser, classify};
