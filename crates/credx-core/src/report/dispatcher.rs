//! Report format detection.

use tracing::debug;

use super::Result;
use crate::error::ExtractionError;
use crate::models::report::{Dialect, ReportDocument, ReportFamily};

/// Family markers in priority order. The first family with any marker wins.
const FAMILY_MARKERS: &[(ReportFamily, &[&str])] = &[
    (
        ReportFamily::CommercialBureau,
        &[
            "COMMERCIAL CREDIT INFORMATION REPORT",
            "Credit Facility Details - As Borrower",
        ],
    ),
    (
        ReportFamily::Crif,
        &["CRIF HM", "CRIF High Mark", "Loan Terms For:"],
    ),
    (
        ReportFamily::ConsumerBureau,
        &["CREDITVISION", "CONSUMER NAME", "CONSUMER:", "ACCOUNT INFORMATION"],
    ),
];

fn dialect_for(family: ReportFamily, text: &str) -> Dialect {
    match family {
        ReportFamily::Crif => Dialect::CrifStandard,
        ReportFamily::CommercialBureau => {
            if text.contains("Credit Facility Details - As Borrower") {
                Dialect::CommercialNumbered
            } else {
                Dialect::CommercialCompact
            }
        }
        ReportFamily::ConsumerBureau => {
            if text.contains("ACCOUNT INFORMATION") {
                Dialect::ConsumerSectioned
            } else {
                Dialect::ConsumerInline
            }
        }
    }
}

/// Detect the dialect of a report, if any marker matches.
pub fn detect(text: &str) -> Option<Dialect> {
    FAMILY_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| text.contains(m)))
        .map(|(family, _)| dialect_for(*family, text))
}

/// Classify report text into a [`ReportDocument`].
///
/// Text without any known marker fails with
/// [`ExtractionError::UnrecognizedFormat`]; no family is ever assumed.
pub fn classify(text: &str) -> Result<ReportDocument<'_>> {
    let dialect = detect(text).ok_or(ExtractionError::UnrecognizedFormat)?;
    debug!("Classified report as {} ({})", dialect.family(), dialect);
    Ok(ReportDocument::new(text, dialect))
}
