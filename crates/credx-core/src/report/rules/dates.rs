//! Date normalization.

use chrono::NaiveDate;

use crate::models::report::ReportDate;

/// Normalize a captured date using the dialect's layouts in order.
///
/// The first layout that parses wins. Text no layout accepts is kept
/// verbatim; blank or missing input is [`ReportDate::Missing`].
pub fn normalize_date(raw: Option<&str>, layouts: &[&str]) -> ReportDate {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return ReportDate::Missing,
    };

    layouts
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
        .map(ReportDate::Parsed)
        .unwrap_or_else(|| ReportDate::Unparsed(raw.to_string()))
}
