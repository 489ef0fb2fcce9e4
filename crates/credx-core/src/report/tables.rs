//! Institution summary and inquiry tables laid out one cell per line.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::rules::patterns::PLAIN_NUMBER;
use super::rules::{InquiryLayout, InstitutionTable};
use super::segment::{line_section, section_between};
use crate::models::config::ExtractionConfig;
use crate::models::report::{InquiryTable, Issue, SummaryCell, SummaryRow, SummaryTable};

fn summary_cell(raw: &str) -> SummaryCell {
    if raw.is_empty() {
        return SummaryCell::Missing;
    }
    if PLAIN_NUMBER.is_match(raw) {
        if let Ok(value) = Decimal::from_str(raw) {
            return SummaryCell::Number(value);
        }
    }
    SummaryCell::Text(raw.to_string())
}

/// Parse an institution summary table.
///
/// Each row starts at a line equal to one of the row labels and takes the
/// following `columns - 1` lines as its cells. Returns `None` and records
/// [`Issue::SectionAbsent`] when the table's section is not in the text.
pub fn parse_institution_table(
    text: &str,
    table: &InstitutionTable,
    issues: &mut Vec<Issue>,
) -> Option<SummaryTable> {
    let Some(section) = section_between(text, table.start, table.ends) else {
        debug!("Summary table '{}' not found", table.name);
        issues.push(Issue::SectionAbsent {
            section: table.name.to_string(),
        });
        return None;
    };

    let lines: Vec<&str> = section
        .as_str()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let width = table.columns.len().saturating_sub(1);

    let mut rows = Vec::new();
    for label in table.row_labels {
        let Some(idx) = lines.iter().position(|l| l == label) else {
            issues.push(Issue::LayoutDeviation {
                section: table.name.to_string(),
                detail: format!("row '{}' not found", label),
            });
            continue;
        };

        let mut cells: Vec<SummaryCell> = lines[idx + 1..]
            .iter()
            .take(width)
            .map(|raw| summary_cell(raw))
            .collect();

        if cells.len() < width {
            warn!(
                "{}: row '{}' has {} of {} cells",
                table.name,
                label,
                cells.len(),
                width
            );
            issues.push(Issue::LayoutDeviation {
                section: table.name.to_string(),
                detail: format!("row '{}' padded from {} to {} cells", label, cells.len(), width),
            });
            cells.resize(width, SummaryCell::Missing);
        }

        rows.push(SummaryRow {
            label: label.to_string(),
            cells,
        });
    }

    Some(SummaryTable {
        name: table.name.to_string(),
        columns: table.columns.iter().map(|c| c.to_string()).collect(),
        rows,
    })
}

/// Parse an inquiry table with a fixed column count.
///
/// The first `inquiry_columns` lines are the headers. Records start at
/// each delimiter line; rows that do not fit the width are padded or
/// truncated and flagged as [`Issue::LayoutDeviation`].
pub fn parse_inquiry_table(
    text: &str,
    layout: &InquiryLayout,
    config: &ExtractionConfig,
    issues: &mut Vec<Issue>,
) -> Option<InquiryTable> {
    const SECTION: &str = "Inquiry Summary";

    let Some(lines) = line_section(text, layout.start_line, layout.end_line) else {
        debug!("Inquiry section not found");
        issues.push(Issue::SectionAbsent {
            section: SECTION.to_string(),
        });
        return None;
    };

    let lines: Vec<&str> = lines.into_iter().filter(|l| !l.is_empty()).collect();
    let width = config.inquiry_columns;
    let header_count = width.min(lines.len());

    let mut columns: Vec<String> = lines[..header_count].iter().map(|s| s.to_string()).collect();
    if columns.len() < width {
        issues.push(Issue::LayoutDeviation {
            section: SECTION.to_string(),
            detail: format!("only {} of {} header lines", columns.len(), width),
        });
        columns.extend((columns.len()..width).map(|i| format!("Column {}", i + 1)));
    }

    let mut records: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for &line in &lines[header_count..] {
        if line == config.inquiry_record_delimiter && !current.is_empty() {
            records.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.is_empty() {
        records.push(current);
    }

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            if record.len() != width {
                let action = if record.len() < width { "padded" } else { "truncated" };
                warn!("Inquiry row {} {} from {} to {} cells", i + 1, action, record.len(), width);
                issues.push(Issue::LayoutDeviation {
                    section: SECTION.to_string(),
                    detail: format!("row {} {} from {} to {} cells", i + 1, action, record.len(), width),
                });
            }
            let mut row: Vec<Option<String>> =
                record.into_iter().take(width).map(|s| Some(s.to_string())).collect();
            row.resize(width, None);
            row
        })
        .collect();

    Some(InquiryTable { columns, rows })
}
