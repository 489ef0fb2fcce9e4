//! Payment-history grids and delinquency scans.

use super::rules::DpdWindow;
use super::rules::patterns::{DPD_HEADER, DPD_TOKEN, YEAR_LINE};
use crate::models::report::PaymentHistoryEntry;

/// A month × year status grid.
///
/// The text carries one line per cell: first the month labels, then
/// repeating groups of a year label followed by one status per month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentGrid {
    pub months: Vec<String>,
    /// `(year label, statuses)` in document order.
    pub years: Vec<(String, Vec<String>)>,
    /// Lines of a trailing partial year group that were dropped.
    pub discarded_lines: usize,
}

impl PaymentGrid {
    /// Parse a grid with `months` month labels.
    ///
    /// Returns `None` when the span holds fewer lines than month labels.
    pub fn parse(span: &str, months: usize) -> Option<Self> {
        let lines: Vec<&str> = span.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if months == 0 || lines.len() < months {
            return None;
        }

        let (labels, rest) = lines.split_at(months);
        let groups = rest.chunks_exact(months + 1);
        let discarded_lines = groups.remainder().len();

        let years = groups
            .map(|group| {
                (
                    group[0].to_string(),
                    group[1..].iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                )
            })
            .collect();

        Some(Self {
            months: labels.iter().map(|s| s.to_string()).collect(),
            years,
            discarded_lines,
        })
    }

    /// Non-blank cells, year group by year group, months in label order.
    pub fn observations(&self, blank_markers: &[String]) -> Vec<PaymentHistoryEntry> {
        let mut entries = Vec::new();
        for (year, statuses) in &self.years {
            for (month, status) in self.months.iter().zip(statuses) {
                if status.is_empty() || blank_markers.iter().any(|m| m == status) {
                    continue;
                }
                entries.push(PaymentHistoryEntry {
                    month: month.clone(),
                    year: year.clone(),
                    status: status.clone(),
                });
            }
        }
        entries
    }
}

/// Largest numeric days-past-due status in a history, 0 if none.
pub fn max_grid_delinquency(history: &[PaymentHistoryEntry]) -> u32 {
    history
        .iter()
        .filter_map(PaymentHistoryEntry::days_past_due)
        .max()
        .unwrap_or(0)
}

/// Maximum 3-digit days-past-due token in a block's delinquency window.
///
/// Returns `None` when the block has no window of the expected shape.
pub fn max_delinquency(block: &str, window: &DpdWindow) -> Option<u32> {
    let header = DPD_HEADER.find(block)?;
    let after = &block[header.end()..];

    match window {
        DpdWindow::UntilLabel { end } => {
            let mut lines = after.lines();
            let year = lines.next()?;
            if !YEAR_LINE.is_match(year) {
                return None;
            }
            let end = end.to_uppercase();
            let max = lines
                .take_while(|line| !line.trim_start().to_uppercase().starts_with(&end))
                .flat_map(|line| DPD_TOKEN.captures_iter(line))
                .filter_map(|caps| caps[1].parse::<u32>().ok())
                .max();
            Some(max.unwrap_or(0))
        }
        DpdWindow::NumericRun => {
            let max = after
                .split_whitespace()
                .take_while(|token| token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit()))
                .filter_map(|token| token.parse::<u32>().ok())
                .max()?;
            Some(max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONTHS: &str = "Jan\nFeb\nMar\n";

    #[test]
    fn test_grid_observations_sparse() {
        let span = format!("{}2023\n-\nSTD\n-\n2022\n030\n-\n-\n", MONTHS);
        let grid = PaymentGrid::parse(&span, 3).unwrap();
        let obs: Vec<String> = grid
            .observations(&["-".to_string()])
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(obs, vec!["Feb 2023 STD", "Jan 2022 030"]);
    }

    #[test]
    fn test_grid_discards_partial_group() {
        let span = format!("{}2023\n000\n000\n000\n2022\n030\n", MONTHS);
        let grid = PaymentGrid::parse(&span, 3).unwrap();
        assert_eq!(grid.years.len(), 1);
        assert_eq!(grid.discarded_lines, 2);
    }

    #[test]
    fn test_grid_too_short() {
        assert!(PaymentGrid::parse("Jan\nFeb", 3).is_none());
        assert!(PaymentGrid::parse("", 12).is_none());
    }

    #[test]
    fn test_max_grid_delinquency() {
        let span = format!("{}2023\n090\nSTD\n030\n", MONTHS);
        let grid = PaymentGrid::parse(&span, 3).unwrap();
        assert_eq!(max_grid_delinquency(&grid.observations(&[])), 90);
        assert_eq!(max_grid_delinquency(&[]), 0);
    }

    #[test]
    fn test_max_delinquency_until_label() {
        let block = "DAYS PAST DUE/ASSET CLASSIFICATION (UP TO 36 MONTHS)\nYEAR 2023 2022\n000 030 STD\n060 XXX\nACCOUNT 999\n";
        let window = DpdWindow::UntilLabel { end: "ACCOUNT" };
        assert_eq!(max_delinquency(block, &window), Some(60));
    }

    #[test]
    fn test_max_delinquency_requires_year_line() {
        let block = "DAYS PAST DUE/ASSET CLASSIFICATION\n030 060\n";
        let window = DpdWindow::UntilLabel { end: "ACCOUNT" };
        assert_eq!(max_delinquency(block, &window), None);
    }

    #[test]
    fn test_max_delinquency_numeric_run() {
        let block = "days past due/asset classification\n000 030\n060\n000 TYPE: 999\n";
        assert_eq!(max_delinquency(block, &DpdWindow::NumericRun), Some(60));
        assert_eq!(max_delinquency("no header", &DpdWindow::NumericRun), None);
    }
}
