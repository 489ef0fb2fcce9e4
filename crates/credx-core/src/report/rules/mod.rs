//! Pattern library and value normalizers for bureau reports.
//!
//! Every dialect gets one [`RuleSet`], selected once by the format
//! dispatcher. The extraction engine itself never branches on dialect.

pub mod amounts;
pub mod commercial;
pub mod consumer;
pub mod crif;
pub mod dates;
pub mod patterns;
pub mod status;

pub use amounts::normalize_amount;
pub use dates::normalize_date;
pub use status::derive_status;

use regex::Regex;

use crate::models::config::MatchOccurrence;
use crate::models::report::{Dialect, FieldRecord, ReportFamily};

/// Canonical field names shared across dialects.
pub mod field {
    pub const NAME: &str = "Name";
    pub const SCORE: &str = "Score";
    pub const LEGAL_CONSTITUTION: &str = "Legal Constitution";
    pub const CLASS_OF_ACTIVITY: &str = "Class of Activity";
    pub const PAN: &str = "PAN";
    pub const DATE_OF_INCORPORATION: &str = "Date of Incorporation";
    pub const CIN: &str = "CIN/LLPIN";
    pub const AMOUNT_APPLIED: &str = "Loan Amt. Applied for";
    pub const REGISTERED_ADDRESS: &str = "Regd. Address";
    pub const SCORE_DETAILS: &str = "CRIF_Score_Details";
    pub const BENCHMARK_TIP: &str = "Benchmark Score Tip";

    pub const FACILITY: &str = "Facility";
    pub const TYPE: &str = "Type";
    pub const OWNERSHIP: &str = "Ownership";
    pub const ASSET_CLASSIFICATION: &str = "DPD/Asset Classification";
    pub const INFO_AS_OF: &str = "Info. as of";
    pub const SANCTIONED_DATE: &str = "Sanctioned Date";
    pub const SANCTIONED_AMOUNT: &str = "Sanctioned Amount";
    pub const CURRENCY: &str = "Currency";
    pub const CURRENT_BALANCE: &str = "Current Balance";
    pub const CLOSED_DATE: &str = "Closed Date";
    pub const AMOUNT_OVERDUE: &str = "Amount Overdue";
    pub const HIGH_CREDIT: &str = "High Credit";
    pub const CASH_LIMIT: &str = "Cash Limit";
    pub const EMI: &str = "EMI";
    pub const ACTUAL_PAYMENT: &str = "Actual Payment";
    pub const PAYMENT_FREQUENCY: &str = "Payment Frequency";
    pub const REPORTED_STATUS: &str = "Reported Status";
    pub const SUIT_FILED: &str = "Suit Filed Status";
    pub const WILFUL_DEFAULT: &str = "Wilful Defaulter";
}

/// Trait for pattern-based field extractors.
pub trait PatternExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Post-processing applied to a raw capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    Trim,
    /// Trim and uppercase.
    Upper,
    /// Fold line breaks into single spaces.
    JoinLines,
}

impl Cleanup {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Cleanup::Trim => raw.trim().to_string(),
            Cleanup::Upper => raw.trim().to_uppercase(),
            Cleanup::JoinLines => raw
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// A named pattern with the capture group holding the field value.
#[derive(Debug)]
pub struct ExtractionRule {
    pub field: &'static str,
    pub pattern: Regex,
    pub group: usize,
    pub dialects: &'static [Dialect],
    pub cleanup: Cleanup,
}

impl ExtractionRule {
    pub fn new(
        field: &'static str,
        pattern: Regex,
        group: usize,
        dialects: &'static [Dialect],
    ) -> Self {
        Self {
            field,
            pattern,
            group,
            dialects,
            cleanup: Cleanup::Trim,
        }
    }

    pub fn with_cleanup(mut self, cleanup: Cleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn applies_to(&self, dialect: Dialect) -> bool {
        self.dialects.contains(&dialect)
    }

    /// Apply the rule honouring the configured occurrence policy.
    pub fn capture(&self, text: &str, occurrence: MatchOccurrence) -> Option<String> {
        match occurrence {
            MatchOccurrence::First => self.extract(text),
            MatchOccurrence::Last => self.extract_all(text).pop(),
        }
    }
}

impl PatternExtractor for ExtractionRule {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern
            .captures_iter(text)
            .find_map(|caps| caps.get(self.group))
            .map(|group| self.cleanup.apply(group.as_str()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(self.group))
            .map(|group| self.cleanup.apply(group.as_str()))
            .collect()
    }
}

/// Predicate over the base field record of a section.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// The field was found and contains `needle`, ignoring case.
    Contains {
        field: &'static str,
        needle: &'static str,
    },
    /// The field was not found or captured only whitespace.
    Absent { field: &'static str },
}

impl Condition {
    pub fn holds(&self, record: &FieldRecord) -> bool {
        match self {
            Condition::Contains { field, needle } => record
                .found(field)
                .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase())),
            Condition::Absent { field } => record.found(field).is_none_or(|v| v.trim().is_empty()),
        }
    }
}

/// Rule re-selected when any of its conditions holds on the base record.
///
/// A match overrides the base value of `rule.field`; no match keeps it.
#[derive(Debug)]
pub struct ConditionalRule {
    pub rule: ExtractionRule,
    pub when: Vec<Condition>,
}

impl ConditionalRule {
    pub fn triggered(&self, record: &FieldRecord) -> bool {
        self.when.iter().any(|c| c.holds(record))
    }
}

/// Field captured as the text between a start label and the nearest end label.
#[derive(Debug, Clone, Copy)]
pub struct SectionRule {
    pub field: &'static str,
    pub start: &'static str,
    pub ends: &'static [&'static str],
}

/// How repeated facility/account blocks are located.
#[derive(Debug, Clone, Copy)]
pub struct BlockLayout {
    pub anchor: &'static str,
    /// Empty: each block runs to the next anchor.
    pub terminators: &'static [&'static str],
}

/// Delinquency window used by the numeric DPD scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpdWindow {
    /// A YEAR line follows the header; the window ends at the first line starting with `end`.
    UntilLabel { end: &'static str },
    /// The window is the run of 3-digit tokens right after the header.
    NumericRun,
}

/// How a block's payment history is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryLayout {
    /// Month × year grid between two labels.
    Grid {
        start: &'static str,
        end: &'static str,
    },
    /// Max of 3-digit tokens in a delinquency sub-section.
    DelinquencyScan(DpdWindow),
    None,
}

/// Institution-level summary table laid out one cell per line.
#[derive(Debug, Clone, Copy)]
pub struct InstitutionTable {
    pub name: &'static str,
    pub start: &'static str,
    pub ends: &'static [&'static str],
    pub row_labels: &'static [&'static str],
    /// First column names the row label.
    pub columns: &'static [&'static str],
}

/// Inquiry table bounded by two exact lines.
#[derive(Debug, Clone, Copy)]
pub struct InquiryLayout {
    pub start_line: &'static str,
    pub end_line: &'static str,
}

/// Everything needed to extract one dialect.
#[derive(Debug)]
pub struct RuleSet {
    pub dialect: Dialect,
    pub identity_rules: Vec<&'static ExtractionRule>,
    pub identity_conditionals: Vec<&'static ConditionalRule>,
    pub identity_sections: &'static [SectionRule],
    /// Name used when the identity rules find none.
    pub fallback_name: &'static str,
    /// Identity field reported as the score, if the dialect has one.
    pub score_field: Option<&'static str>,
    pub block: BlockLayout,
    pub block_rules: Vec<&'static ExtractionRule>,
    pub block_conditionals: Vec<&'static ConditionalRule>,
    pub history: HistoryLayout,
    pub summary_tables: &'static [InstitutionTable],
    pub inquiries: Option<InquiryLayout>,
    /// Date layouts tried in order.
    pub date_layouts: &'static [&'static str],
}

impl RuleSet {
    /// Select the rule-set for a dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect.family() {
            ReportFamily::Crif => crif::rule_set(dialect),
            ReportFamily::CommercialBureau => commercial::rule_set(dialect),
            ReportFamily::ConsumerBureau => consumer::rule_set(dialect),
        }
    }
}

pub(crate) fn select(rules: &'static [ExtractionRule], dialect: Dialect) -> Vec<&'static ExtractionRule> {
    rules.iter().filter(|r| r.applies_to(dialect)).collect()
}

pub(crate) fn select_conditionals(
    rules: &'static [ConditionalRule],
    dialect: Dialect,
) -> Vec<&'static ConditionalRule> {
    rules.iter().filter(|r| r.rule.applies_to(dialect)).collect()
}
