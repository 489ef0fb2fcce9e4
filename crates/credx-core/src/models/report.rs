//! Report data models shared by every bureau family.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Credit bureau report family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFamily {
    /// CRIF High Mark commercial report.
    Crif,
    /// Consumer (individual) bureau report.
    ConsumerBureau,
    /// Commercial (company) bureau report.
    CommercialBureau,
}

impl ReportFamily {
    /// Human readable family name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportFamily::Crif => "CRIF",
            ReportFamily::ConsumerBureau => "Consumer bureau",
            ReportFamily::CommercialBureau => "Commercial bureau",
        }
    }
}

impl fmt::Display for ReportFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Layout variant within a report family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// CRIF report with `Loan Terms For:` facility blocks.
    CrifStandard,
    /// Commercial report with numbered "Credit Facility Details - As Borrower" sections.
    CommercialNumbered,
    /// Commercial report with compact "Credit Facility Details" blocks ended by "Overdue Details".
    CommercialCompact,
    /// Consumer report with "ACCOUNT INFORMATION" sections.
    ConsumerSectioned,
    /// Consumer report with inline `STATUS` blocks ended by "ACCOUNT DATES"/"ENQUIRIES:".
    ConsumerInline,
}

impl Dialect {
    /// All supported dialects.
    pub const ALL: [Dialect; 5] = [
        Dialect::CrifStandard,
        Dialect::CommercialNumbered,
        Dialect::CommercialCompact,
        Dialect::ConsumerSectioned,
        Dialect::ConsumerInline,
    ];

    /// Family this dialect belongs to.
    pub fn family(&self) -> ReportFamily {
        match self {
            Dialect::CrifStandard => ReportFamily::Crif,
            Dialect::CommercialNumbered | Dialect::CommercialCompact => {
                ReportFamily::CommercialBureau
            }
            Dialect::ConsumerSectioned | Dialect::ConsumerInline => ReportFamily::ConsumerBureau,
        }
    }

    /// Short machine name.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::CrifStandard => "crif_standard",
            Dialect::CommercialNumbered => "commercial_numbered",
            Dialect::CommercialCompact => "commercial_compact",
            Dialect::ConsumerSectioned => "consumer_sectioned",
            Dialect::ConsumerInline => "consumer_inline",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded report text together with its classification.
///
/// Only created by the format dispatcher; immutable afterwards.
#[derive(Debug, Clone, Copy)]
pub struct ReportDocument<'a> {
    text: &'a str,
    dialect: Dialect,
}

impl<'a> ReportDocument<'a> {
    pub(crate) fn new(text: &'a str, dialect: Dialect) -> Self {
        Self { text, dialect }
    }

    /// Full document text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Report family.
    pub fn family(&self) -> ReportFamily {
        self.dialect.family()
    }

    /// Layout dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// Raw value captured for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// The rule matched; holds the cleaned capture text (may be empty).
    Found(String),
    /// The rule did not match anywhere in the section.
    NotFound,
}

impl FieldValue {
    /// Captured text, if the field was found.
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FieldValue::Found(value) => Some(value),
            FieldValue::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldValue::Found(_))
    }
}

/// A named field value inside a [`FieldRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub value: FieldValue,
}

/// Ordered mapping of field name to raw value.
///
/// Every rule applied to a section leaves an entry, so a field that was
/// looked for but not present is recorded as [`FieldValue::NotFound`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    entries: Vec<FieldEntry>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping the original position on replace.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(FieldEntry {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Value recorded for a field; `None` if no rule produced the field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    /// Captured text for a field that was found.
    pub fn found(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_deref)
    }

    /// Names of fields recorded as not found.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.value.is_found())
            .map(|e| e.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A normalized value with a flag telling whether a fallback was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalized<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl<T> Normalized<T> {
    /// A value parsed from the source text.
    pub fn exact(value: T) -> Self {
        Self {
            value,
            fallback: false,
        }
    }

    /// A default substituted for missing or malformed input.
    pub fn fallback(value: T) -> Self {
        Self {
            value,
            fallback: true,
        }
    }
}

/// A date field after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportDate {
    /// Parsed with one of the dialect's date layouts.
    Parsed(NaiveDate),
    /// No layout matched; the original text is kept for manual reconciliation.
    Unparsed(String),
    /// The field was absent or blank.
    #[default]
    Missing,
}

impl ReportDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ReportDate::Parsed(date) => Some(*date),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ReportDate::Missing)
    }

    /// Render with `format` for parsed dates, verbatim text otherwise.
    pub fn format(&self, format: &str) -> String {
        match self {
            ReportDate::Parsed(date) => date.format(format).to_string(),
            ReportDate::Unparsed(raw) => raw.clone(),
            ReportDate::Missing => String::new(),
        }
    }
}

/// Derived account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    Active,
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One non-blank cell of a payment-history grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHistoryEntry {
    pub month: String,
    pub year: String,
    pub status: String,
}

impl PaymentHistoryEntry {
    /// `"<month> <year>"`.
    pub fn period_label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }

    /// Days past due when the status is numeric (e.g. `"030"`).
    pub fn days_past_due(&self) -> Option<u32> {
        if !self.status.is_empty() && self.status.chars().all(|c| c.is_ascii_digit()) {
            self.status.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for PaymentHistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.month, self.year, self.status)
    }
}

/// One credit facility / tradeline parsed from a repeated block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// 1-based position in the source text.
    pub sequence: usize,

    /// Borrower/company name copied from the report identity.
    pub borrower: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership: Option<String>,

    /// DPD / asset classification as reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_classification: Option<String>,

    pub info_as_of: ReportDate,
    pub sanctioned_date: ReportDate,
    pub closed_date: ReportDate,

    pub sanctioned_amount: Normalized<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    pub current_balance: Normalized<i64>,
    pub amount_overdue: Normalized<i64>,
    pub high_credit: Normalized<i64>,
    pub cash_limit: Normalized<i64>,
    pub emi: Normalized<i64>,
    pub actual_payment: Normalized<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_frequency: Option<String>,

    /// Status text printed in the report, distinct from the derived [`AccountStatus`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suit_filed: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wilful_default: Option<String>,

    pub status: AccountStatus,

    /// Maximum days-past-due observed in the block's delinquency window.
    pub max_dpd: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payment_history: Vec<PaymentHistoryEntry>,

    /// Raw field captures backing the typed columns above.
    pub fields: FieldRecord,
}

/// A single summary-table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryCell {
    Number(Decimal),
    Text(String),
    Missing,
}

impl fmt::Display for SummaryCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryCell::Number(n) => write!(f, "{}", n),
            SummaryCell::Text(s) => f.write_str(s),
            SummaryCell::Missing => Ok(()),
        }
    }
}

/// One institution row of a summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub cells: Vec<SummaryCell>,
}

/// Institution-level summary table (borrower summary, credit profile summary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub name: String,
    /// Column names, the first one naming the label column.
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

/// Inquiry/enquiry table with a fixed column count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Name and score headline for a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
}

/// Non-fatal condition encountered during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// An anchored section was not present in the text.
    SectionAbsent { section: String },

    /// A field rule did not match. `record` is the facility sequence number.
    FieldNotFound {
        field: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        record: Option<usize>,
    },

    /// A captured value could not be normalized and a default was used.
    NormalizationFallback {
        field: String,
        raw: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        record: Option<usize>,
    },

    /// The text did not fit a layout heuristic and was padded, truncated or discarded.
    LayoutDeviation { section: String, detail: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::SectionAbsent { section } => write!(f, "section '{}' not found", section),
            Issue::FieldNotFound {
                field,
                record: Some(n),
            } => write!(f, "record {}: field '{}' not found", n, field),
            Issue::FieldNotFound { field, record: None } => {
                write!(f, "field '{}' not found", field)
            }
            Issue::NormalizationFallback { field, raw, record } => match record {
                Some(n) => write!(f, "record {}: could not normalize {} '{}'", n, field, raw),
                None => write!(f, "could not normalize {} '{}'", field, raw),
            },
            Issue::LayoutDeviation { section, detail } => write!(f, "{}: {}", section, detail),
        }
    }
}

/// Metadata about the extraction process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Processing time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// Non-fatal conditions, in the order they were encountered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl ExtractionMetadata {
    /// Number of fields recorded as not found across identity and records.
    pub fn missing_field_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, Issue::FieldNotFound { .. }))
            .count()
    }
}

/// Complete extraction result for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResult {
    pub family: ReportFamily,
    pub dialect: Dialect,

    /// Original file name, used only to name exported artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,

    pub summary: ReportSummary,

    /// Borrower/company identity fields.
    pub identity: FieldRecord,

    /// Institution summary tables present in the report.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summaries: Vec<SummaryTable>,

    /// Facilities/accounts in order of appearance.
    pub facilities: Vec<FacilityRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inquiries: Option<InquiryTable>,

    pub metadata: ExtractionMetadata,
}

impl ReportResult {
    /// Borrower or company name, with the family's placeholder when absent.
    pub fn borrower(&self) -> &str {
        &self.summary.name
    }

    /// Look up a summary table by name.
    pub fn summary_table(&self, name: &str) -> Option<&SummaryTable> {
        self.summaries.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_record_distinguishes_empty_from_missing() {
        let mut record = FieldRecord::new();
        record.set("Closed Date", FieldValue::Found(String::new()));
        record.set("EMI", FieldValue::NotFound);

        assert_eq!(record.found("Closed Date"), Some(""));
        assert_eq!(record.found("EMI"), None);
        assert_eq!(record.get("EMI"), Some(&FieldValue::NotFound));
        assert_eq!(record.get("Unknown"), None);
        assert_eq!(record.missing().collect::<Vec<_>>(), vec!["EMI"]);
    }

    #[test]
    fn test_field_record_replace_keeps_position() {
        let mut record = FieldRecord::new();
        record.set("Type", FieldValue::NotFound);
        record.set("Sanctioned Amount", FieldValue::NotFound);
        record.set("Type", FieldValue::Found("Term Loan".to_string()));

        let names: Vec<_> = record.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Type", "Sanctioned Amount"]);
        assert_eq!(record.found("Type"), Some("Term Loan"));
    }

    #[test]
    fn test_dialect_family() {
        assert_eq!(Dialect::CrifStandard.family(), ReportFamily::Crif);
        assert_eq!(
            Dialect::CommercialCompact.family(),
            ReportFamily::CommercialBureau
        );
        assert_eq!(
            Dialect::ConsumerInline.family(),
            ReportFamily::ConsumerBureau
        );
    }

    #[test]
    fn test_payment_history_entry_display() {
        let entry = PaymentHistoryEntry {
            month: "Mar".to_string(),
            year: "2022".to_string(),
            status: "030".to_string(),
        };
        assert_eq!(entry.to_string(), "Mar 2022 030");
        assert_eq!(entry.period_label(), "Mar 2022");
        assert_eq!(entry.days_past_due(), Some(30));

        let std = PaymentHistoryEntry {
            status: "STD".to_string(),
            ..entry
        };
        assert_eq!(std.days_past_due(), None);
    }

    #[test]
    fn test_report_date_format() {
        let date = ReportDate::Parsed(NaiveDate::from_ymd_opt(2023, 1, 12).unwrap());
        assert_eq!(date.format("%d/%m/%Y"), "12/01/2023");
        assert_eq!(ReportDate::Unparsed("Jan '23".to_string()).format("%d/%m/%Y"), "Jan '23");
        assert_eq!(ReportDate::Missing.format("%d/%m/%Y"), "");
    }
}
