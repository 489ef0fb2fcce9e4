//! Tabular projection of report results for spreadsheet-style export.
//!
//! Every family has a fixed column schema, so a table always has the same
//! columns no matter how many fields were actually found.

use std::path::Path;

use crate::models::config::ExportConfig;
use crate::models::report::{FacilityRecord, Normalized, ReportFamily, ReportResult};
use crate::report::rules::patterns::{FILE_NAME_INVALID, SHEET_NAME_INVALID};

/// One named sheet of string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(sheet_name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// A facility column and how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityColumn {
    Sequence,
    Borrower,
    Facility,
    AccountType,
    Ownership,
    AssetClassification,
    InfoAsOf,
    SanctionedDate,
    SanctionedAmount,
    Currency,
    CurrentBalance,
    ClosedDate,
    AmountOverdue,
    HighCredit,
    CashLimit,
    Emi,
    ActualPayment,
    PaymentFrequency,
    ReportedStatus,
    SuitFiled,
    WilfulDefault,
    Status,
    MaxDpd,
    PaymentHistory,
}

impl FacilityColumn {
    pub fn render(&self, record: &FacilityRecord, config: &ExportConfig) -> String {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let amount = |v: &Normalized<i64>| v.value.to_string();

        match self {
            FacilityColumn::Sequence => record.sequence.to_string(),
            FacilityColumn::Borrower => record.borrower.clone(),
            FacilityColumn::Facility => text(&record.facility_label),
            FacilityColumn::AccountType => text(&record.account_type),
            FacilityColumn::Ownership => text(&record.ownership),
            FacilityColumn::AssetClassification => text(&record.asset_classification),
            FacilityColumn::InfoAsOf => record.info_as_of.format(&config.date_format),
            FacilityColumn::SanctionedDate => record.sanctioned_date.format(&config.date_format),
            FacilityColumn::SanctionedAmount => amount(&record.sanctioned_amount),
            FacilityColumn::Currency => text(&record.currency),
            FacilityColumn::CurrentBalance => amount(&record.current_balance),
            FacilityColumn::ClosedDate => record.closed_date.format(&config.date_format),
            FacilityColumn::AmountOverdue => amount(&record.amount_overdue),
            FacilityColumn::HighCredit => amount(&record.high_credit),
            FacilityColumn::CashLimit => amount(&record.cash_limit),
            FacilityColumn::Emi => amount(&record.emi),
            FacilityColumn::ActualPayment => amount(&record.actual_payment),
            FacilityColumn::PaymentFrequency => text(&record.payment_frequency),
            FacilityColumn::ReportedStatus => text(&record.reported_status),
            FacilityColumn::SuitFiled => text(&record.suit_filed),
            FacilityColumn::WilfulDefault => text(&record.wilful_default),
            FacilityColumn::Status => record.status.to_string(),
            FacilityColumn::MaxDpd => record.max_dpd.to_string(),
            FacilityColumn::PaymentHistory => record
                .payment_history
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

const CRIF_COLUMNS: &[(&str, FacilityColumn)] = &[
    ("Sr. No.", FacilityColumn::Sequence),
    ("Borrower", FacilityColumn::Borrower),
    ("Loan Terms For", FacilityColumn::Facility),
    ("Type", FacilityColumn::AccountType),
    ("DPD/Asset Classification", FacilityColumn::AssetClassification),
    ("Info. as of", FacilityColumn::InfoAsOf),
    ("Sanctioned Date", FacilityColumn::SanctionedDate),
    ("Sanctioned Amount", FacilityColumn::SanctionedAmount),
    ("Current Balance", FacilityColumn::CurrentBalance),
    ("Closed Date", FacilityColumn::ClosedDate),
    ("Amount Overdue", FacilityColumn::AmountOverdue),
    ("Suit Filed Status", FacilityColumn::SuitFiled),
    ("Wilful Defaulter", FacilityColumn::WilfulDefault),
    ("Status", FacilityColumn::Status),
    ("Max DPD", FacilityColumn::MaxDpd),
    ("Payment History/Asset Classification", FacilityColumn::PaymentHistory),
];

const COMMERCIAL_COLUMNS: &[(&str, FacilityColumn)] = &[
    ("Sr. No.", FacilityColumn::Sequence),
    ("Borrower", FacilityColumn::Borrower),
    ("Facility_No", FacilityColumn::Facility),
    ("Type", FacilityColumn::AccountType),
    ("DPD/Asset Classification", FacilityColumn::AssetClassification),
    ("Info. as of", FacilityColumn::InfoAsOf),
    ("Sanctioned Date", FacilityColumn::SanctionedDate),
    ("Sanctioned Amount", FacilityColumn::SanctionedAmount),
    ("Currency", FacilityColumn::Currency),
    ("Current Balance", FacilityColumn::CurrentBalance),
    ("Closed Date", FacilityColumn::ClosedDate),
    ("Amount Overdue", FacilityColumn::AmountOverdue),
    ("Monthly EMI", FacilityColumn::Emi),
    ("Suit Filed Status", FacilityColumn::SuitFiled),
    ("Wilful Defaulter", FacilityColumn::WilfulDefault),
    ("Status", FacilityColumn::Status),
];

const CONSUMER_COLUMNS: &[(&str, FacilityColumn)] = &[
    ("Sr. No.", FacilityColumn::Sequence),
    ("Borrower", FacilityColumn::Borrower),
    ("Type of loan", FacilityColumn::AccountType),
    ("Ownership", FacilityColumn::Ownership),
    ("Sanction date", FacilityColumn::SanctionedDate),
    ("Closed date", FacilityColumn::ClosedDate),
    ("Sanctioned amount", FacilityColumn::SanctionedAmount),
    ("Current balance", FacilityColumn::CurrentBalance),
    ("High credit", FacilityColumn::HighCredit),
    ("Cash limit", FacilityColumn::CashLimit),
    ("EMI", FacilityColumn::Emi),
    ("Actual payment", FacilityColumn::ActualPayment),
    ("Payment frequency", FacilityColumn::PaymentFrequency),
    ("Reported status", FacilityColumn::ReportedStatus),
    ("Status", FacilityColumn::Status),
    ("Max DPD", FacilityColumn::MaxDpd),
];

/// Facility column schema of a report family.
pub fn facility_columns(family: ReportFamily) -> &'static [(&'static str, FacilityColumn)] {
    match family {
        ReportFamily::Crif => CRIF_COLUMNS,
        ReportFamily::CommercialBureau => COMMERCIAL_COLUMNS,
        ReportFamily::ConsumerBureau => CONSUMER_COLUMNS,
    }
}

/// Propose a valid sheet name: characters spreadsheets reject are removed,
/// the result is trimmed and truncated to `max_len` characters.
pub fn proposed_sheet_name(raw: &str, max_len: usize) -> String {
    let cleaned = SHEET_NAME_INVALID.replace_all(raw, "");
    let truncated: String = cleaned.trim().chars().take(max_len).collect();
    let truncated = truncated.trim_end();
    if truncated.is_empty() {
        "Sheet".to_string()
    } else {
        truncated.to_string()
    }
}

/// Make `raw` safe as a single path component on any platform.
pub fn file_name_component(raw: &str) -> String {
    let cleaned = FILE_NAME_INVALID.replace_all(raw, "");
    let trimmed = cleaned.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        "Sheet".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Make `name` unique among `taken` by appending ` (n)`, staying within `max_len`.
fn unique_sheet_name(name: String, taken: &[String], max_len: usize) -> String {
    if !taken.contains(&name) {
        return name;
    }
    let mut n = 2;
    loop {
        let suffix = format!(" ({})", n);
        let keep = max_len.saturating_sub(suffix.chars().count());
        let base: String = name.chars().take(keep).collect();
        let candidate = format!("{}{}", base.trim_end(), suffix);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Propose the export file name from the original file name.
///
/// `"reports/acme.pdf"` with extension `xlsx` becomes `"Parsed_Output_acme.xlsx"`.
pub fn artifact_name(source_name: &str, extension: &str, config: &ExportConfig) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "report".to_string());
    format!("{}{}.{}", config.artifact_prefix, stem, extension)
}

impl ReportResult {
    /// Project the result into named tables, one per export sheet.
    pub fn tables(&self, config: &ExportConfig) -> Vec<Table> {
        let mut tables = Vec::new();

        let mut summary = Table::new("Summary", &["Name", "Score"]);
        summary.rows.push(vec![
            self.summary.name.clone(),
            self.summary.score.clone().unwrap_or_default(),
        ]);
        tables.push(summary);

        let mut details = Table::new("Borrower Details", &["Field", "Value"]);
        details.rows = self
            .identity
            .iter()
            .map(|e| vec![e.name.clone(), e.value.as_deref().unwrap_or_default().to_string()])
            .collect();
        tables.push(details);

        for summary_table in &self.summaries {
            tables.push(Table {
                sheet_name: summary_table.name.clone(),
                columns: summary_table.columns.clone(),
                rows: summary_table
                    .rows
                    .iter()
                    .map(|row| {
                        std::iter::once(row.label.clone())
                            .chain(row.cells.iter().map(|c| c.to_string()))
                            .collect()
                    })
                    .collect(),
            });
        }

        let schema = facility_columns(self.family);
        let facility_sheet = match self.family {
            ReportFamily::ConsumerBureau => self.summary.name.clone(),
            _ => "Loan Details".to_string(),
        };
        let mut facilities = Table::new(
            facility_sheet,
            &schema.iter().map(|(header, _)| *header).collect::<Vec<_>>(),
        );
        facilities.rows = self
            .facilities
            .iter()
            .map(|record| schema.iter().map(|(_, col)| col.render(record, config)).collect())
            .collect();
        tables.push(facilities);

        if let Some(inquiries) = &self.inquiries {
            tables.push(Table {
                sheet_name: "Inquiry Summary".to_string(),
                columns: inquiries.columns.clone(),
                rows: inquiries
                    .rows
                    .iter()
                    .map(|row| row.iter().map(|c| c.clone().unwrap_or_default()).collect())
                    .collect(),
            });
        }

        let mut taken: Vec<String> = Vec::with_capacity(tables.len());
        for table in &mut tables {
            let proposed = proposed_sheet_name(&table.sheet_name, config.max_sheet_name_len);
            let name = unique_sheet_name(proposed, &taken, config.max_sheet_name_len);
            taken.push(name.clone());
            table.sheet_name = name;
        }

        tables
    }

    /// Proposed export file name, if the source file name is known.
    pub fn artifact_name(&self, extension: &str, config: &ExportConfig) -> Option<String> {
        self.source_name
            .as_deref()
            .map(|source| artifact_name(source, extension, config))
    }
}
