//! Rule tables for CRIF High Mark commercial reports.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::labelled_value;
use super::{
    BlockLayout, ConditionalRule, ExtractionRule, HistoryLayout, InquiryLayout, InstitutionTable,
    RuleSet, SectionRule, field, select, select_conditionals,
};
use crate::models::report::Dialect;

const CRIF: &[Dialect] = &[Dialect::CrifStandard];

/// Block labels and the field each one fills.
const BLOCK_LABELS: &[(&str, &str)] = &[
    ("Loan Terms For", field::FACILITY),
    ("Type", field::TYPE),
    ("DPD/Asset Classification", field::ASSET_CLASSIFICATION),
    ("Info. as of", field::INFO_AS_OF),
    ("Sanctioned Date", field::SANCTIONED_DATE),
    ("Sanctioned Amount", field::SANCTIONED_AMOUNT),
    ("Current Balance", field::CURRENT_BALANCE),
    ("Closed Date", field::CLOSED_DATE),
    ("Amount Overdue", field::AMOUNT_OVERDUE),
    ("Suit Filed Status", field::SUIT_FILED),
    ("Wilful Defaulter", field::WILFUL_DEFAULT),
];

lazy_static! {
    static ref IDENTITY_RULES: Vec<ExtractionRule> = vec![
        ExtractionRule::new(field::NAME, Regex::new(r"Name:\s+(.*)").unwrap(), 1, CRIF),
        ExtractionRule::new(
            field::LEGAL_CONSTITUTION,
            Regex::new(r"Legal Constitution:\s+(.*)").unwrap(),
            1,
            CRIF,
        ),
        ExtractionRule::new(
            field::CLASS_OF_ACTIVITY,
            Regex::new(r"Class of Activity:\s+(.*)").unwrap(),
            1,
            CRIF,
        ),
        ExtractionRule::new(field::PAN, Regex::new(r"PAN:\s+([A-Z]{5}\d{4}[A-Z])").unwrap(), 1, CRIF),
        ExtractionRule::new(
            field::DATE_OF_INCORPORATION,
            Regex::new(r"Date of Incorporation:\s+(\d{2}-\d{2}-\d{4})").unwrap(),
            1,
            CRIF,
        ),
        ExtractionRule::new(field::CIN, Regex::new(r"CIN/LLPIN:\s+(\S+)").unwrap(), 1, CRIF),
        ExtractionRule::new(
            field::AMOUNT_APPLIED,
            Regex::new(r"Applied Amount:\s+(\S+)").unwrap(),
            1,
            CRIF,
        ),
    ];

    static ref BLOCK_RULES: Vec<ExtractionRule> = BLOCK_LABELS
        .iter()
        .map(|&(label, name)| ExtractionRule::new(name, labelled_value(label), 1, CRIF))
        .collect();

    static ref NO_CONDITIONALS: Vec<ConditionalRule> = Vec::new();
}

const IDENTITY_SECTIONS: &[SectionRule] = &[
    SectionRule {
        field: field::REGISTERED_ADDRESS,
        start: "Registered:",
        ends: &["GSTIN:"],
    },
    SectionRule {
        field: field::SCORE_DETAILS,
        start: "DESCRIPTION",
        ends: &["Tip"],
    },
    SectionRule {
        field: field::BENCHMARK_TIP,
        start: "Tip:",
        ends: &["CRIF HM"],
    },
];

const SUMMARY_TABLES: &[InstitutionTable] = &[
    InstitutionTable {
        name: "Borrower Summary",
        start: "Borrower Summary",
        ends: &["Credit Profile Summary"],
        row_labels: &["Your Institution", "Other Institution"],
        columns: &[
            "Type",
            "Lender",
            "Total Accts",
            "Live Accts",
            "Delinquent Accts",
            "Sanctioned Amt",
            "Outstanding Amt",
            "Overdue Amt",
            "PAR (90+)",
        ],
    },
    InstitutionTable {
        name: "Credit Summary",
        start: "Credit Profile Summary",
        ends: &["Additional Status"],
        row_labels: &["Your Institution", "Other Institution"],
        columns: &[
            "Institution",
            "Credit Facility",
            "STD Acct(#)",
            "STD O/S Amt",
            "SMA Acct(#)",
            "SMA O/S Amt",
            "SUB Acct(#)",
            "SUB O/S Amt",
            "DBT Acct(#)",
            "DBT O/S Amt",
            "LOS Acct(#)",
            "LOS O/S Amt",
            "Inquiries <3 m",
            "Inquiries 3-6 m",
            "Inquiries 6-9 m",
            "Inquiries 9-12 m",
            "Inquiries >12 m",
        ],
    },
];

/// Rule-set for a CRIF dialect.
pub fn rule_set(dialect: Dialect) -> RuleSet {
    RuleSet {
        dialect,
        identity_rules: select(&IDENTITY_RULES, dialect),
        identity_conditionals: select_conditionals(&NO_CONDITIONALS, dialect),
        identity_sections: IDENTITY_SECTIONS,
        fallback_name: "Unknown Entity",
        score_field: None,
        block: BlockLayout {
            anchor: "Loan Terms For:",
            terminators: &[],
        },
        block_rules: select(&BLOCK_RULES, dialect),
        block_conditionals: select_conditionals(&NO_CONDITIONALS, dialect),
        history: HistoryLayout::Grid {
            start: "Payment History/Asset Classification:",
            end: "Suit Filed & Wilful Default",
        },
        summary_tables: SUMMARY_TABLES,
        inquiries: Some(InquiryLayout {
            start_line: "Inquiries (reported for past 24 months)",
            end_line: "Additional Inquiry Details",
        }),
        date_layouts: &["%d-%m-%Y", "%d-%b-%Y", "%d/%m/%Y"],
    }
}
