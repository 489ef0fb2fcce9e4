//! Rule tables for commercial bureau reports.

use lazy_static::lazy_static;
use regex::Regex;

use super::{
    BlockLayout, Cleanup, Condition, ConditionalRule, ExtractionRule, HistoryLayout,
    InstitutionTable, RuleSet, SectionRule, field, select, select_conditionals,
};
use crate::models::report::Dialect;

const NUMBERED: &[Dialect] = &[Dialect::CommercialNumbered];
const COMPACT: &[Dialect] = &[Dialect::CommercialCompact];
const BOTH: &[Dialect] = &[Dialect::CommercialNumbered, Dialect::CommercialCompact];

const DATE_OR_DASH: &str = r"(\d{2}-[A-Z]{3}-\d{4}|-)";

lazy_static! {
    static ref IDENTITY_RULES: Vec<ExtractionRule> = vec![
        ExtractionRule::new(
            field::NAME,
            Regex::new(r"(?i)Name:\s*([A-Z\s]+LIMITED)").unwrap(),
            1,
            NUMBERED,
        ),
        ExtractionRule::new(
            field::NAME,
            Regex::new(r"Name of Borrower\s*[:\-]?\s*(.+)").unwrap(),
            1,
            COMPACT,
        ),
        ExtractionRule::new(
            field::LEGAL_CONSTITUTION,
            Regex::new(r"Legal Constitution:\s*([A-Za-z ]+)").unwrap(),
            1,
            BOTH,
        ),
        ExtractionRule::new(
            field::CLASS_OF_ACTIVITY,
            Regex::new(r"Class Of Activity:\s*([A-Za-z0-9 ,\-]+)").unwrap(),
            1,
            BOTH,
        ),
        ExtractionRule::new(field::PAN, Regex::new(r"PAN:\s*([A-Z0-9]+)").unwrap(), 1, BOTH),
        ExtractionRule::new(
            field::DATE_OF_INCORPORATION,
            Regex::new(r"Date of Incorporation:\s*([0-9]{2}-[A-Za-z]{3}-[0-9]{4})").unwrap(),
            1,
            BOTH,
        ),
        ExtractionRule::new(field::CIN, Regex::new(r"CIN:\s*([A-Z0-9]+)").unwrap(), 1, BOTH),
        ExtractionRule::new(field::SCORE, Regex::new(r"CMR-\s*([\d,]+)").unwrap(), 1, BOTH),
    ];

    static ref IDENTITY_CONDITIONALS: Vec<ConditionalRule> = vec![ConditionalRule {
        rule: ExtractionRule::new(
            field::NAME,
            Regex::new(r"Name:\s*[:\-]?\s*(.+)").unwrap(),
            1,
            BOTH,
        ),
        when: vec![Condition::Absent { field: field::NAME }],
    }];

    static ref BLOCK_RULES: Vec<ExtractionRule> = vec![
        ExtractionRule::new(
            field::FACILITY,
            Regex::new(r"(?i)Credit Facility\s*(\d+)").unwrap(),
            1,
            NUMBERED,
        ),
        ExtractionRule::new(field::TYPE, Regex::new(r"(?i)\bType:[ \t]*(.+)").unwrap(), 1, BOTH),
        ExtractionRule::new(
            field::ASSET_CLASSIFICATION,
            Regex::new(r"(?is)Last Reported Date.*?\n([A-Z]+[ \t]*\d*)").unwrap(),
            1,
            NUMBERED,
        )
        .with_cleanup(Cleanup::Upper),
        ExtractionRule::new(
            field::INFO_AS_OF,
            Regex::new(&format!(r"(?i){}\s*[\n ]+{}", DATE_OR_DASH, DATE_OR_DASH)).unwrap(),
            1,
            NUMBERED,
        )
        .with_cleanup(Cleanup::Upper),
        ExtractionRule::new(
            field::SANCTIONED_DATE,
            Regex::new(&format!(r"(?i)Sanctioned:\s*{}", DATE_OR_DASH)).unwrap(),
            1,
            BOTH,
        )
        .with_cleanup(Cleanup::Upper),
        ExtractionRule::new(
            field::SANCTIONED_AMOUNT,
            Regex::new(r"(?i)Sanctioned (INR|USD|EUR):\s*([\d,]+)").unwrap(),
            2,
            BOTH,
        ),
        ExtractionRule::new(
            field::CURRENCY,
            Regex::new(r"(?i)Sanctioned (INR|USD|EUR):\s*([\d,]+)").unwrap(),
            1,
            BOTH,
        )
        .with_cleanup(Cleanup::Upper),
        ExtractionRule::new(
            field::CURRENT_BALANCE,
            Regex::new(r"(?i)Outstanding Balance:\s*(-?[\d,]+)").unwrap(),
            1,
            BOTH,
        ),
        ExtractionRule::new(
            field::CLOSED_DATE,
            Regex::new(&format!(r"(?i)Loan Expiry\s*/\s*Maturity:\s*{}", DATE_OR_DASH)).unwrap(),
            1,
            NUMBERED,
        )
        .with_cleanup(Cleanup::Upper),
        ExtractionRule::new(
            field::AMOUNT_OVERDUE,
            Regex::new(r"(?i)\bOverdue:\s*(-?[\d,]+)").unwrap(),
            1,
            BOTH,
        ),
        ExtractionRule::new(
            field::EMI,
            Regex::new(r"(?i)Installment Amount:\s*([\d,]+)").unwrap(),
            1,
            BOTH,
        ),
        ExtractionRule::new(
            field::SUIT_FILED,
            Regex::new(&format!(r"(?i)Suit Filed:\s*{}", DATE_OR_DASH)).unwrap(),
            1,
            NUMBERED,
        )
        .with_cleanup(Cleanup::Upper),
        ExtractionRule::new(
            field::WILFUL_DEFAULT,
            Regex::new(&format!(r"(?i)Wilful Default:\s*{}", DATE_OR_DASH)).unwrap(),
            1,
            NUMBERED,
        )
        .with_cleanup(Cleanup::Upper),
    ];

    static ref NO_CONDITIONALS: Vec<ConditionalRule> = Vec::new();
}

const IDENTITY_SECTIONS: &[SectionRule] = &[SectionRule {
    field: field::REGISTERED_ADDRESS,
    start: "Registered Office Address:",
    ends: &["Telephone", "Mobile", "Email"],
}];

const CREDIT_SUMMARY: &[InstitutionTable] = &[InstitutionTable {
    name: "Credit Summary",
    start: "Credit Profile Summary",
    ends: &["Enquiry Summary", "Credit Facility Details"],
    row_labels: &["Your Institution", "Other Institution"],
    columns: &[
        "Category",
        "Total_Lenders",
        "Total_CF_Borrower",
        "Total_CF_Guarantor",
        "Open_CF",
        "Total_Outstanding_Borrower",
        "Total_Outstanding_Guarantor",
        "Latest_CF_Opened_Date",
        "Delinquent_CF_Borrower",
        "Delinquent_CF_Guarantor",
        "Delinquent_Outstanding_Borrower",
        "Delinquent_Outstanding_Guarantor",
    ],
}];

const NO_TABLES: &[InstitutionTable] = &[];

/// Rule-set for a commercial bureau dialect.
pub fn rule_set(dialect: Dialect) -> RuleSet {
    let (block, summary_tables) = match dialect {
        Dialect::CommercialNumbered => (
            BlockLayout {
                anchor: "Credit Facility Details - As Borrower",
                terminators: &[],
            },
            CREDIT_SUMMARY,
        ),
        _ => (
            BlockLayout {
                anchor: "Credit Facility Details",
                terminators: &["Overdue Details"],
            },
            NO_TABLES,
        ),
    };

    RuleSet {
        dialect,
        identity_rules: select(&IDENTITY_RULES, dialect),
        identity_conditionals: select_conditionals(&IDENTITY_CONDITIONALS, dialect),
        identity_sections: IDENTITY_SECTIONS,
        fallback_name: "Unknown Entity",
        score_field: Some(field::SCORE),
        block,
        block_rules: select(&BLOCK_RULES, dialect),
        block_conditionals: select_conditionals(&NO_CONDITIONALS, dialect),
        history: HistoryLayout::None,
        summary_tables,
        inquiries: None,
        date_layouts: &["%d-%b-%Y", "%d-%m-%Y", "%d/%m/%Y"],
    }
}
