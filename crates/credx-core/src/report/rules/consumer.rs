//! Rule tables for consumer bureau reports.

use lazy_static::lazy_static;
use regex::Regex;

use super::{
    BlockLayout, Condition, ConditionalRule, DpdWindow, ExtractionRule, HistoryLayout, RuleSet,
    field, select, select_conditionals,
};
use crate::models::report::Dialect;

const SECTIONED: &[Dialect] = &[Dialect::ConsumerSectioned];
const INLINE: &[Dialect] = &[Dialect::ConsumerInline];
const BOTH: &[Dialect] = &[Dialect::ConsumerSectioned, Dialect::ConsumerInline];

/// `LABEL [:-] value` on a single line, label case-insensitive.
///
/// A label followed only by its separator captures nothing.
fn line_value(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){}[ \t]*(?:[:\-][ \t]*)?([^\s:].*)", label)).unwrap()
}

/// A credit limit replaces the sanctioned amount for cards or when no amount was printed.
fn credit_limit_conditions() -> Vec<Condition> {
    vec![
        Condition::Contains {
            field: field::TYPE,
            needle: "credit card",
        },
        Condition::Absent {
            field: field::SANCTIONED_AMOUNT,
        },
    ]
}

lazy_static! {
    static ref IDENTITY_RULES: Vec<ExtractionRule> = vec![
        ExtractionRule::new(field::NAME, line_value(r"CONSUMER\s*NAME"), 1, BOTH),
        ExtractionRule::new(
            field::SCORE,
            Regex::new(r"(?i)CREDITVISION®?\s*SCORE\s*[:\-]?\s*(\d{3})").unwrap(),
            1,
            BOTH,
        ),
    ];

    static ref IDENTITY_CONDITIONALS: Vec<ConditionalRule> = vec![ConditionalRule {
        rule: ExtractionRule::new(
            field::NAME,
            Regex::new(r"(?i)CONSUMER[ \t]*[:\-][ \t]*(.+)").unwrap(),
            1,
            BOTH,
        ),
        when: vec![Condition::Absent { field: field::NAME }],
    }];

    static ref BLOCK_RULES: Vec<ExtractionRule> = vec![
        // Sectioned layout
        ExtractionRule::new(field::TYPE, line_value(r"ACCOUNT\s*TYPE"), 1, SECTIONED),
        ExtractionRule::new(field::OWNERSHIP, line_value("OWNERSHIP"), 1, SECTIONED),
        ExtractionRule::new(
            field::SANCTIONED_DATE,
            Regex::new(r"(?i)DATE OPENED\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})").unwrap(),
            1,
            SECTIONED,
        ),
        ExtractionRule::new(
            field::CLOSED_DATE,
            Regex::new(r"(?i)DATE CLOSED\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})").unwrap(),
            1,
            SECTIONED,
        ),
        ExtractionRule::new(field::SANCTIONED_AMOUNT, line_value(r"SANCTIONED\s*AMOUNT"), 1, SECTIONED),
        ExtractionRule::new(field::CURRENT_BALANCE, line_value("BALANCE"), 1, SECTIONED),
        ExtractionRule::new(field::HIGH_CREDIT, line_value(r"HIGH CREDIT\s*AMOUNT"), 1, SECTIONED),
        ExtractionRule::new(field::CASH_LIMIT, line_value("CASH LIMIT"), 1, SECTIONED),
        ExtractionRule::new(field::EMI, line_value(r"\bEMI"), 1, SECTIONED),
        ExtractionRule::new(field::ACTUAL_PAYMENT, line_value("ACTUAL PAYMENT"), 1, SECTIONED),
        ExtractionRule::new(field::PAYMENT_FREQUENCY, line_value("PAYMENT FREQUENCY"), 1, SECTIONED),
        ExtractionRule::new(field::REPORTED_STATUS, line_value("STATUS"), 1, SECTIONED),

        // Inline layout
        ExtractionRule::new(field::TYPE, Regex::new(r"(?i)TYPE:\s*(.+)").unwrap(), 1, INLINE),
        ExtractionRule::new(
            field::OWNERSHIP,
            Regex::new(r"(?i)OWNERSHIP:\s*(.+?)(?:OPENED|\n|LAST|REPORTED|CLOSED|PMT|$)").unwrap(),
            1,
            INLINE,
        ),
        ExtractionRule::new(
            field::SANCTIONED_DATE,
            Regex::new(r"OPENED:\s*(\d{2}-\d{2}-\d{4})").unwrap(),
            1,
            INLINE,
        ),
        ExtractionRule::new(field::CLOSED_DATE, Regex::new(r"CLOSED:[ \t]*(.*)").unwrap(), 1, INLINE),
        ExtractionRule::new(
            field::SANCTIONED_AMOUNT,
            Regex::new(r"SANCTIONED:\s*([\d,]+)").unwrap(),
            1,
            INLINE,
        ),
        ExtractionRule::new(
            field::CURRENT_BALANCE,
            Regex::new(r"CURRENT BALANCE:\s*(-?[\d,]+)").unwrap(),
            1,
            INLINE,
        ),
        ExtractionRule::new(field::EMI, Regex::new(r"EMI:\s*([\d,]+)").unwrap(), 1, INLINE),
    ];

    static ref BLOCK_CONDITIONALS: Vec<ConditionalRule> = vec![
        ConditionalRule {
            rule: ExtractionRule::new(field::SANCTIONED_AMOUNT, line_value("CREDIT LIMIT"), 1, SECTIONED),
            when: credit_limit_conditions(),
        },
        ConditionalRule {
            rule: ExtractionRule::new(
                field::SANCTIONED_AMOUNT,
                Regex::new(r"CREDIT LIMIT:\s*([\d,]+)").unwrap(),
                1,
                INLINE,
            ),
            when: credit_limit_conditions(),
        },
    ];
}

/// Rule-set for a consumer bureau dialect.
pub fn rule_set(dialect: Dialect) -> RuleSet {
    let (block, history) = match dialect {
        Dialect::ConsumerSectioned => (
            BlockLayout {
                anchor: "ACCOUNT INFORMATION",
                terminators: &[],
            },
            HistoryLayout::DelinquencyScan(DpdWindow::UntilLabel { end: "ACCOUNT" }),
        ),
        _ => (
            BlockLayout {
                anchor: "STATUS",
                terminators: &["ACCOUNT DATES", "ENQUIRIES:"],
            },
            HistoryLayout::DelinquencyScan(DpdWindow::NumericRun),
        ),
    };

    RuleSet {
        dialect,
        identity_rules: select(&IDENTITY_RULES, dialect),
        identity_conditionals: select_conditionals(&IDENTITY_CONDITIONALS, dialect),
        identity_sections: &[],
        fallback_name: "Unknown Individual",
        score_field: Some(field::SCORE),
        block,
        block_rules: select(&BLOCK_RULES, dialect),
        block_conditionals: select_conditionals(&BLOCK_CONDITIONALS, dialect),
        history,
        summary_tables: &[],
        inquiries: None,
        date_layouts: &["%d/%m/%Y", "%d-%m-%Y"],
    }
}
