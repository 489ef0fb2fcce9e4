//! End-to-end extraction over one synthetic report per dialect.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use credx_core::models::report::{InquiryTable, Normalized, SummaryCell};
use credx_core::report::rules::field;
use credx_core::{
    AccountStatus, BureauReportParser, CredxConfig, Dialect, ExtractionError, FieldValue, Issue,
    ReportDate, ReportFamily, ReportParser,
};

fn date(y: i32, m: u32, d: u32) -> ReportDate {
    ReportDate::Parsed(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

const COMMERCIAL_NUMBERED: &str = "\
COMMERCIAL CREDIT INFORMATION REPORT
Name: ACME INDUSTRIES LIMITED
Legal Constitution: Private Limited
Class Of Activity: Manufacturing
PAN: AABCA1234F
Date of Incorporation: 05-Mar-2001
CIN: U12345KA2001PTC012345
Registered Office Address: 12 Industrial Area
Peenya, Bengaluru
Telephone: 08012345678
CMR- 4
Credit Profile Summary
Your Institution
1
2
0
2
1500000
0
15-Jun-2023
0
0
0
0
Other Institution
3
4
1
3
2750000
0
01-Feb-2024
1
0
125000
0
Enquiry Summary
10. Credit Facility Details - As Borrower
Credit Facility 1
Type: Term Loan
Last Reported Date
STD 0
31-DEC-2023 31-DEC-2023
Sanctioned: 12-JAN-2023
Sanctioned INR: 1,00,000
Outstanding Balance: 75,000
Overdue: 0
Installment Amount: 5,000
Suit Filed: -
Wilful Default: -
10. Credit Facility Details - As Borrower
Credit Facility 2
Type: Cash Credit
Last Reported Date
SMA 30
30-NOV-2023 30-NOV-2023
Sanctioned: 01-APR-2021
Sanctioned USD: 20,000
Outstanding Balance: 18,500
Loan Expiry / Maturity: 31-MAR-2026
Installment Amount: 1,200
Suit Filed: -
Wilful Default: -
";

#[test]
fn commercial_numbered_two_blocks_one_missing_field_each() {
    let parser = BureauReportParser::new();
    let result = parser.parse_named(COMMERCIAL_NUMBERED, Some("acme.pdf")).unwrap();

    assert_eq!(result.family, ReportFamily::CommercialBureau);
    assert_eq!(result.dialect, Dialect::CommercialNumbered);
    assert_eq!(result.summary.name, "ACME INDUSTRIES LIMITED");
    assert_eq!(result.summary.score.as_deref(), Some("4"));
    assert_eq!(
        result.identity.found(field::REGISTERED_ADDRESS),
        Some("12 Industrial Area Peenya, Bengaluru")
    );
    assert_eq!(result.identity.found(field::DATE_OF_INCORPORATION), Some("05-Mar-2001"));

    assert_eq!(result.facilities.len(), 2);

    let first = &result.facilities[0];
    assert_eq!(first.sequence, 1);
    assert_eq!(first.borrower, "ACME INDUSTRIES LIMITED");
    assert_eq!(first.fields.missing().collect::<Vec<_>>(), vec![field::CLOSED_DATE]);
    assert_eq!(first.fields.get(field::CLOSED_DATE), Some(&FieldValue::NotFound));
    assert_eq!(first.facility_label.as_deref(), Some("1"));
    assert_eq!(first.account_type.as_deref(), Some("Term Loan"));
    assert_eq!(first.asset_classification.as_deref(), Some("STD 0"));
    assert_eq!(first.info_as_of, date(2023, 12, 31));
    assert_eq!(first.sanctioned_date, date(2023, 1, 12));
    assert_eq!(first.sanctioned_amount, Normalized::exact(100000));
    assert_eq!(first.currency.as_deref(), Some("INR"));
    assert_eq!(first.current_balance, Normalized::exact(75000));
    assert_eq!(first.amount_overdue, Normalized::exact(0));
    assert_eq!(first.emi, Normalized::exact(5000));
    assert_eq!(first.suit_filed.as_deref(), Some("-"));
    assert_eq!(first.closed_date, ReportDate::Missing);
    assert_eq!(first.status, AccountStatus::Active);

    let second = &result.facilities[1];
    assert_eq!(second.sequence, 2);
    assert_eq!(second.fields.missing().collect::<Vec<_>>(), vec![field::AMOUNT_OVERDUE]);
    assert_eq!(second.asset_classification.as_deref(), Some("SMA 30"));
    assert_eq!(second.currency.as_deref(), Some("USD"));
    assert_eq!(second.sanctioned_amount, Normalized::exact(20000));
    assert_eq!(second.closed_date, date(2026, 3, 31));
    assert_eq!(second.status, AccountStatus::Closed);
    assert_eq!(second.amount_overdue, Normalized::fallback(0));

    assert_eq!(
        result.metadata.issues,
        vec![
            Issue::FieldNotFound {
                field: field::CLOSED_DATE.to_string(),
                record: Some(1),
            },
            Issue::FieldNotFound {
                field: field::AMOUNT_OVERDUE.to_string(),
                record: Some(2),
            },
        ]
    );

    let summary = result.summary_table("Credit Summary").unwrap();
    assert_eq!(summary.columns.len(), 12);
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.rows[1].cells[4], SummaryCell::Number(Decimal::from(2750000)));
    assert_eq!(summary.rows[1].cells[5], SummaryCell::Number(Decimal::from(0)));
    assert_eq!(summary.rows[1].cells[6], SummaryCell::Text("01-Feb-2024".to_string()));
}

#[test]
fn commercial_compact_blocks_end_at_overdue_details() {
    let text = "\
COMMERCIAL CREDIT INFORMATION REPORT
Name of Borrower: SUNRISE TRADERS
CMR- 6
Credit Facility Details
Type: Cash Credit
Sanctioned: 01-APR-2022
Sanctioned INR: 25,00,000
Outstanding Balance: 18,75,000
Overdue: 2,500
Installment Amount: 0
Overdue Details
Days overdue 30
Credit Facility Details
Type: Overdraft
Sanctioned INR: 5,00,000
Outstanding Balance: 0
Overdue Details
";
    let result = BureauReportParser::new().parse(text).unwrap();

    assert_eq!(result.dialect, Dialect::CommercialCompact);
    assert_eq!(result.summary.name, "SUNRISE TRADERS");
    assert_eq!(result.summary.score.as_deref(), Some("6"));
    assert_eq!(result.facilities.len(), 2);
    assert_eq!(result.facilities[0].amount_overdue, Normalized::exact(2500));
    assert_eq!(result.facilities[0].sanctioned_date, date(2022, 4, 1));
    assert_eq!(result.facilities[1].account_type.as_deref(), Some("Overdraft"));
    assert_eq!(result.facilities[1].sanctioned_date, ReportDate::Missing);
    assert!(result.summaries.is_empty());
}

const CRIF: &str = "\
CRIF HM
Name: BRIGHT FOODS PRIVATE LIMITED
Legal Constitution: Private Limited
Class of Activity: Food Processing
PAN: AABCB1234C
Date of Incorporation: 14-08-2010
CIN/LLPIN: U15400MH2010PTC123456
Applied Amount: 5,00,000
Registered: Plot 7, MIDC
Pune
GSTIN: 27AABCB1234C1Z5
DESCRIPTION
Score 720 indicates
low risk
Tip: Maintain timely repayments
CRIF HM Score
Borrower Summary
Your Institution
Bank
2
1
0
1500000
850000
0
0.0
Other Institution
NBFC
1
1
0
300000
120000
0
0.0
Credit Profile Summary
Your Institution
Term Loan
1
850000
0
0
0
0
0
0
0
0
0
0
0
0
1
Other Institution
Business Loan
1
120000
0
0
0
0
0
0
0
0
1
0
0
0
0
Additional Status
Loan Terms For: Term Loan
Type: Secured
DPD/Asset Classification: STD
Info. as of: 31-12-2023
Sanctioned Date: 12-01-2023
Sanctioned Amount: 10,00,000
Current Balance: 8,50,000
Closed Date:
Amount Overdue: 0
Suit Filed Status: No
Wilful Defaulter: No
Payment History/Asset Classification:
Jan
Feb
Mar
Apr
May
Jun
Jul
Aug
Sep
Oct
Nov
Dec
2023
-
-
STD
-
-
-
-
-
-
-
-
-
2022
-
-
030
-
-
-
-
-
-
-
-
-
Suit Filed & Wilful Default
Inquiries (reported for past 24 months)
Lender
Date
Purpose
Amount
Status
Remarks
XXXX
12-02-2024
Working Capital
2,00,000
Approved
-
XXXX
01-01-2024
Term Loan
Additional Inquiry Details
";

#[test]
fn crif_report_end_to_end() {
    let result = BureauReportParser::new().parse(CRIF).unwrap();

    assert_eq!(result.dialect, Dialect::CrifStandard);
    assert_eq!(result.summary.name, "BRIGHT FOODS PRIVATE LIMITED");
    assert_eq!(result.summary.score, None);
    assert_eq!(result.identity.found(field::PAN), Some("AABCB1234C"));
    assert_eq!(result.identity.found(field::AMOUNT_APPLIED), Some("5,00,000"));
    assert_eq!(result.identity.found(field::REGISTERED_ADDRESS), Some("Plot 7, MIDC Pune"));
    assert_eq!(
        result.identity.found(field::SCORE_DETAILS),
        Some("Score 720 indicates low risk")
    );
    assert_eq!(
        result.identity.found(field::BENCHMARK_TIP),
        Some("Maintain timely repayments")
    );

    let borrower = result.summary_table("Borrower Summary").unwrap();
    assert_eq!(borrower.rows.len(), 2);
    assert_eq!(borrower.rows[0].cells[0], SummaryCell::Text("Bank".to_string()));
    assert_eq!(borrower.rows[1].cells[4], SummaryCell::Number(Decimal::from(300000)));

    let credit = result.summary_table("Credit Summary").unwrap();
    assert_eq!(credit.columns.len(), 17);
    assert_eq!(credit.rows[0].cells.len(), 16);
    assert_eq!(credit.rows[0].cells[15], SummaryCell::Number(Decimal::from(1)));

    assert_eq!(result.facilities.len(), 1);
    let loan = &result.facilities[0];
    assert_eq!(loan.facility_label.as_deref(), Some("Term Loan"));
    assert_eq!(loan.info_as_of, date(2023, 12, 31));
    assert_eq!(loan.sanctioned_date, date(2023, 1, 12));
    assert_eq!(loan.sanctioned_amount, Normalized::exact(1000000));
    assert_eq!(loan.fields.found(field::CLOSED_DATE), Some(""));
    assert_eq!(loan.status, AccountStatus::Active);
    assert_eq!(
        loan.payment_history
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>(),
        vec!["Mar 2023 STD", "Mar 2022 030"]
    );
    assert_eq!(loan.max_dpd, 30);

    let inquiries = result.inquiries.as_ref().unwrap();
    assert_eq!(
        inquiries,
        &InquiryTable {
            columns: ["Lender", "Date", "Purpose", "Amount", "Status", "Remarks"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: vec![
                ["XXXX", "12-02-2024", "Working Capital", "2,00,000", "Approved", "-"]
                    .iter()
                    .map(|s| Some(s.to_string()))
                    .collect(),
                vec![
                    Some("XXXX".to_string()),
                    Some("01-01-2024".to_string()),
                    Some("Term Loan".to_string()),
                    None,
                    None,
                    None,
                ],
            ],
        }
    );

    assert_eq!(
        result.metadata.issues,
        vec![Issue::LayoutDeviation {
            section: "Inquiry Summary".to_string(),
            detail: "row 2 padded from 3 to 6 cells".to_string(),
        }]
    );
}

const CONSUMER_SECTIONED: &str = "\
CREDITVISION® SCORE: 745
CONSUMER NAME: RAVI KUMAR
ACCOUNT INFORMATION
ACCOUNT TYPE: Credit Card
OWNERSHIP: Individual
DATE OPENED: 12/01/2023
SANCTIONED AMOUNT: -
CREDIT LIMIT: 1,50,000
CURRENT BALANCE: 12,345
HIGH CREDIT AMOUNT: 60,000
CASH LIMIT: 30,000
ACTUAL PAYMENT: 5,000
PAYMENT FREQUENCY: Monthly
STATUS: Standard
DAYS PAST DUE/ASSET CLASSIFICATION (UP TO 36 MONTHS; LEFT TO RIGHT)
YEAR 2023
000 030 000
ACCOUNT INFORMATION
ACCOUNT TYPE: Personal Loan
OWNERSHIP: Joint
DATE OPENED: 05/06/2020
DATE CLOSED: 15/03/2024
SANCTIONED AMOUNT: 2,00,000
CURRENT BALANCE: 0
EMI: 6,500
STATUS: Closed
";

#[test]
fn consumer_sectioned_credit_card_uses_credit_limit() {
    let result = BureauReportParser::new().parse(CONSUMER_SECTIONED).unwrap();

    assert_eq!(result.dialect, Dialect::ConsumerSectioned);
    assert_eq!(result.summary.name, "RAVI KUMAR");
    assert_eq!(result.summary.score.as_deref(), Some("745"));
    assert_eq!(result.facilities.len(), 2);

    let card = &result.facilities[0];
    assert_eq!(card.borrower, "RAVI KUMAR");
    assert_eq!(card.account_type.as_deref(), Some("Credit Card"));
    assert_eq!(card.ownership.as_deref(), Some("Individual"));
    assert_eq!(card.sanctioned_date, date(2023, 1, 12));
    assert_eq!(card.sanctioned_amount, Normalized::exact(150000));
    assert_eq!(card.current_balance, Normalized::exact(12345));
    assert_eq!(card.high_credit, Normalized::exact(60000));
    assert_eq!(card.cash_limit, Normalized::exact(30000));
    assert_eq!(card.actual_payment, Normalized::exact(5000));
    assert_eq!(card.payment_frequency.as_deref(), Some("Monthly"));
    assert_eq!(card.reported_status.as_deref(), Some("Standard"));
    assert_eq!(card.max_dpd, 30);
    assert_eq!(card.status, AccountStatus::Active);

    let loan = &result.facilities[1];
    assert_eq!(loan.sanctioned_amount, Normalized::exact(200000));
    assert_eq!(loan.emi, Normalized::exact(6500));
    assert_eq!(loan.closed_date, date(2024, 3, 15));
    assert_eq!(loan.status, AccountStatus::Closed);
    assert_eq!(loan.max_dpd, 0);
}

const CONSUMER_INLINE: &str = "\
CREDITVISION® SCORE 702
CONSUMER: PRIYA SHARMA
STATUS
TYPE: AUTO LOAN
OWNERSHIP: INDIVIDUAL OPENED: 10-05-2021
SANCTIONED: 6,00,000
CURRENT BALANCE: 3,20,000
EMI: 14,500
CLOSED:
DAYS PAST DUE/ASSET CLASSIFICATION
000 030 060
000
ACCOUNT DATES
STATUS
TYPE: CREDIT CARD
OWNERSHIP: INDIVIDUAL
OPENED: 01-02-2019
CLOSED: 20-07-2023
CREDIT LIMIT: 75,000
CURRENT BALANCE: 0
ENQUIRIES:
";

#[test]
fn consumer_inline_blocks() {
    let result = BureauReportParser::new().parse(CONSUMER_INLINE).unwrap();

    assert_eq!(result.dialect, Dialect::ConsumerInline);
    assert_eq!(result.summary.name, "PRIYA SHARMA");
    assert_eq!(result.summary.score.as_deref(), Some("702"));
    assert_eq!(result.facilities.len(), 2);

    let auto = &result.facilities[0];
    assert_eq!(auto.account_type.as_deref(), Some("AUTO LOAN"));
    assert_eq!(auto.ownership.as_deref(), Some("INDIVIDUAL"));
    assert_eq!(auto.sanctioned_date, date(2021, 5, 10));
    assert_eq!(auto.sanctioned_amount, Normalized::exact(600000));
    assert_eq!(auto.current_balance, Normalized::exact(320000));
    assert_eq!(auto.emi, Normalized::exact(14500));
    assert_eq!(auto.max_dpd, 60);
    assert_eq!(auto.status, AccountStatus::Active);

    let card = &result.facilities[1];
    assert_eq!(card.sanctioned_amount, Normalized::exact(75000));
    assert_eq!(card.status, AccountStatus::Closed);
    assert_eq!(card.closed_date, date(2023, 7, 20));
}

#[test]
fn unrecognized_text_is_an_error() {
    let parser = BureauReportParser::new();
    assert_eq!(parser.parse("").unwrap_err(), ExtractionError::UnrecognizedFormat);
    assert_eq!(
        parser.parse("Annual general meeting minutes").unwrap_err(),
        ExtractionError::UnrecognizedFormat
    );
}

#[test]
fn export_tables_have_fixed_schema() {
    let config = CredxConfig::default();
    let result = BureauReportParser::new()
        .parse_named(COMMERCIAL_NUMBERED, Some("uploads/acme.pdf"))
        .unwrap();
    let tables = result.tables(&config.export);

    let names: Vec<_> = tables.iter().map(|t| t.sheet_name.as_str()).collect();
    assert_eq!(names, vec!["Summary", "Borrower Details", "Credit Summary", "Loan Details"]);

    let loans = &tables[3];
    assert!(loans.rows.iter().all(|row| row.len() == loans.columns.len()));
    assert_eq!(loans.rows[0][6], "12/01/2023");
    assert_eq!(loans.rows[1][10], "31/03/2026");

    assert_eq!(
        result.artifact_name("xlsx", &config.export).as_deref(),
        Some("Parsed_Output_acme.xlsx")
    );
}

#[test]
fn result_serializes_to_json() {
    let result = BureauReportParser::new().parse(CONSUMER_INLINE).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["family"], "consumer_bureau");
    assert_eq!(json["dialect"], "consumer_inline");
    assert_eq!(json["facilities"][0]["max_dpd"], 60);
    assert_eq!(json["facilities"][0]["sanctioned_date"], "2021-05-10");
}
