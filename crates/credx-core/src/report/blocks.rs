//! Repeated facility/account block parsing.

use tracing::{debug, warn};

use super::fields::FieldExtractor;
use super::history::{PaymentGrid, max_delinquency, max_grid_delinquency};
use super::rules::{HistoryLayout, RuleSet, derive_status, field, normalize_amount, normalize_date};
use super::segment::{BlockEnd, repeated_blocks, section_between};
use crate::models::config::ExtractionConfig;
use crate::models::report::{FacilityRecord, FieldRecord, Issue, Normalized, ReportDate};

/// Turns every anchor occurrence into one [`FacilityRecord`].
///
/// The record count always equals the anchor count; a block matching no
/// field still yields a record with every field marked not found. When the
/// layout has terminators, a block closed any other way is kept and flagged.
pub struct BlockParser<'r> {
    rules: &'r RuleSet,
    config: &'r ExtractionConfig,
}

impl<'r> BlockParser<'r> {
    pub fn new(rules: &'r RuleSet, config: &'r ExtractionConfig) -> Self {
        Self { rules, config }
    }

    pub fn parse(&self, text: &str, borrower: &str, issues: &mut Vec<Issue>) -> Vec<FacilityRecord> {
        let layout = &self.rules.block;
        let extractor = FieldExtractor::new(
            &self.rules.block_rules,
            &self.rules.block_conditionals,
            self.config.occurrence,
        );

        repeated_blocks(text, layout.anchor, layout.terminators)
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let sequence = i + 1;
                if !layout.terminators.is_empty() && block.end != BlockEnd::Terminator {
                    let detail = match block.end {
                        BlockEnd::NextAnchor => {
                            format!("record {}: no terminator before the next anchor", sequence)
                        }
                        _ => format!("record {}: no terminator, block runs to end of text", sequence),
                    };
                    warn!("'{}' {}", layout.anchor, detail);
                    issues.push(Issue::LayoutDeviation {
                        section: layout.anchor.to_string(),
                        detail,
                    });
                }
                let fields = extractor.extract(block.as_str());
                for name in fields.missing() {
                    issues.push(Issue::FieldNotFound {
                        field: name.to_string(),
                        record: Some(sequence),
                    });
                }
                self.build_record(sequence, borrower, block.as_str(), fields, issues)
            })
            .collect()
    }

    fn build_record(
        &self,
        sequence: usize,
        borrower: &str,
        block: &str,
        fields: FieldRecord,
        issues: &mut Vec<Issue>,
    ) -> FacilityRecord {
        let text = |name: &str| {
            fields
                .found(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let mut amount = |name: &str| -> Normalized<i64> {
            let raw = fields.found(name);
            let normalized = normalize_amount(raw);
            if let (true, Some(raw)) = (normalized.fallback, raw) {
                debug!("Record {}: amount '{}' for {} fell back to 0", sequence, raw, name);
                issues.push(Issue::NormalizationFallback {
                    field: name.to_string(),
                    raw: raw.to_string(),
                    record: Some(sequence),
                });
            }
            normalized
        };

        let sanctioned_amount = amount(field::SANCTIONED_AMOUNT);
        let current_balance = amount(field::CURRENT_BALANCE);
        let amount_overdue = amount(field::AMOUNT_OVERDUE);
        let high_credit = amount(field::HIGH_CREDIT);
        let cash_limit = amount(field::CASH_LIMIT);
        let emi = amount(field::EMI);
        let actual_payment = amount(field::ACTUAL_PAYMENT);

        let mut date = |name: &str| -> ReportDate {
            let normalized = normalize_date(fields.found(name), self.rules.date_layouts);
            if let ReportDate::Unparsed(raw) = &normalized {
                if raw != "-" {
                    issues.push(Issue::NormalizationFallback {
                        field: name.to_string(),
                        raw: raw.clone(),
                        record: Some(sequence),
                    });
                }
            }
            normalized
        };

        let info_as_of = date(field::INFO_AS_OF);
        let sanctioned_date = date(field::SANCTIONED_DATE);
        let closed_date = date(field::CLOSED_DATE);

        let (payment_history, max_dpd) = match self.rules.history {
            HistoryLayout::Grid { start, end } => match section_between(block, start, &[end]) {
                Some(span) => match PaymentGrid::parse(span.as_str(), self.config.history_months) {
                    Some(grid) => {
                        if grid.discarded_lines > 0 {
                            warn!(
                                "Record {}: discarded {} lines of a partial payment-history group",
                                sequence, grid.discarded_lines
                            );
                            issues.push(Issue::LayoutDeviation {
                                section: "Payment History".to_string(),
                                detail: format!(
                                    "record {}: discarded {} lines of a partial year group",
                                    sequence, grid.discarded_lines
                                ),
                            });
                        }
                        let history = grid.observations(&self.config.blank_status_markers);
                        let max = max_grid_delinquency(&history);
                        (history, max)
                    }
                    None => {
                        issues.push(Issue::LayoutDeviation {
                            section: "Payment History".to_string(),
                            detail: format!("record {}: fewer lines than month labels", sequence),
                        });
                        (Vec::new(), 0)
                    }
                },
                None => (Vec::new(), 0),
            },
            HistoryLayout::DelinquencyScan(window) => {
                (Vec::new(), max_delinquency(block, &window).unwrap_or(0))
            }
            HistoryLayout::None => (Vec::new(), 0),
        };

        FacilityRecord {
            sequence,
            borrower: borrower.to_string(),
            facility_label: text(field::FACILITY),
            account_type: text(field::TYPE),
            ownership: text(field::OWNERSHIP),
            asset_classification: text(field::ASSET_CLASSIFICATION),
            info_as_of,
            sanctioned_date,
            status: derive_status(fields.found(field::CLOSED_DATE)),
            closed_date,
            sanctioned_amount,
            currency: text(field::CURRENCY),
            current_balance,
            amount_overdue,
            high_credit,
            cash_limit,
            emi,
            actual_payment,
            payment_frequency: text(field::PAYMENT_FREQUENCY),
            reported_status: text(field::REPORTED_STATUS),
            suit_filed: text(field::SUIT_FILED),
            wilful_default: text(field::WILFUL_DEFAULT),
            max_dpd,
            payment_history,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{AccountStatus, Dialect, FieldValue};

    fn parse(dialect: Dialect, text: &str) -> (Vec<FacilityRecord>, Vec<Issue>) {
        let rules = RuleSet::for_dialect(dialect);
        let config = ExtractionConfig::default();
        let mut issues = Vec::new();
        let records = BlockParser::new(&rules, &config).parse(text, "ACME LIMITED", &mut issues);
        (records, issues)
    }

    #[test]
    fn test_record_count_matches_anchor_count() {
        let (records, _) = parse(Dialect::CrifStandard, "no blocks at all");
        assert!(records.is_empty());

        let (records, _) = parse(Dialect::CrifStandard, "Loan Terms For: Cash Credit\nType: Secured");
        assert_eq!(records.len(), 1);

        let text = "Loan Terms For:\nLoan Terms For:\nLoan Terms For:";
        let (records, _) = parse(Dialect::CrifStandard, text);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].sequence, 3);
    }

    #[test]
    fn test_empty_block_keeps_record() {
        let (records, issues) = parse(Dialect::CrifStandard, "Loan Terms For:");
        let record = &records[0];
        assert_eq!(record.borrower, "ACME LIMITED");
        assert_eq!(record.fields.found(field::FACILITY), Some(""));
        assert_eq!(record.fields.get(field::TYPE), Some(&FieldValue::NotFound));
        assert_eq!(record.status, AccountStatus::Active);
        assert_eq!(
            issues.iter().filter(|i| matches!(i, Issue::FieldNotFound { .. })).count(),
            record.fields.missing().count()
        );
    }

    #[test]
    fn test_crif_grid_history() {
        let text = "Loan Terms For: Term Loan\nClosed Date: 15-03-2024\n\
                    Payment History/Asset Classification:\n\
                    Jan\nFeb\nMar\nApr\nMay\nJun\nJul\nAug\nSep\nOct\nNov\nDec\n\
                    2022\n-\n-\n030\n-\n-\n-\n-\n-\n-\n-\n-\n-\n\
                    Suit Filed & Wilful Default\n";
        let (records, _) = parse(Dialect::CrifStandard, text);
        let record = &records[0];
        assert_eq!(record.payment_history.len(), 1);
        assert_eq!(record.payment_history[0].to_string(), "Mar 2022 030");
        assert_eq!(record.max_dpd, 30);
        assert_eq!(record.status, AccountStatus::Closed);
        assert_eq!(record.closed_date.format("%d/%m/%Y"), "15/03/2024");
    }

    #[test]
    fn test_amount_fallback_flagged_only_when_found() {
        let (records, issues) = parse(Dialect::CrifStandard, "Loan Terms For: OD\nSanctioned Amount: -\n");
        assert_eq!(records[0].sanctioned_amount, Normalized::fallback(0));
        let fallbacks: Vec<_> = issues
            .iter()
            .filter(|i| matches!(i, Issue::NormalizationFallback { .. }))
            .collect();
        assert_eq!(fallbacks.len(), 1);
    }

    #[test]
    fn test_unterminated_inline_block_is_kept() {
        let text = "CONSUMER: JANE\nSTATUS\nTYPE: AUTO LOAN\nACCOUNT DATES\n\
                    STATUS\nTYPE: GOLD LOAN\nCLOSED: 01-01-2024\n";
        let (records, issues) = parse(Dialect::ConsumerInline, text);
        assert_eq!(records.len(), 2);

        let gold = &records[1];
        assert_eq!(gold.sequence, 2);
        assert_eq!(gold.account_type.as_deref(), Some("GOLD LOAN"));
        assert_eq!(gold.status, AccountStatus::Closed);

        let deviations: Vec<_> = issues
            .iter()
            .filter(|i| matches!(i, Issue::LayoutDeviation { .. }))
            .collect();
        assert_eq!(
            deviations,
            vec![&Issue::LayoutDeviation {
                section: "STATUS".to_string(),
                detail: "record 2: no terminator, block runs to end of text".to_string(),
            }]
        );
    }

    #[test]
    fn test_inline_block_cut_at_next_anchor_is_flagged() {
        let text = "STATUS\nTYPE: AUTO LOAN\nSTATUS\nTYPE: HOME LOAN\nACCOUNT DATES\n";
        let (records, issues) = parse(Dialect::ConsumerInline, text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].account_type.as_deref(), Some("AUTO LOAN"));
        assert_eq!(records[1].account_type.as_deref(), Some("HOME LOAN"));
        assert!(issues.contains(&Issue::LayoutDeviation {
            section: "STATUS".to_string(),
            detail: "record 1: no terminator before the next anchor".to_string(),
        }));
    }

    #[test]
    fn test_inline_consumer_dpd_scan() {
        let text = "STATUS\nTYPE: AUTO LOAN\nCLOSED: \nDAYS PAST DUE/ASSET CLASSIFICATION\n000 060 030\nACCOUNT DATES";
        let (records, _) = parse(Dialect::ConsumerInline, text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].max_dpd, 60);
        assert_eq!(records[0].status, AccountStatus::Active);
    }
}
