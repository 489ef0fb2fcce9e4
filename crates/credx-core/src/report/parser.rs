//! Report parser driving classification, segmentation and extraction.

use std::time::Instant;

use tracing::{debug, info};

use super::blocks::BlockParser;
use super::dispatcher::classify;
use super::fields::FieldExtractor;
use super::rules::{Cleanup, RuleSet, field};
use super::segment::section_between;
use super::tables::{parse_inquiry_table, parse_institution_table};
use super::{ReportParser, Result};
use crate::models::config::{ExtractionConfig, MatchOccurrence};
use crate::models::report::{
    ExtractionMetadata, FieldRecord, FieldValue, Issue, ReportDocument, ReportResult,
    ReportSummary,
};

/// Bureau report parser, one engine for every family and dialect.
#[derive(Debug, Clone, Default)]
pub struct BureauReportParser {
    config: ExtractionConfig,
}

impl BureauReportParser {
    /// Create a parser with default extraction policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given extraction policy.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set which occurrence of a repeated label a rule takes.
    pub fn with_occurrence(mut self, occurrence: MatchOccurrence) -> Self {
        self.config.occurrence = occurrence;
        self
    }

    /// Parse report text, keeping the source file name for export naming.
    pub fn parse_named(&self, text: &str, source_name: Option<&str>) -> Result<ReportResult> {
        let document = classify(text)?;
        Ok(self.extract(document, source_name))
    }

    /// Extract a classified document. Never fails: missing data is
    /// reported through [`ExtractionMetadata::issues`].
    pub fn extract(&self, document: ReportDocument<'_>, source_name: Option<&str>) -> ReportResult {
        let start = Instant::now();
        let text = document.text();
        let rules = RuleSet::for_dialect(document.dialect());
        let mut issues = Vec::new();

        info!(
            "Parsing {} report ({}) from {} characters of text",
            document.family(),
            document.dialect(),
            text.len()
        );

        let identity = self.extract_identity(text, &rules, &mut issues);

        let name = identity
            .found(field::NAME)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(rules.fallback_name)
            .to_string();
        let score = rules
            .score_field
            .and_then(|f| identity.found(f))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let facilities = BlockParser::new(&rules, &self.config).parse(text, &name, &mut issues);

        let summaries: Vec<_> = rules
            .summary_tables
            .iter()
            .filter_map(|table| parse_institution_table(text, table, &mut issues))
            .collect();

        let inquiries = rules
            .inquiries
            .and_then(|layout| parse_inquiry_table(text, &layout, &self.config, &mut issues));

        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Extracted {} facilities, {} summary tables, {} issues in {}ms",
            facilities.len(),
            summaries.len(),
            issues.len(),
            processing_time_ms
        );

        ReportResult {
            family: document.family(),
            dialect: document.dialect(),
            source_name: source_name.map(str::to_string),
            summary: ReportSummary { name, score },
            identity,
            summaries,
            facilities,
            inquiries,
            metadata: ExtractionMetadata {
                processing_time_ms: Some(processing_time_ms),
                issues,
            },
        }
    }

    fn extract_identity(&self, text: &str, rules: &RuleSet, issues: &mut Vec<Issue>) -> FieldRecord {
        let mut identity = FieldExtractor::new(
            &rules.identity_rules,
            &rules.identity_conditionals,
            self.config.occurrence,
        )
        .extract(text);

        for section in rules.identity_sections {
            let value = match section_between(text, section.start, section.ends) {
                Some(span) => FieldValue::Found(Cleanup::JoinLines.apply(span.as_str())),
                None => {
                    debug!("Identity section '{}' not found", section.start);
                    FieldValue::NotFound
                }
            };
            identity.set(section.field, value);
        }

        for name in identity.missing() {
            issues.push(Issue::FieldNotFound {
                field: name.to_string(),
                record: None,
            });
        }

        identity
    }
}

impl ReportParser for BureauReportParser {
    fn parse(&self, text: &str) -> Result<ReportResult> {
        self.parse_named(text, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::models::report::{Dialect, ReportFamily};

    #[test]
    fn test_unrecognized_format() {
        let parser = BureauReportParser::new();
        assert_eq!(
            parser.parse("Monthly newsletter").unwrap_err(),
            ExtractionError::UnrecognizedFormat
        );
    }

    #[test]
    fn test_fallback_name() {
        let parser = BureauReportParser::new();
        let result = parser.parse("CREDITVISION\nACCOUNT INFORMATION\n").unwrap();
        assert_eq!(result.family, ReportFamily::ConsumerBureau);
        assert_eq!(result.summary.name, "Unknown Individual");
        assert_eq!(result.summary.score, None);
        assert_eq!(result.facilities.len(), 1);
    }

    #[test]
    fn test_consumer_name_fallback_rule() {
        let parser = BureauReportParser::new();
        let result = parser
            .parse("CREDITVISION® SCORE: 781\nCONSUMER: JANE DOE\nSTATUS\nTYPE: GOLD LOAN\nENQUIRIES:")
            .unwrap();
        assert_eq!(result.dialect, Dialect::ConsumerInline);
        assert_eq!(result.summary.name, "JANE DOE");
        assert_eq!(result.summary.score.as_deref(), Some("781"));
        assert_eq!(result.facilities[0].borrower, "JANE DOE");
    }

    #[test]
    fn test_identity_section_joins_lines() {
        let parser = BureauReportParser::new();
        let text = "CRIF HM\nName: ACME TRADERS\nRegistered: 12 MG Road\nBengaluru 560001\nGSTIN: 29AAA\n";
        let result = parser.parse_named(text, Some("acme.pdf")).unwrap();
        assert_eq!(
            result.identity.found(field::REGISTERED_ADDRESS),
            Some("12 MG Road Bengaluru 560001")
        );
        assert_eq!(result.summary.name, "ACME TRADERS");
        assert_eq!(result.source_name.as_deref(), Some("acme.pdf"));
    }

    #[test]
    fn test_missing_identity_fields_are_issues() {
        let parser = BureauReportParser::new();
        let result = parser.parse("CRIF HM\n").unwrap();
        assert!(result.metadata.issues.contains(&Issue::FieldNotFound {
            field: field::PAN.to_string(),
            record: None,
        }));
        assert_eq!(result.summary.name, "Unknown Entity");
    }
}
