//! Field extraction over a single section.

use tracing::trace;

use super::rules::{ConditionalRule, ExtractionRule};
use crate::models::config::MatchOccurrence;
use crate::models::report::{FieldRecord, FieldValue};

/// Applies a dialect's rules to one section.
///
/// The base pass applies every rule independently and records each field
/// as found or not found. Conditional rules are then evaluated against the
/// base record of the same section only.
pub struct FieldExtractor<'r> {
    rules: &'r [&'static ExtractionRule],
    conditionals: &'r [&'static ConditionalRule],
    occurrence: MatchOccurrence,
}

impl<'r> FieldExtractor<'r> {
    pub fn new(
        rules: &'r [&'static ExtractionRule],
        conditionals: &'r [&'static ConditionalRule],
        occurrence: MatchOccurrence,
    ) -> Self {
        Self {
            rules,
            conditionals,
            occurrence,
        }
    }

    pub fn extract(&self, section: &str) -> FieldRecord {
        let mut record = FieldRecord::new();

        for rule in self.rules {
            // Several rules may target one field (one per dialect); keep the first hit.
            if record.get(rule.field).is_some_and(FieldValue::is_found) {
                continue;
            }
            let value = match rule.capture(section, self.occurrence) {
                Some(value) => FieldValue::Found(value),
                None => FieldValue::NotFound,
            };
            record.set(rule.field, value);
        }

        let triggered: Vec<&ConditionalRule> = self
            .conditionals
            .iter()
            .copied()
            .filter(|c| c.triggered(&record))
            .collect();

        for conditional in triggered {
            if let Some(value) = conditional.rule.capture(section, self.occurrence) {
                trace!("Conditional rule re-selected '{}'", conditional.rule.field);
                record.set(conditional.rule.field, FieldValue::Found(value));
            } else if record.get(conditional.rule.field).is_none() {
                record.set(conditional.rule.field, FieldValue::NotFound);
            }
        }

        record
    }
}
