//! Per-line classification using an ordered list of rules.

use tracing::trace;

use super::rules::{
    CharterRenewalRule, DistrictRule, LineFact, LineRule, PricedItemRule, ProgramRule,
    UnitNumberRule,
};
use crate::error::ExtractionError;

/// Runs every rule against a line and collects their facts.
pub struct LineClassifier {
    rules: Vec<Box<dyn LineRule>>,
}

impl LineClassifier {
    /// Classifier with the standard renewal-receipt rules.
    pub fn new() -> Self {
        Self::with_rules(vec![
            Box::new(DistrictRule::new()),
            Box::new(UnitNumberRule::new()),
            Box::new(CharterRenewalRule::new()),
            Box::new(ProgramRule::new()),
            Box::new(PricedItemRule::new()),
        ])
    }

    /// Classifier with a custom rule list, applied in order.
    pub fn with_rules(rules: Vec<Box<dyn LineRule>>) -> Self {
        Self { rules }
    }

    /// Facts found in one line, in rule order.
    pub fn classify(&self, line: &str) -> Result<Vec<LineFact>, ExtractionError> {
        let mut facts = Vec::new();
        for rule in &self.rules {
            if let Some(fact) = rule.classify(line)? {
                trace!("{} matched {:?}: {:?}", rule.name(), line, fact);
                facts.push(fact);
            }
        }
        Ok(facts)
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}
