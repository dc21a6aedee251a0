//! Priced line items ("<count> <label>").

use super::patterns::PRICED_ITEM;
use super::{LineFact, LineRule, parse_quantity};
use crate::error::ExtractionError;
use crate::models::record::FeeCategory;

/// Reads counted registration and fee lines.
pub struct PricedItemRule;

impl PricedItemRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PricedItemRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Fee category for a matched item label.
pub fn category_for_label(label: &str) -> Option<FeeCategory> {
    let label = label.trim().to_lowercase();
    if label.contains("youth bl") {
        Some(FeeCategory::YouthSlSubscription)
    } else if label.contains("youth renewal") || label.contains("youth new") {
        Some(FeeCategory::YouthRegistration)
    } else if label.contains("adult renewal") || label.contains("adult new") {
        Some(FeeCategory::AdultRegistration)
    } else if label.contains("program fee") {
        Some(FeeCategory::ProgramFee)
    } else {
        None
    }
}

impl LineRule for PricedItemRule {
    fn name(&self) -> &'static str {
        "priced_item"
    }

    fn classify(&self, line: &str) -> Result<Option<LineFact>, ExtractionError> {
        let Some(caps) = PRICED_ITEM.captures(line) else {
            return Ok(None);
        };
        let Some(category) = category_for_label(&caps[2]) else {
            return Ok(None);
        };
        let quantity = parse_quantity(line, &caps[1])?;
        Ok(Some(LineFact::PricedItem { category, quantity }))
    }
}
