//! Charter renewal quantity extraction.

use super::patterns::{CHARTER_RENEWAL, UNIT_CHARTER};
use super::{LineFact, LineRule, first_digit_run, parse_quantity};
use crate::error::ExtractionError;

/// OCR reads a renewal count of "1" next to "Unit Charter" as "100".
const MISREAD_UNIT_CHARTER_QUANTITY: u64 = 100;

/// Reads the renewal quantity from "Charter Renewal" / "Unit Charter" lines.
pub struct CharterRenewalRule;

impl CharterRenewalRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CharterRenewalRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRule for CharterRenewalRule {
    fn name(&self) -> &'static str {
        "charter_renewal"
    }

    fn classify(&self, line: &str) -> Result<Option<LineFact>, ExtractionError> {
        let unit_charter = line.contains(UNIT_CHARTER);
        if !unit_charter && !line.contains(CHARTER_RENEWAL) {
            return Ok(None);
        }
        let Some(digits) = first_digit_run(line) else {
            return Ok(None);
        };

        let mut quantity = parse_quantity(line, digits)?;
        if unit_charter && quantity == MISREAD_UNIT_CHARTER_QUANTITY {
            quantity = 1;
        }
        Ok(Some(LineFact::CharterRenewal(quantity)))
    }
}
