//! Local unit number extraction.

use super::patterns::UNIT_KEYWORDS;
use super::{LineFact, LineRule, first_digit_run};
use crate::error::ExtractionError;

/// Reads the unit number from a line naming a unit type.
///
/// Keywords are case-sensitive; the number is the first digit run anywhere in
/// the line, which need not follow the keyword.
pub struct UnitNumberRule;

impl UnitNumberRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnitNumberRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRule for UnitNumberRule {
    fn name(&self) -> &'static str {
        "unit_number"
    }

    fn classify(&self, line: &str) -> Result<Option<LineFact>, ExtractionError> {
        if !UNIT_KEYWORDS.iter().any(|k| line.contains(k)) {
            return Ok(None);
        }
        Ok(first_digit_run(line).map(|digits| LineFact::UnitNumber(digits.to_string())))
    }
}
