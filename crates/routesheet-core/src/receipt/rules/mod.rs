//! Rule-based fact extractors for receipt lines.
//!
//! Each rule looks at a single trimmed line and knows nothing about the lines
//! around it. Rules are independent: a line may produce a fact from every rule.

pub mod charter;
pub mod district;
pub mod items;
pub mod patterns;
pub mod program;
pub mod unit;

pub use charter::CharterRenewalRule;
pub use district::DistrictRule;
pub use items::PricedItemRule;
pub use program::ProgramRule;
pub use unit::UnitNumberRule;

use crate::error::ExtractionError;
use crate::models::record::{District, FeeCategory, Program};

use patterns::DIGIT_RUN;

/// A typed fact read from one receipt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFact {
    /// The line names a district.
    District(District),
    /// The line names a unit and carries its number.
    UnitNumber(String),
    /// The line identifies the unit's program.
    Program(Program),
    /// The line is a charter renewal with this quantity.
    CharterRenewal(u64),
    /// The line is a priced item adding `quantity` to `category`.
    PricedItem { category: FeeCategory, quantity: u64 },
}

/// Trait for single-line fact extractors.
pub trait LineRule {
    /// Short rule name used in logs.
    fn name(&self) -> &'static str;

    /// Extract this rule's fact from a line, if the line matches.
    fn classify(&self, line: &str) -> Result<Option<LineFact>, ExtractionError>;
}

/// First run of digits in a line.
pub fn first_digit_run(line: &str) -> Option<&str> {
    DIGIT_RUN.find(line).map(|m| m.as_str())
}

/// Parse a digit run as a count.
pub(crate) fn parse_quantity(line: &str, digits: &str) -> Result<u64, ExtractionError> {
    digits
        .parse()
        .map_err(|_| ExtractionError::QuantityOutOfRange {
            line: line.to_string(),
            value: digits.to_string(),
        })
}
