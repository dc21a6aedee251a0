//! Regex patterns shared by the receipt line rules.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // First run of ASCII digits anywhere in a line
    pub static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();

    // Priced line item: "<count> <label>"
    pub static ref PRICED_ITEM: Regex = Regex::new(
        r"(?i)([0-9]+)\s+(Youth BL|Youth Renewal|Adult Renewal|Adult New|Youth Program Fee|Adult Program Fee)"
    ).unwrap();
}

/// Unit-type keywords, matched case-sensitively.
pub const UNIT_KEYWORDS: [&str; 5] = ["Troop", "Pack", "Crew", "Ship", "Post"];

/// Substring announcing a unit charter line; "100" after it is a misread "1".
pub const UNIT_CHARTER: &str = "Unit Charter";

/// Substring announcing a charter renewal line.
pub const CHARTER_RENEWAL: &str = "Charter Renewal";
