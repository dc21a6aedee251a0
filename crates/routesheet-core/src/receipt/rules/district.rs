//! District name matching.

use super::{LineFact, LineRule};
use crate::error::ExtractionError;
use crate::models::record::{DISTRICTS, District};

/// Matches district names anywhere in a line, ignoring case.
pub struct DistrictRule {
    /// Lowercased names paired with their table entry.
    needles: Vec<(String, District)>,
}

impl DistrictRule {
    pub fn new() -> Self {
        Self {
            needles: DISTRICTS
                .iter()
                .map(|d| (d.name.to_lowercase(), *d))
                .collect(),
        }
    }

    /// The matching district, preferring the later table entry when several match.
    pub fn find(&self, line: &str) -> Option<District> {
        let line = line.to_lowercase();
        self.needles
            .iter()
            .filter(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, district)| *district)
            .last()
    }
}

impl Default for DistrictRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRule for DistrictRule {
    fn name(&self) -> &'static str {
        "district"
    }

    fn classify(&self, line: &str) -> Result<Option<LineFact>, ExtractionError> {
        Ok(self.find(line).map(LineFact::District))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match() {
        let rule = DistrictRule::new();
        let d = rule.find("PRAIRIE DUNES DISTRICT").unwrap();
        assert_eq!((d.name, d.number), ("Prairie Dunes", 3));
    }

    #[test]
    fn test_non_contiguous_numbers() {
        let rule = DistrictRule::new();
        assert_eq!(rule.find("Five Creeks").unwrap().number, 9);
        assert_eq!(rule.find("tall grass").unwrap().number, 11);
        assert_eq!(rule.find("Trailblazer").unwrap().number, 12);
    }

    #[test]
    fn test_later_table_entry_wins_within_line() {
        let rule = DistrictRule::new();
        let d = rule.find("Calumet / Trailblazer joint roundtable").unwrap();
        assert_eq!(d.name, "Trailblazer");
        // Table order decides, not position in the line.
        let d = rule.find("Trailblazer and Calumet").unwrap();
        assert_eq!(d.name, "Trailblazer");
    }

    #[test]
    fn test_no_match() {
        let rule = DistrictRule::new();
        assert_eq!(rule.classify("Receipt #4411").unwrap(), None);
    }
}
