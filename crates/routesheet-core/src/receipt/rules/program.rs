//! Program type detection.

use super::{LineFact, LineRule};
use crate::error::ExtractionError;
use crate::models::record::Program;

/// Program cascade: (program name, unit-type keyword, program).
///
/// Names match ignoring case, keywords match exactly. Earlier rows win.
const CASCADE: [(&str, &str, Program); 5] = [
    ("scouts bsa", "Troop", Program::ScoutsBsa),
    ("cub scouts", "Pack", Program::CubScouts),
    ("venturing", "Crew", Program::Venturing),
    ("sea scouts", "Ship", Program::SeaScouts),
    ("exploring", "Post", Program::Exploring),
];

/// Identifies the unit's program from its name or unit-type keyword.
pub struct ProgramRule;

impl ProgramRule {
    pub fn new() -> Self {
        Self
    }

    pub fn find(&self, line: &str) -> Option<Program> {
        let lowered = line.to_lowercase();
        CASCADE
            .iter()
            .find(|(name, keyword, _)| lowered.contains(name) || line.contains(keyword))
            .map(|(_, _, program)| *program)
    }
}

impl Default for ProgramRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRule for ProgramRule {
    fn name(&self) -> &'static str {
        "program"
    }

    fn classify(&self, line: &str) -> Result<Option<LineFact>, ExtractionError> {
        Ok(self.find(line).map(LineFact::Program))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_maps_to_program() {
        let rule = ProgramRule::new();
        assert_eq!(rule.find("Troop 12"), Some(Program::ScoutsBsa));
        assert_eq!(rule.find("Pack 12"), Some(Program::CubScouts));
        assert_eq!(rule.find("Crew 12"), Some(Program::Venturing));
        assert_eq!(rule.find("Ship 12"), Some(Program::SeaScouts));
        assert_eq!(rule.find("Post 12"), Some(Program::Exploring));
    }

    #[test]
    fn test_program_name_ignores_case() {
        let rule = ProgramRule::new();
        assert_eq!(rule.find("CUB SCOUTS renewal"), Some(Program::CubScouts));
        assert_eq!(rule.find("sea scouts"), Some(Program::SeaScouts));
    }

    #[test]
    fn test_unit_keyword_is_case_sensitive() {
        assert_eq!(ProgramRule::new().find("CREW 12"), None);
    }

    #[test]
    fn test_first_branch_wins() {
        // "Pack" appears, but the Scouts BSA row is checked first.
        assert_eq!(
            ProgramRule::new().find("Pack 3 joins Scouts BSA"),
            Some(Program::ScoutsBsa)
        );
        assert_eq!(
            ProgramRule::new().find("Exploring Post with a Crew"),
            Some(Program::Venturing)
        );
    }
}
