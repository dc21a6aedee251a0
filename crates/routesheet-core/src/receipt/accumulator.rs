//! Folds per-line facts into a receipt record.

use chrono::NaiveDate;
use tracing::debug;

use super::classifier::LineClassifier;
use super::rules::LineFact;
use crate::error::ExtractionError;
use crate::models::config::ReceiptConfig;
use crate::models::record::{FeeCategory, ReceiptRecord};

/// Builds a [`ReceiptRecord`] from OCR lines in reading order.
///
/// Scalar fields take the value from the last line that sets them; fee
/// counters add up across lines.
pub struct RecordAccumulator {
    classifier: LineClassifier,
    record: ReceiptRecord,
}

impl RecordAccumulator {
    /// Start an empty record effective from `effective_date`.
    pub fn new(receipt: &ReceiptConfig, effective_date: NaiveDate) -> Self {
        Self::with_classifier(LineClassifier::new(), receipt, effective_date)
    }

    pub fn with_classifier(
        classifier: LineClassifier,
        receipt: &ReceiptConfig,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            classifier,
            record: ReceiptRecord::new(&receipt.council_number, &receipt.term, effective_date),
        }
    }

    /// Classify one raw line and fold its facts.
    pub fn push_line(&mut self, line: &str) -> Result<(), ExtractionError> {
        let line = line.trim();
        for fact in self.classifier.classify(line)? {
            self.apply(fact)?;
        }
        Ok(())
    }

    /// Fold every line of a sequence in order.
    pub fn push_lines<'a, I>(&mut self, lines: I) -> Result<(), ExtractionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            self.push_line(line)?;
        }
        Ok(())
    }

    /// Fold a single fact.
    pub fn apply(&mut self, fact: LineFact) -> Result<(), ExtractionError> {
        match fact {
            LineFact::District(district) => {
                debug!("Matched district: {} ({})", district.name, district.number);
                self.record.set_district(district);
            }
            LineFact::UnitNumber(unit) => {
                debug!("Matched local unit number: {}", unit);
                self.record.set_local_unit_number(unit);
            }
            LineFact::Program(program) => {
                debug!("Matched program: {}", program);
                self.record.set_program(program);
            }
            LineFact::CharterRenewal(quantity) => {
                debug!("Charter renewal captured: {}", quantity);
                self.record
                    .prices_mut()
                    .add(FeeCategory::CharterRenewal, quantity)?;
                self.record.set_charter_renewal(quantity);
            }
            LineFact::PricedItem { category, quantity } => {
                debug!("Matched price line: {} ({})", category, quantity);
                self.record.prices_mut().add(category, quantity)?;
            }
        }
        Ok(())
    }

    /// Current state of the record.
    pub fn record(&self) -> &ReceiptRecord {
        &self.record
    }

    /// Finish and return the record.
    pub fn finish(self) -> ReceiptRecord {
        self.record
    }
}

/// Build a record from a full line sequence.
pub fn accumulate<'a, I>(
    lines: I,
    receipt: &ReceiptConfig,
    effective_date: NaiveDate,
) -> Result<ReceiptRecord, ExtractionError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut accumulator = RecordAccumulator::new(receipt, effective_date);
    accumulator.push_lines(lines)?;
    Ok(accumulator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Program;
    use pretty_assertions::assert_eq;

    fn effective() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn run(lines: &[&str]) -> ReceiptRecord {
        accumulate(lines.iter().copied(), &ReceiptConfig::default(), effective()).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let record = run(&["Calumet District", "Troop 123", "5 Youth Renewal", "Charter Renewal 2"]);

        assert_eq!(record.district_name(), Some("Calumet"));
        assert_eq!(record.district_number(), Some(1));
        assert_eq!(record.local_unit_number(), Some("123"));
        assert_eq!(record.program(), Some(Program::ScoutsBsa));
        assert_eq!(record.prices()[FeeCategory::YouthRegistration], 5);
        assert_eq!(record.prices()[FeeCategory::CharterRenewal], 2);
        assert_eq!(record.charter_renewal(), Some(2));
        assert_eq!(record.council_number(), "456");
        assert_eq!(record.term(), "12 months");
        assert_eq!(record.expiration_date(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_every_price_key_present() {
        for lines in [&[][..], &["garbage"][..], &["3 Youth BL", "Unit Charter 100"][..]] {
            let record = run(lines);
            assert_eq!(record.prices().iter().count(), FeeCategory::ALL.len());
        }
    }

    #[test]
    fn test_fold_is_repeatable() {
        let lines = ["Aguila", "Pack 88", "2 Adult New", "4 Youth BL", "Unit Charter 100"];
        assert_eq!(run(&lines), run(&lines));
    }

    #[test]
    fn test_last_district_wins() {
        let record = run(&["Thunderbird District", "Iron Horse District"]);
        assert_eq!(record.district_name(), Some("Iron Horse"));
        assert_eq!(record.district_number(), Some(6));

        let record = run(&["Iron Horse District", "Thunderbird District"]);
        assert_eq!(record.district_name(), Some("Thunderbird"));
        assert_eq!(record.district_number(), Some(4));
    }

    #[test]
    fn test_later_lines_override_scalars() {
        let record = run(&["Troop 12", "Crew 900"]);
        assert_eq!(record.local_unit_number(), Some("900"));
        assert_eq!(record.program(), Some(Program::Venturing));
    }

    #[test]
    fn test_unmatched_lines_do_not_reset_fields() {
        let record = run(&["Tri-Star", "Post 5", "thank you for renewing", ""]);
        assert_eq!(record.district_name(), Some("Tri-Star"));
        assert_eq!(record.local_unit_number(), Some("5"));
        assert_eq!(record.program(), Some(Program::Exploring));
    }

    #[test]
    fn test_youth_renewal_sum() {
        let record = run(&["5 Youth Renewal", "7 Youth Renewal", "  11 youth renewal  "]);
        assert_eq!(record.prices()[FeeCategory::YouthRegistration], 23);
    }

    #[test]
    fn test_program_fee_from_both_labels() {
        let record = run(&["3 Youth Program Fee", "2 Adult Program Fee"]);
        assert_eq!(record.prices()[FeeCategory::ProgramFee], 5);
    }

    #[test]
    fn test_unit_charter_correction() {
        let record = run(&["Unit Charter 100"]);
        assert_eq!(record.charter_renewal(), Some(1));
        assert_eq!(record.prices()[FeeCategory::CharterRenewal], 1);

        let record = run(&["Charter Renewal 100"]);
        assert_eq!(record.charter_renewal(), Some(100));
        assert_eq!(record.prices()[FeeCategory::CharterRenewal], 100);
    }

    #[test]
    fn test_charter_scalar_and_counter_diverge() {
        let record = run(&["Charter Renewal 2", "Unit Charter 3"]);
        assert_eq!(record.charter_renewal(), Some(3));
        assert_eq!(record.prices()[FeeCategory::CharterRenewal], 5);
    }

    #[test]
    fn test_empty_receipt_keeps_optionals_unset() {
        let record = run(&[]);
        assert_eq!(record.district(), None);
        assert_eq!(record.local_unit_number(), None);
        assert_eq!(record.program(), None);
        assert_eq!(record.charter_renewal(), None);
        assert_eq!(record.prices().total(), 0);
    }

    #[test]
    fn test_long_charter_quantity_accumulates() {
        let record = run(&[
            "Calumet District",
            "Troop 123",
            "5 Youth Renewal",
            "Unit Charter Ref 20240301123",
            "4294967296 Youth BL",
        ]);
        assert_eq!(record.charter_renewal(), Some(20_240_301_123));
        assert_eq!(record.prices()[FeeCategory::CharterRenewal], 20_240_301_123);
        assert_eq!(record.prices()[FeeCategory::YouthSlSubscription], 4_294_967_296);
        assert_eq!(record.district_name(), Some("Calumet"));
        assert_eq!(record.local_unit_number(), Some("123"));
        assert_eq!(record.prices()[FeeCategory::YouthRegistration], 5);
    }

    #[test]
    fn test_counter_overflow_aborts() {
        let lines = ["18446744073709551615 Youth BL", "1 Youth BL"];
        let result = accumulate(lines.iter().copied(), &ReceiptConfig::default(), effective());
        assert!(matches!(result, Err(ExtractionError::CounterOverflow { .. })));
    }
}
