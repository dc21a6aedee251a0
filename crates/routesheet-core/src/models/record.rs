//! Receipt record model: the structured result of reading one renewal receipt.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ExtractionError, RecordError};
use crate::receipt::dates::expiration_for;

/// ISO date layout used by the persisted record.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Fee categories printed on a route sheet.
///
/// Declaration order is the order of the route sheet rows (C8 to C18).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeeCategory {
    CharterRenewal,
    YouthRegistration,
    YouthSlSubscription,
    YouthTransfer,
    AdultRegistration,
    MultiplePositionChange,
    AdultTransfer,
    AdultSlSubscription,
    YouthExploring,
    AdultExploring,
    ProgramFee,
}

impl FeeCategory {
    /// All categories in route sheet order.
    pub const ALL: [FeeCategory; 11] = [
        FeeCategory::CharterRenewal,
        FeeCategory::YouthRegistration,
        FeeCategory::YouthSlSubscription,
        FeeCategory::YouthTransfer,
        FeeCategory::AdultRegistration,
        FeeCategory::MultiplePositionChange,
        FeeCategory::AdultTransfer,
        FeeCategory::AdultSlSubscription,
        FeeCategory::YouthExploring,
        FeeCategory::AdultExploring,
        FeeCategory::ProgramFee,
    ];

    /// Name used as the key in the persisted record.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeCategory::CharterRenewal => "Charter Renewal",
            FeeCategory::YouthRegistration => "Youth Registration",
            FeeCategory::YouthSlSubscription => "Youth SL Subscription",
            FeeCategory::YouthTransfer => "Youth Transfer",
            FeeCategory::AdultRegistration => "Adult Registration",
            FeeCategory::MultiplePositionChange => "Multiple/Position Change",
            FeeCategory::AdultTransfer => "Adult Transfer",
            FeeCategory::AdultSlSubscription => "Adult SL Subscription",
            FeeCategory::YouthExploring => "Youth Exploring",
            FeeCategory::AdultExploring => "Adult Exploring",
            FeeCategory::ProgramFee => "Program Fee",
        }
    }
}

impl fmt::Display for FeeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeCategory {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeeCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RecordError::UnknownCategory(s.to_string()))
    }
}

/// Per-category fee counts. Every category is always present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, u64>")]
pub struct Prices {
    counts: BTreeMap<FeeCategory, u64>,
}

impl Prices {
    /// Count for a category.
    pub fn get(&self, category: FeeCategory) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Add `quantity` to a category counter.
    pub fn add(&mut self, category: FeeCategory, quantity: u64) -> Result<(), ExtractionError> {
        let count = self.counts.entry(category).or_insert(0);
        *count = count
            .checked_add(quantity)
            .ok_or_else(|| ExtractionError::CounterOverflow {
                category: category.to_string(),
                quantity,
            })?;
        Ok(())
    }

    /// Iterate categories and counts in route sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (FeeCategory, u64)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }

    /// Sum of all counters, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0, |sum, n| sum.saturating_add(*n))
    }
}

impl Default for Prices {
    fn default() -> Self {
        Self {
            counts: FeeCategory::ALL.into_iter().map(|c| (c, 0)).collect(),
        }
    }
}

impl Index<FeeCategory> for Prices {
    type Output = u64;

    fn index(&self, category: FeeCategory) -> &u64 {
        self.counts.get(&category).unwrap_or(&0)
    }
}

impl TryFrom<BTreeMap<String, u64>> for Prices {
    type Error = RecordError;

    fn try_from(raw: BTreeMap<String, u64>) -> Result<Self, Self::Error> {
        let mut prices = Prices::default();
        for (name, count) in raw {
            let category: FeeCategory = name.parse()?;
            prices.counts.insert(category, count);
        }
        Ok(prices)
    }
}

impl Serialize for Prices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.as_str(), &count)?;
        }
        map.end()
    }
}

/// Scouting program a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    #[serde(rename = "Scouts BSA")]
    ScoutsBsa,
    #[serde(rename = "Cub Scouts")]
    CubScouts,
    #[serde(rename = "Venturing")]
    Venturing,
    #[serde(rename = "Sea Scouts")]
    SeaScouts,
    #[serde(rename = "Exploring")]
    Exploring,
}

impl Program {
    pub fn as_str(&self) -> &'static str {
        match self {
            Program::ScoutsBsa => "Scouts BSA",
            Program::CubScouts => "Cub Scouts",
            Program::Venturing => "Venturing",
            Program::SeaScouts => "Sea Scouts",
            Program::Exploring => "Exploring",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A council district with its fee-schedule number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct District {
    pub name: &'static str,
    pub number: u32,
}

/// Known districts, in matching order. Numbers 8 and 10 are retired.
pub const DISTRICTS: [District; 10] = [
    District { name: "Calumet", number: 1 },
    District { name: "Aguila", number: 2 },
    District { name: "Prairie Dunes", number: 3 },
    District { name: "Thunderbird", number: 4 },
    District { name: "Checaugau", number: 5 },
    District { name: "Iron Horse", number: 6 },
    District { name: "Tri-Star", number: 7 },
    District { name: "Five Creeks", number: 9 },
    District { name: "Tall Grass", number: 11 },
    District { name: "Trailblazer", number: 12 },
];

impl District {
    /// Look up a district by its exact table name.
    pub fn by_name(name: &str) -> Option<District> {
        DISTRICTS.iter().copied().find(|d| d.name == name)
    }
}

/// Structured data read from one renewal receipt.
///
/// Scalar fields are only changed through the receipt accumulator, and the
/// expiration date is always derived from the effective date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RecordFile", try_from = "RecordFile")]
pub struct ReceiptRecord {
    council_number: String,
    effective_date: NaiveDate,
    expiration_date: NaiveDate,
    term: String,
    district: Option<District>,
    local_unit_number: Option<String>,
    program: Option<Program>,
    charter_renewal: Option<u64>,
    prices: Prices,
}

impl ReceiptRecord {
    /// Create an empty record effective from `effective_date`.
    pub fn new(
        council_number: impl Into<String>,
        term: impl Into<String>,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            council_number: council_number.into(),
            effective_date,
            expiration_date: expiration_for(effective_date),
            term: term.into(),
            district: None,
            local_unit_number: None,
            program: None,
            charter_renewal: None,
            prices: Prices::default(),
        }
    }

    pub fn council_number(&self) -> &str {
        &self.council_number
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn district(&self) -> Option<District> {
        self.district
    }

    pub fn district_name(&self) -> Option<&'static str> {
        self.district.map(|d| d.name)
    }

    pub fn district_number(&self) -> Option<u32> {
        self.district.map(|d| d.number)
    }

    pub fn local_unit_number(&self) -> Option<&str> {
        self.local_unit_number.as_deref()
    }

    pub fn program(&self) -> Option<Program> {
        self.program
    }

    /// Quantity from the most recent charter renewal line.
    pub fn charter_renewal(&self) -> Option<u64> {
        self.charter_renewal
    }

    pub fn prices(&self) -> &Prices {
        &self.prices
    }

    pub(crate) fn set_district(&mut self, district: District) {
        self.district = Some(district);
    }

    pub(crate) fn set_local_unit_number(&mut self, unit: String) {
        self.local_unit_number = Some(unit);
    }

    pub(crate) fn set_program(&mut self, program: Program) {
        self.program = Some(program);
    }

    pub(crate) fn set_charter_renewal(&mut self, quantity: u64) {
        self.charter_renewal = Some(quantity);
    }

    pub(crate) fn prices_mut(&mut self) -> &mut Prices {
        &mut self.prices
    }
}

/// On-disk shape of a [`ReceiptRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RecordFile {
    council_number: String,
    effective_date: String,
    expiration_date: String,
    term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    district_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    district_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_unit_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    program: Option<Program>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    charter_renewal: Option<u64>,
    #[serde(default)]
    prices: Prices,
}

impl From<ReceiptRecord> for RecordFile {
    fn from(record: ReceiptRecord) -> Self {
        Self {
            council_number: record.council_number,
            effective_date: record.effective_date.format(ISO_DATE_FORMAT).to_string(),
            expiration_date: record.expiration_date.format(ISO_DATE_FORMAT).to_string(),
            term: record.term,
            district_name: record.district.map(|d| d.name.to_string()),
            district_number: record.district.map(|d| d.number),
            local_unit_number: record.local_unit_number,
            program: record.program,
            charter_renewal: record.charter_renewal,
            prices: record.prices,
        }
    }
}

impl TryFrom<RecordFile> for ReceiptRecord {
    type Error = RecordError;

    fn try_from(file: RecordFile) -> Result<Self, Self::Error> {
        let effective_date = parse_iso_date("effective_date", &file.effective_date)?;
        let stored_expiration = parse_iso_date("expiration_date", &file.expiration_date)?;

        let expiration_date = expiration_for(effective_date);
        if stored_expiration != expiration_date {
            tracing::warn!(
                "Stored expiration date {} does not match derived {}, using derived",
                stored_expiration,
                expiration_date
            );
        }

        let district = match (file.district_name, file.district_number) {
            (None, None) => None,
            (Some(name), number) => match District::by_name(&name) {
                Some(d) if number.is_none_or(|n| n == d.number) => Some(d),
                _ => return Err(RecordError::UnknownDistrict { name, number }),
            },
            (None, Some(number)) => {
                return Err(RecordError::UnknownDistrict {
                    name: String::new(),
                    number: Some(number),
                });
            }
        };

        Ok(Self {
            council_number: file.council_number,
            effective_date,
            expiration_date,
            term: file.term,
            district,
            local_unit_number: file.local_unit_number,
            program: file.program,
            charter_renewal: file.charter_renewal,
            prices: file.prices,
        })
    }
}

/// Parse a `YYYY-MM-DD` date, naming the offending field on failure.
pub fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).map_err(|_| RecordError::DateFormat {
        field,
        value: value.to_string(),
    })
}
