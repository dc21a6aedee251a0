//! Maps a receipt record onto the route sheet template's fixed cells.

use chrono::NaiveDate;

use super::{RouteSheet, SheetCell};
use crate::models::record::{FeeCategory, ReceiptRecord};

/// Date format used inside the sheet.
pub const SHEET_DATE_FORMAT: &str = "%m/%d/%Y";

/// First row of the price block; categories follow in `FeeCategory::ALL` order.
const FIRST_PRICE_ROW: usize = 8;

const UNIT_TYPES: [(&str, &str); 7] = [
    ("Scouts BSA", "Troop"),
    ("Cub Scouts", "Pack"),
    ("Venturing", "Crew"),
    ("Sea Scouts", "Ship"),
    ("Exploring", "Post"),
    ("District", "Non-Unit"),
    ("Council", "Non-Unit"),
];

/// Unit type written to E4 for a program name.
pub fn unit_type_for(program: &str) -> &'static str {
    UNIT_TYPES
        .iter()
        .find(|(name, _)| *name == program)
        .map(|(_, unit_type)| *unit_type)
        .unwrap_or("Unknown")
}

/// Format a date as `MM/DD/YYYY`.
pub fn format_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FORMAT).to_string()
}

/// `Route_Sheet_<district>_<unit>_<MM-DD-YYYY>.xlsx`
pub fn output_file_name(record: &ReceiptRecord) -> String {
    let district = record
        .district_name()
        .map(|name| name.replace(' ', "_"))
        .unwrap_or_else(|| "Unknown".to_string());
    let unit = record.local_unit_number().unwrap_or("Unknown");
    let date = record.effective_date().format("%m-%d-%Y");
    format!("Route_Sheet_{}_{}_{}.xlsx", district, unit, date)
}

/// Project a record onto the template's cells.
pub fn project(record: &ReceiptRecord) -> RouteSheet {
    let program = record.program().map(|p| p.as_str());

    let mut cells = vec![
        SheetCell::text("B4", program.unwrap_or("Unknown Program")),
        SheetCell::text("C4", record.council_number()),
        match record.district_number() {
            Some(number) => SheetCell::number("D4", number),
            None => SheetCell::text("D4", "N/A"),
        },
        SheetCell::text("E4", unit_type_for(program.unwrap_or(""))),
        SheetCell::text("G4", record.local_unit_number().unwrap_or("N/A")),
        SheetCell::text("H4", format_sheet_date(record.effective_date())),
        SheetCell::text("I4", record.term()),
        SheetCell::text("J4", format_sheet_date(record.expiration_date())),
    ];

    cells.extend(FeeCategory::ALL.iter().enumerate().map(|(i, &category)| {
        SheetCell::number(
            format!("C{}", FIRST_PRICE_ROW + i),
            record.prices().get(category) as f64,
        )
    }));

    RouteSheet {
        cells,
        file_name: output_file_name(record),
    }
}
