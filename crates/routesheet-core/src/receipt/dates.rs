//! Effective and expiration date policy for charter renewals.

use chrono::{Datelike, Duration, NaiveDate};

/// Renewals take effect on the first day of the month they are processed in.
pub fn first_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// A charter runs 365 days, inclusive of the effective date.
pub fn expiration_for(effective_date: NaiveDate) -> NaiveDate {
    effective_date + Duration::days(365) - Duration::days(1)
}
