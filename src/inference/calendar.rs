use chrono::{Datelike, NaiveDate};

/// Number of days in the calendar year of `date`
pub fn days_in_year(date: NaiveDate) -> u32 {
    if date.leap_year() { 366 } else { 365 }
}

/// Position of `date` within its own calendar year, in `[0, 1)`
///
/// January 1 is zero, the length of the year accounts for leap years.
pub fn year_fraction(date: NaiveDate) -> f64 {
    date.ordinal0() as f64 / days_in_year(date) as f64
}
