//! Calendar-date helpers. Contract, leave and history fields are plain
//! Y-M-D values (`NaiveDate`), never instants, so they survive round-trips
//! through the database without timezone drift.

use chrono::{Months, NaiveDate, Utc};

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Adds whole calendar months, clamping to the last valid day of the
/// resulting month instead of rolling into the following one.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_overflow_clamps_to_last_day() {
        assert_eq!(add_months_clamped(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months_clamped(d(2023, 1, 31), 1), d(2023, 2, 28));
        assert_eq!(add_months_clamped(d(2024, 3, 31), 1), d(2024, 4, 30));
    }

    #[test]
    fn plain_addition_keeps_day() {
        assert_eq!(add_months_clamped(d(2024, 3, 15), 6), d(2024, 9, 15));
    }

    #[test]
    fn crosses_year_boundary() {
        assert_eq!(add_months_clamped(d(2024, 11, 30), 3), d(2025, 2, 28));
    }
}
