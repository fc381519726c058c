//! Placeholder dates for unknown birth and death dates
//!
//! Applied when loading source tables, before any stage runs. The stages
//! themselves never look at these values.

use chrono::{Datelike, NaiveDate};

/// Year used for every unknown date
pub const UNKNOWN_YEAR: i32 = 2199;

fn year_end(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// `2199-12-31`
pub fn unknown_date() -> NaiveDate {
    year_end(UNKNOWN_YEAR)
}

/// Fill in missing dates.
///
/// - unknown birth: birth becomes the unknown date
/// - unknown death, unknown birth: death becomes the unknown date
/// - unknown death, known birth: death becomes Dec 31 of birth year + `life_span_years`
pub fn fill_missing(
    birth: Option<NaiveDate>,
    death: Option<NaiveDate>,
    life_span_years: i32,
) -> (NaiveDate, NaiveDate) {
    match (birth, death) {
        (Some(b), Some(d)) => (b, d),
        (Some(b), None) => (b, year_end(b.year().saturating_add(life_span_years))),
        (None, Some(d)) => (unknown_date(), d),
        (None, None) => (unknown_date(), unknown_date()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_dates_untouched() {
        let (b, d) = fill_missing(Some(date(1850, 3, 4)), Some(date(1901, 7, 8)), 50);
        assert_eq!(b, date(1850, 3, 4));
        assert_eq!(d, date(1901, 7, 8));
    }

    #[test]
    fn test_missing_death_after_known_birth() {
        let (_, d) = fill_missing(Some(date(1850, 3, 4)), None, 50);
        assert_eq!(d, date(1900, 12, 31));
    }

    #[test]
    fn test_huge_life_span_saturates() {
        let (_, d) = fill_missing(Some(date(1900, 1, 1)), None, i32::MAX);
        assert_eq!(d, NaiveDate::MAX);
    }

    #[test]
    fn test_unknown_birth() {
        assert_eq!(fill_missing(None, None, 50), (date(2199, 12, 31), date(2199, 12, 31)));

        let (b, d) = fill_missing(None, Some(date(1920, 1, 1)), 50);
        assert_eq!(b, unknown_date());
        assert_eq!(d, date(1920, 1, 1));
    }
}
