//! Age classification.
//!
//! # Invariants
//! - Age is a calendar period in whole years, truncated toward zero.
//! - Exactly 18 elapsed years classifies as adult.
//! - Unknown birth date classifies as an 18-year-old adult.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Age reported when a person has no birth date.
pub const DEFAULT_AGE_YEARS: i32 = 18;
/// First age (in whole years) that counts as adult.
pub const MAJORITY_AGE_YEARS: i32 = 18;

/// Result of classifying one birth date against a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeClassification {
    pub age_years: i32,
    pub is_minor: bool,
}

/// Classifies `birth_date` as of `today`.
///
/// Pure: same inputs always produce the same output.
pub fn classify(birth_date: Option<NaiveDate>, today: NaiveDate) -> AgeClassification {
    let age_years = match birth_date {
        Some(born) => whole_years_between(born, today),
        None => DEFAULT_AGE_YEARS,
    };

    AgeClassification {
        age_years,
        is_minor: age_years < MAJORITY_AGE_YEARS,
    }
}

/// Whole years in the calendar period `[start, end)`.
///
/// Partial months are dropped toward zero, so a start date after `end`
/// yields zero or a negative count instead of rounding away from zero.
fn whole_years_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let start_months = start.year() * 12 + start.month0() as i32;
    let end_months = end.year() * 12 + end.month0() as i32;
    let mut months = end_months - start_months;
    let days = end.day() as i32 - start.day() as i32;

    if months > 0 && days < 0 {
        months -= 1;
    } else if months < 0 && days > 0 {
        months += 1;
    }

    months / 12
}

#[cfg(test)]
mod tests {
    use super::{classify, whole_years_between, AgeClassification};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn missing_birth_date_defaults_to_adult() {
        assert_eq!(
            classify(None, date(2024, 1, 1)),
            AgeClassification {
                age_years: 18,
                is_minor: false
            }
        );
    }

    #[test]
    fn exactly_eighteen_is_adult() {
        let result = classify(Some(date(2006, 1, 1)), date(2024, 1, 1));
        assert_eq!(result.age_years, 18);
        assert!(!result.is_minor);
    }

    #[test]
    fn one_day_short_of_eighteen_is_minor() {
        let result = classify(Some(date(2006, 1, 2)), date(2024, 1, 1));
        assert_eq!(result.age_years, 17);
        assert!(result.is_minor);
    }

    #[test]
    fn reference_scenarios() {
        let today = date(2024, 1, 1);
        assert_eq!(classify(Some(date(1990, 5, 15)), today).age_years, 33);
        let minor = classify(Some(date(2010, 3, 20)), today);
        assert_eq!(minor.age_years, 13);
        assert!(minor.is_minor);
    }

    #[test]
    fn leap_day_birthday_counts_on_march_first() {
        assert_eq!(whole_years_between(date(2008, 2, 29), date(2026, 2, 28)), 17);
        assert_eq!(whole_years_between(date(2008, 2, 29), date(2026, 3, 1)), 18);
    }

    #[test]
    fn future_birth_date_truncates_toward_zero() {
        let result = classify(Some(date(2027, 5, 1)), date(2026, 10, 18));
        assert_eq!(result.age_years, 0);
        assert!(result.is_minor);
        assert_eq!(whole_years_between(date(2030, 1, 1), date(2026, 1, 1)), -4);
    }
}
