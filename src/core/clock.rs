use crate::utils::error::{FarmError, Result};
use chrono::{Days, NaiveDate};

/// The day after `date`.
pub fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| FarmError::InvalidDate {
            message: format!("cannot advance the calendar past {}", date),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_day_crosses_month_and_year() {
        let d = NaiveDate::from_ymd_opt(2024, 10, 31).unwrap();
        assert_eq!(next_day(d).unwrap(), NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());

        let d = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(next_day(d).unwrap(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_next_day_leap_year() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(next_day(d).unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_next_day_at_max_date_fails() {
        assert!(next_day(NaiveDate::MAX).is_err());
    }
}
