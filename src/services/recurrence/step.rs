use chrono::{Days, Months, NaiveDate};

use crate::models::recurrence::RepeatFrequency;

/// Advance `date` by one unit of `frequency`.
///
/// Month and year steps clamp to the last day of a shorter month
/// (`2024-01-31` + 1 month = `2024-02-29`). Returns `None` for
/// [`RepeatFrequency::None`] or when the result leaves chrono's range.
pub(super) fn advance(date: NaiveDate, frequency: RepeatFrequency) -> Option<NaiveDate> {
    match frequency {
        RepeatFrequency::None => None,
        RepeatFrequency::Daily => date.checked_add_days(Days::new(1)),
        RepeatFrequency::Weekly => date.checked_add_days(Days::new(7)),
        RepeatFrequency::Monthly => date.checked_add_months(Months::new(1)),
        RepeatFrequency::Yearly => date.checked_add_months(Months::new(12)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_advance_month_clamps() {
        assert_eq!(advance(d(2024, 1, 31), RepeatFrequency::Monthly), Some(d(2024, 2, 29)));
        assert_eq!(advance(d(2023, 1, 31), RepeatFrequency::Monthly), Some(d(2023, 2, 28)));
        assert_eq!(advance(d(2024, 12, 15), RepeatFrequency::Monthly), Some(d(2025, 1, 15)));
    }

    #[test]
    fn test_advance_year_from_leap_day() {
        assert_eq!(advance(d(2024, 2, 29), RepeatFrequency::Yearly), Some(d(2025, 2, 28)));
    }

    #[test]
    fn test_advance_none() {
        assert_eq!(advance(d(2024, 2, 29), RepeatFrequency::None), None);
    }
}
