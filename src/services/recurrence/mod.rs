//! Recurrence expansion.
//!
//! A recurring event is stored as a series of concrete occurrences that share
//! a `repeat_id`. Dates are produced by stepping from the *previous*
//! occurrence, so a month-end clamp carries forward:
//! `2024-01-31`, `2024-02-29`, `2024-03-29`, ...

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::event::{new_event_id, Event};
use crate::models::recurrence::RepeatFrequency;

mod step;

/// Occurrences created for a new recurring event.
pub const DEFAULT_OCCURRENCE_COUNT: usize = 10;

/// Generate `count` dates starting at `start`.
///
/// [`RepeatFrequency::None`] always yields exactly `[start]`. No end date is
/// applied here; see [`filter_until`].
///
/// # Examples
/// ```
/// use calendar_planner::models::recurrence::RepeatFrequency;
/// use calendar_planner::services::recurrence::generate_repeat_dates;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let dates = generate_repeat_dates(start, RepeatFrequency::Weekly, 3);
/// assert_eq!(dates[2], NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
/// ```
pub fn generate_repeat_dates(
    start: NaiveDate,
    frequency: RepeatFrequency,
    count: usize,
) -> Vec<NaiveDate> {
    if !frequency.is_recurring() {
        return vec![start];
    }

    let mut dates = Vec::with_capacity(count);
    let mut current = Some(start);
    while dates.len() < count {
        let Some(date) = current else {
            log::warn!("Recurrence from {} ran out of representable dates", start);
            break;
        };
        dates.push(date);
        current = step::advance(date, frequency);
    }
    dates
}

/// Keep the dates on or before `until`. `None` keeps everything.
pub fn filter_until(dates: Vec<NaiveDate>, until: Option<NaiveDate>) -> Vec<NaiveDate> {
    match until {
        Some(end) => dates.into_iter().filter(|date| *date <= end).collect(),
        None => dates,
    }
}

/// Expand `template` into the concrete events of its series.
///
/// Each occurrence gets a fresh id and the same new `repeat_id`; occurrences
/// after `repeat_end_date` are dropped. A non-recurring template comes back
/// unchanged as a single event.
pub fn expand_series(template: &Event, count: usize) -> Vec<Event> {
    if !template.is_recurring() {
        return vec![template.clone()];
    }

    let series_id = Uuid::new_v4().to_string();
    let dates = filter_until(
        generate_repeat_dates(template.date, template.repeat, count),
        template.repeat_end_date,
    );

    log::debug!(
        "Expanding '{}' ({}) into {} occurrences",
        template.title,
        template.repeat,
        dates.len()
    );

    dates
        .into_iter()
        .map(|date| Event {
            id: new_event_id(),
            date,
            repeat_id: Some(series_id.clone()),
            ..template.clone()
        })
        .collect()
}

/// The other occurrences of the series `base` belongs to.
///
/// Occurrences are matched by `repeat_id`. Events created without one are
/// matched on their schedule and content instead (title, times, calendar,
/// description, color, all-day flag and frequency).
pub fn related_series_events<'a>(events: &'a [Event], base: &Event) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| event.id != base.id)
        .filter(|event| match base.repeat_id {
            Some(ref series) => event.repeat_id.as_deref() == Some(series.as_str()),
            None => same_series_content(event, base),
        })
        .collect()
}

fn same_series_content(a: &Event, b: &Event) -> bool {
    a.title == b.title
        && a.start_time == b.start_time
        && a.end_time == b.end_time
        && a.calendar_id == b.calendar_id
        && a.description == b.description
        && a.color == b.color
        && a.all_day == b.all_day
        && a.repeat == b.repeat
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn template(repeat: RepeatFrequency) -> Event {
        Event::builder()
            .title("Gym")
            .date(d(2024, 1, 1))
            .start_time("07:00".parse().unwrap())
            .end_time("08:00".parse().unwrap())
            .calendar_id("personal")
            .repeat(repeat)
            .build()
            .unwrap()
    }

    #[test]
    fn test_none_returns_start_only() {
        let start = d(2024, 3, 10);
        assert_eq!(generate_repeat_dates(start, RepeatFrequency::None, 10), vec![start]);
        assert_eq!(generate_repeat_dates(start, RepeatFrequency::None, 0), vec![start]);
    }

    #[test]
    fn test_daily_five() {
        let dates = generate_repeat_dates(d(2024, 1, 30), RepeatFrequency::Daily, 5);
        assert_eq!(
            dates,
            vec![d(2024, 1, 30), d(2024, 1, 31), d(2024, 2, 1), d(2024, 2, 2), d(2024, 2, 3)]
        );
    }

    #[test]
    fn test_weekly_three() {
        let dates = generate_repeat_dates(d(2024, 1, 1), RepeatFrequency::Weekly, 3);
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 8), d(2024, 1, 15)]);
    }

    #[test]
    fn test_monthly_clamp_carries_forward() {
        let dates = generate_repeat_dates(d(2024, 1, 31), RepeatFrequency::Monthly, 4);
        assert_eq!(
            dates,
            vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 29), d(2024, 4, 29)]
        );
    }

    #[test]
    fn test_yearly_from_leap_day() {
        let dates = generate_repeat_dates(d(2024, 2, 29), RepeatFrequency::Yearly, 3);
        assert_eq!(dates, vec![d(2024, 2, 29), d(2025, 2, 28), d(2026, 2, 28)]);
    }

    #[test]
    fn test_zero_count_recurring_is_empty() {
        assert!(generate_repeat_dates(d(2024, 1, 1), RepeatFrequency::Daily, 0).is_empty());
    }

    #[test]
    fn test_filter_until() {
        let dates = generate_repeat_dates(d(2024, 1, 1), RepeatFrequency::Daily, 10);
        let kept = filter_until(dates, Some(d(2024, 1, 3)));
        assert_eq!(kept, vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)]);
    }

    #[test]
    fn test_expand_series_shares_repeat_id() {
        let series = expand_series(&template(RepeatFrequency::Weekly), DEFAULT_OCCURRENCE_COUNT);
        assert_eq!(series.len(), DEFAULT_OCCURRENCE_COUNT);

        let repeat_id = series[0].repeat_id.clone().unwrap();
        assert!(series.iter().all(|e| e.repeat_id.as_deref() == Some(repeat_id.as_str())));
        assert_eq!(series[9].date, d(2024, 3, 4));

        let ids: HashSet<&str> = series.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), series.len());
    }

    #[test]
    fn test_expand_series_respects_repeat_end_date() {
        let mut event = template(RepeatFrequency::Daily);
        event.repeat_end_date = Some(d(2024, 1, 4));
        assert_eq!(expand_series(&event, DEFAULT_OCCURRENCE_COUNT).len(), 4);
    }

    #[test]
    fn test_expand_non_recurring_is_identity() {
        let event = template(RepeatFrequency::None);
        assert_eq!(expand_series(&event, DEFAULT_OCCURRENCE_COUNT), vec![event]);
    }

    #[test]
    fn test_related_by_repeat_id() {
        let series = expand_series(&template(RepeatFrequency::Daily), 3);
        let mut unrelated = template(RepeatFrequency::Daily);
        unrelated.repeat_id = Some("other".to_string());

        let mut all = series.clone();
        all.push(unrelated);

        let related = related_series_events(&all, &series[1]);
        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|e| e.id != series[1].id));
    }

    #[test]
    fn test_related_by_content_without_repeat_id() {
        let base = template(RepeatFrequency::Daily);
        let mut sibling = template(RepeatFrequency::Daily);
        sibling.date = d(2024, 1, 2);
        let mut different = template(RepeatFrequency::Daily);
        different.title = "Swim".to_string();

        let all = vec![base.clone(), sibling.clone(), different];
        let related = related_series_events(&all, &base);
        assert_eq!(related, vec![&sibling]);
    }
}
