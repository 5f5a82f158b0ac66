use chrono::NaiveDate;
use serde::Serialize;

use super::{Attendee, Event, EventLocation, EventStatus, Reminder};
use crate::models::recurrence::RepeatFrequency;
use crate::utils::time::ClockTime;

/// Partial update for an event.
///
/// `None` leaves a field untouched. Nullable fields use a nested option:
/// `Some(None)` clears the value and is sent to the API as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<Reminder>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<EventLocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,
}

impl EventPatch {
    /// Patch produced by a drag or resize: new date and times.
    pub fn reschedule(date: NaiveDate, start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            date: Some(date),
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a copy of `event` and validate the result.
    pub fn applied_to(&self, event: &Event) -> Result<Event, String> {
        let mut updated = event.clone();
        self.apply(&mut updated);
        updated.validate()?;
        Ok(updated)
    }

    pub fn apply(&self, event: &mut Event) {
        if let Some(ref title) = self.title {
            event.title = title.trim().to_string();
        }
        if let Some(ref description) = self.description {
            event.description = description.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(start) = self.start_time {
            event.start_time = start;
        }
        if let Some(end) = self.end_time {
            event.end_time = end;
        }
        if let Some(all_day) = self.all_day {
            event.all_day = all_day;
        }
        if let Some(ref color) = self.color {
            event.color = color.clone();
        }
        if let Some(repeat) = self.repeat {
            event.repeat = repeat;
        }
        if let Some(end) = self.repeat_end_date {
            event.repeat_end_date = end;
        }
        if let Some(ref reminders) = self.reminders {
            event.reminders = reminders.clone();
        }
        if let Some(ref attendees) = self.attendees {
            event.attendees = attendees.clone();
        }
        if let Some(ref location) = self.location {
            event.location = location.clone();
        }
        if let Some(is_private) = self.is_private {
            event.is_private = is_private;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(ref url) = self.url {
            event.url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(value: &str) -> ClockTime {
        value.parse().unwrap()
    }

    fn sample() -> Event {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut event = Event::new("Meeting", date, t("09:00"), t("10:00"), "default").unwrap();
        event.description = Some("agenda".to_string());
        event
    }

    #[test]
    fn test_only_set_fields_are_serialized() {
        let patch = EventPatch {
            title: Some("Renamed".to_string()),
            description: Some(None),
            ..EventPatch::default()
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Renamed", "description": null }));
    }

    #[test]
    fn test_apply_clears_nullable_field() {
        let mut event = sample();
        EventPatch {
            description: Some(None),
            ..EventPatch::default()
        }
        .apply(&mut event);
        assert!(event.description.is_none());
    }

    #[test]
    fn test_apply_leaves_untouched_fields() {
        let event = sample();
        let updated = EventPatch {
            title: Some("Renamed".to_string()),
            ..EventPatch::default()
        }
        .applied_to(&event)
        .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description, event.description);
        assert_eq!(updated.start_time, event.start_time);
    }

    #[test]
    fn test_applied_to_rejects_inverted_times() {
        let event = sample();
        let patch = EventPatch {
            start_time: Some(t("11:00")),
            ..EventPatch::default()
        };
        assert!(patch.applied_to(&event).is_err());
    }

    #[test]
    fn test_reschedule_and_is_empty() {
        assert!(EventPatch::default().is_empty());
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let patch = EventPatch::reschedule(date, t("13:00"), t("14:00"));
        assert!(!patch.is_empty());
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["date"], "2024-01-02");
        assert_eq!(json["startTime"], "13:00");
    }
}
