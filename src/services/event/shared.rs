use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{self, Result, Row};
use serde::{Deserialize, Serialize};

use crate::models::event::{Attendee, Event, EventLocation, EventStatus, Reminder};
use crate::utils::date::{format_date, parse_date};

pub(crate) const EVENT_COLUMNS: &str = "id, calendar_id, title, description, date, start_time,
    end_time, all_day, color, repeat, repeat_id, repeat_end_date, details, created_at, updated_at";

/// Event fields kept in the JSON `details` column.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct EventDetails {
    pub reminders: Vec<Reminder>,
    pub attendees: Vec<Attendee>,
    pub location: Option<EventLocation>,
    pub is_private: bool,
    pub status: EventStatus,
    pub url: Option<String>,
    pub is_owned: bool,
}

impl EventDetails {
    pub(crate) fn of(event: &Event) -> Self {
        Self {
            reminders: event.reminders.clone(),
            attendees: event.attendees.clone(),
            location: event.location.clone(),
            is_private: event.is_private,
            status: event.status,
            url: event.url.clone(),
            is_owned: event.is_owned,
        }
    }
}

pub(crate) fn serialize_details(event: &Event) -> String {
    serde_json::to_string(&EventDetails::of(event)).unwrap_or_else(|_| "{}".to_string())
}

pub(crate) fn map_event_row(row: &Row) -> Result<Event> {
    let details: EventDetails = serde_json::from_str(&row.get::<_, String>(12)?)
        .map_err(|e| conversion_error(12, e))?;

    Ok(Event {
        id: row.get(0)?,
        calendar_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        date: to_date(4, row.get(4)?)?,
        start_time: row
            .get::<_, String>(5)?
            .parse()
            .map_err(|e| conversion_error(5, e))?,
        end_time: row
            .get::<_, String>(6)?
            .parse()
            .map_err(|e| conversion_error(6, e))?,
        all_day: row.get::<_, i32>(7)? != 0,
        color: row.get(8)?,
        repeat: row
            .get::<_, String>(9)?
            .parse()
            .map_err(|e: String| conversion_error(9, e))?,
        repeat_id: row.get(10)?,
        repeat_end_date: row
            .get::<_, Option<String>>(11)?
            .map(|value| to_date(11, value))
            .transpose()?,
        reminders: details.reminders,
        attendees: details.attendees,
        location: details.location,
        is_private: details.is_private,
        status: details.status,
        url: details.url,
        is_owned: details.is_owned,
        created_at: to_timestamp(13, row.get(13)?)?,
        updated_at: to_timestamp(14, row.get(14)?)?,
    })
}

pub(crate) fn date_param(date: NaiveDate) -> String {
    format_date(date)
}

pub(crate) fn timestamp_param(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339())
}

fn to_date(index: usize, value: String) -> Result<NaiveDate> {
    parse_date(&value).map_err(|e| conversion_error(index, e))
}

pub(crate) fn to_timestamp(index: usize, value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| conversion_error(index, e))
        })
        .transpose()
}

pub(crate) fn conversion_error<E>(index: usize, error: E) -> rusqlite::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, error.into())
}
