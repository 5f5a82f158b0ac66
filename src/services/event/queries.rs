use super::shared::{date_param, map_event_row, EVENT_COLUMNS};
use super::EventCache;
use crate::models::event::Event;
use anyhow::Result;
use chrono::NaiveDate;

impl<'a> EventCache<'a> {
    /// Every cached event, ordered by date and start time.
    pub fn list_all(&self) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events ORDER BY date ASC, start_time ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map([], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Events flagged by [`EventCache::mark_unsynced`].
    pub fn list_unsynced(&self) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events WHERE pending_sync = 1 ORDER BY date ASC, start_time ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map([], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Events dated from `start` to `end`, both inclusive.
    pub fn find_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date ASC, start_time ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map([date_param(start), date_param(end)], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    pub fn find_by_calendar(&self, calendar_id: &str) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events WHERE calendar_id = ?1 ORDER BY date ASC, start_time ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map([calendar_id], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
