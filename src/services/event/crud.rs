use super::shared::{date_param, map_event_row, serialize_details, timestamp_param, EVENT_COLUMNS};
use super::EventCache;
use crate::models::event::Event;
use anyhow::{Context, Result};
use rusqlite::{self, params};

impl<'a> EventCache<'a> {
    /// Insert or overwrite the cached copy of an event.
    pub fn upsert(&self, event: &Event) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO events (
                    id, calendar_id, title, description, date, start_time, end_time,
                    all_day, color, repeat, repeat_id, repeat_end_date, details,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    event.id,
                    event.calendar_id,
                    event.title,
                    event.description,
                    date_param(event.date),
                    event.start_time.to_string(),
                    event.end_time.to_string(),
                    event.all_day as i32,
                    event.color,
                    event.repeat.as_str(),
                    event.repeat_id,
                    event.repeat_end_date.map(date_param),
                    serialize_details(event),
                    timestamp_param(event.created_at),
                    timestamp_param(event.updated_at),
                ],
            )
            .with_context(|| format!("Failed to cache event {}", event.id))?;

        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Event>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS),
            [id],
            map_event_row,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns whether a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?", [id])
            .context("Failed to delete cached event")?;
        Ok(removed > 0)
    }

    /// Flag a cached event as not yet accepted by the server.
    /// Cleared again by the next upsert of that event.
    pub fn mark_unsynced(&self, id: &str) -> Result<()> {
        self.conn
            .execute("UPDATE events SET pending_sync = 1 WHERE id = ?1", [id])
            .with_context(|| format!("Failed to flag event {} as unsynced", id))?;
        Ok(())
    }

    /// Swap the whole cache for `events` in one transaction.
    pub fn replace_all(&self, events: &[Event]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        EventCache::new(&tx).write_all(events, &[])?;
        tx.commit().context("Failed to commit cached events")?;
        Ok(())
    }

    /// Clear the table and write `events`, flagging the `unsynced` ids.
    /// Runs inside the caller's transaction.
    pub(crate) fn write_all(&self, events: &[Event], unsynced: &[&str]) -> Result<()> {
        self.conn
            .execute("DELETE FROM events", [])
            .context("Failed to clear cached events")?;
        for event in events {
            self.upsert(event)?;
        }
        for id in unsynced {
            self.mark_unsynced(id)?;
        }
        log::debug!("Cached {} events ({} unsynced)", events.len(), unsynced.len());
        Ok(())
    }
}
