//! Offline cache of calendars.
//!
//! Rows keep the order of the fetched list in a `position` column so the
//! default calendar stays first when the cache is loaded back.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::models::calendar::Calendar;
use crate::services::event::shared::{conversion_error, timestamp_param, to_timestamp};

const CALENDAR_COLUMNS: &str = "id, name, description, color, visible, is_default, owner,
    is_owned, settings, shared_with, is_archived, created_at, updated_at";

/// Calendar rows of the local cache database.
pub struct CalendarCache<'a> {
    conn: &'a Connection,
}

impl<'a> CalendarCache<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or overwrite a calendar, keeping its position if it exists.
    pub fn upsert(&self, calendar: &Calendar) -> Result<()> {
        let position: i64 = self
            .conn
            .query_row(
                "SELECT COALESCE(
                    (SELECT position FROM calendars WHERE id = ?1),
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM calendars)
                 )",
                [&calendar.id],
                |row| row.get(0),
            )
            .context("Failed to compute calendar position")?;
        self.write(calendar, position)
    }

    pub fn get(&self, id: &str) -> Result<Option<Calendar>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM calendars WHERE id = ?1", CALENDAR_COLUMNS),
            [id],
            map_calendar_row,
        );

        match result {
            Ok(calendar) => Ok(Some(calendar)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_all(&self) -> Result<Vec<Calendar>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM calendars ORDER BY position ASC",
            CALENDAR_COLUMNS
        ))?;

        let calendars = stmt
            .query_map([], map_calendar_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(calendars)
    }

    /// Delete a calendar; its cached events go with it.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM calendars WHERE id = ?1", [id])
            .context("Failed to delete cached calendar")?;
        Ok(removed > 0)
    }

    /// Swap the cached calendars for `calendars`, preserving their order.
    ///
    /// Cached events of calendars that are no longer present are removed
    /// by the foreign key cascade.
    pub fn replace_all(&self, calendars: &[Calendar]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        CalendarCache::new(&tx).write_all(calendars)?;
        tx.commit().context("Failed to commit cached calendars")?;
        Ok(())
    }

    /// Body of [`CalendarCache::replace_all`], for use inside a larger
    /// transaction.
    pub(crate) fn write_all(&self, calendars: &[Calendar]) -> Result<()> {
        let keep: Vec<&str> = calendars.iter().map(|c| c.id.as_str()).collect();
        let existing: Vec<String> = {
            let mut stmt = self.conn.prepare("SELECT id FROM calendars")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            ids
        };
        for id in existing.iter().filter(|id| !keep.contains(&id.as_str())) {
            self.conn
                .execute("DELETE FROM calendars WHERE id = ?1", [id])
                .context("Failed to drop stale calendar")?;
        }

        for (position, calendar) in calendars.iter().enumerate() {
            self.write(calendar, position as i64)?;
        }
        log::debug!("Cached {} calendars", calendars.len());
        Ok(())
    }

    fn write(&self, calendar: &Calendar, position: i64) -> Result<()> {
        let settings = serde_json::to_string(&calendar.settings)?;
        let shared_with = serde_json::to_string(&calendar.shared_with)?;

        self.conn
            .execute(
                "INSERT INTO calendars (
                    id, name, description, color, visible, is_default, owner, is_owned,
                    settings, shared_with, is_archived, position, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    color = excluded.color,
                    visible = excluded.visible,
                    is_default = excluded.is_default,
                    owner = excluded.owner,
                    is_owned = excluded.is_owned,
                    settings = excluded.settings,
                    shared_with = excluded.shared_with,
                    is_archived = excluded.is_archived,
                    position = excluded.position,
                    created_at = excluded.created_at,
                    updated_at = excluded.updated_at",
                params![
                    calendar.id,
                    calendar.name,
                    calendar.description,
                    calendar.color,
                    calendar.visible as i32,
                    calendar.is_default as i32,
                    calendar.owner,
                    calendar.is_owned as i32,
                    settings,
                    shared_with,
                    calendar.is_archived as i32,
                    position,
                    timestamp_param(calendar.created_at),
                    timestamp_param(calendar.updated_at),
                ],
            )
            .with_context(|| format!("Failed to cache calendar {}", calendar.id))?;

        Ok(())
    }
}

fn map_calendar_row(row: &Row) -> rusqlite::Result<Calendar> {
    Ok(Calendar {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        color: row.get(3)?,
        visible: row.get::<_, i32>(4)? != 0,
        is_default: row.get::<_, i32>(5)? != 0,
        owner: row.get(6)?,
        is_owned: row.get::<_, i32>(7)? != 0,
        settings: serde_json::from_str(&row.get::<_, String>(8)?)
            .map_err(|e| conversion_error(8, e))?,
        shared_with: serde_json::from_str(&row.get::<_, String>(9)?)
            .map_err(|e| conversion_error(9, e))?,
        is_archived: row.get::<_, i32>(10)? != 0,
        created_at: to_timestamp(11, row.get(11)?)?,
        updated_at: to_timestamp(12, row.get(12)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::{CalendarShare, SharePermission};
    use crate::services::database::Database;
    use pretty_assertions::assert_eq;

    fn setup_test_db() -> Database {
        Database::open(":memory:").unwrap()
    }

    #[test]
    fn test_upsert_and_get() {
        let db = setup_test_db();
        let cache = CalendarCache::new(db.connection());

        let mut calendar = Calendar::new("Team", "#8B5CF6").unwrap();
        calendar.owner = Some("owner-1".to_string());
        calendar.shared_with.push(CalendarShare {
            user: "user-2".to_string(),
            permission: SharePermission::Write,
        });
        calendar.settings.timezone = "Europe/Berlin".to_string();

        cache.upsert(&calendar).unwrap();
        assert_eq!(cache.get(&calendar.id).unwrap().unwrap(), calendar);
    }

    #[test]
    fn test_get_missing_calendar() {
        let db = setup_test_db();
        let cache = CalendarCache::new(db.connection());
        assert!(cache.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let db = setup_test_db();
        let cache = CalendarCache::new(db.connection());
        let default = Calendar::local_default();
        let work = Calendar::new("Work", "#10B981").unwrap();

        cache.upsert(&default).unwrap();
        cache.upsert(&work).unwrap();
        cache.upsert(&default).unwrap();

        let names: Vec<String> = cache.list_all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Default Calendar", "Work"]);
    }

    #[test]
    fn test_replace_all_drops_missing_calendars() {
        let db = setup_test_db();
        let cache = CalendarCache::new(db.connection());
        let old = Calendar::new("Old", "#10B981").unwrap();
        cache.upsert(&old).unwrap();

        let fresh = vec![Calendar::local_default(), Calendar::new("New", "#F59E0B").unwrap()];
        cache.replace_all(&fresh).unwrap();

        let listed = cache.list_all().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, fresh[0].id);
        assert!(cache.get(&old.id).unwrap().is_none());
    }
}
