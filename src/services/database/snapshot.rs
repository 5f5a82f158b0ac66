use anyhow::{Context, Result};

use super::Database;
use crate::models::calendar::Calendar;
use crate::models::event::Event;
use crate::services::calendar::CalendarCache;
use crate::services::event::EventCache;

impl Database {
    /// Replace the cached calendars and events together.
    ///
    /// Either both tables hold the new state or neither changes. Events in
    /// `unsynced` are flagged so they can be sent again after a restart.
    pub fn save_snapshot(
        &self,
        calendars: &[Calendar],
        events: &[Event],
        unsynced: &[&str],
    ) -> Result<()> {
        let tx = self.connection().unchecked_transaction()?;
        CalendarCache::new(&tx).write_all(calendars)?;
        EventCache::new(&tx).write_all(events, unsynced)?;
        tx.commit().context("Failed to commit cache snapshot")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn event(calendar_id: &str, title: &str) -> Event {
        Event::builder()
            .title(title)
            .date(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap())
            .start_time("09:00".parse().unwrap())
            .end_time("10:00".parse().unwrap())
            .calendar_id(calendar_id)
            .build()
            .unwrap()
    }

    #[test]
    fn test_snapshot_writes_both_tables() {
        let db = Database::open(":memory:").unwrap();
        let work = Calendar::new("Work", "#10B981").unwrap();
        let calendars = vec![Calendar::local_default(), work.clone()];
        let review = event(&work.id, "Review");
        let gym = event("default-local", "Gym");

        db.save_snapshot(&calendars, &[review.clone(), gym.clone()], &[gym.id.as_str()])
            .unwrap();

        assert_eq!(CalendarCache::new(db.connection()).list_all().unwrap().len(), 2);
        let events = EventCache::new(db.connection());
        assert_eq!(events.count().unwrap(), 2);
        let unsynced = events.list_unsynced().unwrap();
        assert_eq!(unsynced.len(), 1);
        assert_eq!(unsynced[0].id, gym.id);
    }

    #[test]
    fn test_failed_snapshot_keeps_previous_cache() {
        let db = Database::open(":memory:").unwrap();
        let work = Calendar::new("Work", "#10B981").unwrap();
        let review = event(&work.id, "Review");
        db.save_snapshot(&[Calendar::local_default(), work.clone()], &[review], &[])
            .unwrap();

        // the event row fails its foreign key after the calendars were rewritten
        let orphan = event("missing-calendar", "Orphan");
        assert!(db
            .save_snapshot(&[Calendar::local_default()], &[orphan], &[])
            .is_err());

        let calendars = CalendarCache::new(db.connection()).list_all().unwrap();
        assert_eq!(calendars.len(), 2);
        let events = EventCache::new(db.connection()).list_all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Review");
    }

    #[test]
    fn test_next_snapshot_clears_unsynced_flag() {
        let db = Database::open(":memory:").unwrap();
        let gym = event("default-local", "Gym");
        let calendars = vec![Calendar::local_default()];

        db.save_snapshot(&calendars, std::slice::from_ref(&gym), &[gym.id.as_str()])
            .unwrap();
        db.save_snapshot(&calendars, std::slice::from_ref(&gym), &[])
            .unwrap();

        let events = EventCache::new(db.connection());
        assert!(events.list_unsynced().unwrap().is_empty());
        assert_eq!(events.count().unwrap(), 1);
    }
}
