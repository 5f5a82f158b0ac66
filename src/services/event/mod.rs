//! Offline cache of events.
//! Mirrors the event store in SQLite so the last known state survives
//! restarts and is available when the API cannot be reached.

use rusqlite::Connection;

pub mod crud;
pub mod queries;
pub(crate) mod shared;

/// Event rows of the local cache database.
pub struct EventCache<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> EventCache<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}
