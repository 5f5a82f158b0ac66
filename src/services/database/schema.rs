use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_calendars_table(conn)?;
    create_events_table(conn)?;
    run_events_migrations(conn)?;
    create_shared_links_table(conn)?;
    Ok(())
}

fn create_calendars_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS calendars (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            color TEXT NOT NULL,
            visible INTEGER NOT NULL DEFAULT 0,
            is_default INTEGER NOT NULL DEFAULT 0,
            owner TEXT,
            is_owned INTEGER NOT NULL DEFAULT 1,
            settings TEXT NOT NULL DEFAULT '{}',
            shared_with TEXT NOT NULL DEFAULT '[]',
            is_archived INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT
        )",
        [],
    )
    .context("Failed to create calendars table")?;

    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            calendar_id TEXT NOT NULL REFERENCES calendars(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            all_day INTEGER NOT NULL DEFAULT 0,
            color TEXT,
            repeat TEXT NOT NULL DEFAULT 'none',
            details TEXT NOT NULL DEFAULT '{}',
            created_at TEXT,
            updated_at TEXT
        )",
        [],
    )
    .context("Failed to create events table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_calendar_date ON events(calendar_id, date)",
        [],
    )
    .context("Failed to create events index")?;

    Ok(())
}

fn run_events_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "repeat_id",
        "ALTER TABLE events ADD COLUMN repeat_id TEXT",
    )?;

    migrations::ensure_column(
        conn,
        "events",
        "repeat_end_date",
        "ALTER TABLE events ADD COLUMN repeat_end_date TEXT",
    )?;

    migrations::ensure_column(
        conn,
        "events",
        "pending_sync",
        "ALTER TABLE events ADD COLUMN pending_sync INTEGER NOT NULL DEFAULT 0",
    )?;

    Ok(())
}

fn create_shared_links_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS shared_links (
            short_id TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create shared_links table")?;

    Ok(())
}
