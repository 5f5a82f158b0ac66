// Database service module
// SQLite connection, schema creation and cache migrations

mod connection;
pub mod migrations;
mod schema;
mod snapshot;

pub use connection::Database;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn table_exists(db: &Database, name: &str) -> bool {
        let count: i64 = db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_new_database_in_memory() {
        let result = Database::new(":memory:");
        assert!(result.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_new_database_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("cache.db");

        let result = Database::open(&db_path);
        assert!(result.is_ok(), "Should create file-based database");
        assert!(Path::new(&db_path).exists(), "Database file should exist");
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let db = Database::open(":memory:").unwrap();
        assert!(table_exists(&db, "calendars"));
        assert!(table_exists(&db, "events"));
        assert!(table_exists(&db, "shared_links"));
    }

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let db = Database::open(":memory:").unwrap();
        assert!(db.initialize_schema().is_ok());
    }

    #[test]
    fn test_migrations_add_missing_event_columns() {
        let db = Database::new(":memory:").unwrap();
        db.connection()
            .execute(
                "CREATE TABLE events (id TEXT PRIMARY KEY, calendar_id TEXT NOT NULL,
                 title TEXT NOT NULL, date TEXT NOT NULL, start_time TEXT NOT NULL,
                 end_time TEXT NOT NULL)",
                [],
            )
            .unwrap();
        assert!(!migrations::column_exists(db.connection(), "events", "repeat_id").unwrap());

        db.initialize_schema().unwrap();
        assert!(migrations::column_exists(db.connection(), "events", "repeat_id").unwrap());
        assert!(migrations::column_exists(db.connection(), "events", "repeat_end_date").unwrap());
        assert!(migrations::column_exists(db.connection(), "events", "pending_sync").unwrap());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::new(":memory:").unwrap();
        let enabled: i64 = db
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1, "Foreign keys should be enabled");
    }
}
