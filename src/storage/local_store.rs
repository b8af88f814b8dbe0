use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use thiserror::Error;

use crate::calendar::{CalendarEvent, CalendarView};

pub const EVENTS_KEY: &str = "calendarEvents";
pub const VIEW_KEY: &str = "calendarView";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Failed to prepare storage directory: {0}")]
    IoError(#[from] std::io::Error),
}

/// String key/value storage holding whole-collection snapshots.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self::new(Connection::open(path)?);
        store.initialize()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self::new(Connection::open_in_memory()?);
        store.initialize()?;
        Ok(store)
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO local_storage (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
        Ok(())
    }

    pub fn load_events(&self) -> Result<Vec<CalendarEvent>, StoreError> {
        match self.get_item(EVENTS_KEY)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_events(&self, events: &[CalendarEvent]) -> Result<(), StoreError> {
        let data = serde_json::to_string(events)?;
        self.set_item(EVENTS_KEY, &data)?;
        tracing::debug!("Stored {} events", events.len());
        Ok(())
    }

    pub fn load_view(&self) -> Result<CalendarView, StoreError> {
        Ok(self
            .get_item(VIEW_KEY)?
            .map(|stored| CalendarView::from_stored(&stored))
            .unwrap_or_default())
    }

    pub fn save_view(&self, view: CalendarView) -> Result<(), StoreError> {
        self.set_item(VIEW_KEY, view.as_str())
    }

    pub fn table_exists(&self, table_name: &str) -> bool {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        );
        result.unwrap_or(0) > 0
    }
}
