//! SQLite-backed completion log storage.
//!
//! Provides persistent storage for:
//! - Completion records, with their original UTC offset
//! - The record id allocator
//! - Key-value store for application state

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use super::data_dir;
use super::migrations;
use super::snapshot::SnapshotStore;
use crate::completion::{CompletionRecord, LogSnapshot, TaskCategory, SNAPSHOT_VERSION};
use crate::error::{Result, StorageError};

const NEXT_ID_KEY: &str = "next_id";

/// SQLite database holding the completion log.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/cadence/cadence.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("cadence.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Number of stored completions.
    pub fn completion_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM completions", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn read_records(&self) -> Result<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, completed_at, category, focus_score
             FROM completions
             ORDER BY completed_at_utc, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<f64>>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, completed_at, category, focus_score) = row?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at).map_err(|e| {
                StorageError::CorruptSnapshot(format!("record {id}: bad timestamp: {e}"))
            })?;
            let category: TaskCategory = category
                .parse()
                .map_err(|e| StorageError::CorruptSnapshot(format!("record {id}: {e}")))?;
            records.push(CompletionRecord {
                id: id as u64,
                completed_at,
                category,
                focus_score,
            });
        }
        // Rows written by older builds carry a microsecond sort key.
        records.sort_by(|a, b| a.completed_at.cmp(&b.completed_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }
}

impl SnapshotStore for Database {
    fn load(&self) -> Result<Option<LogSnapshot>> {
        let next_id = self.kv_get(NEXT_ID_KEY)?;
        let records = self.read_records()?;
        let next_id = match next_id {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                StorageError::CorruptSnapshot(format!("bad next_id '{raw}': {e}"))
            })?,
            None if records.is_empty() => return Ok(None),
            None => records.iter().map(|r| r.id).max().unwrap_or(0) + 1,
        };
        Ok(Some(LogSnapshot {
            version: SNAPSHOT_VERSION,
            next_id,
            records,
        }))
    }

    /// Replace the stored log with `snapshot` in one transaction.
    fn save(&self, snapshot: &LogSnapshot) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM completions", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO completions (id, completed_at, completed_at_utc, category, focus_score)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in &snapshot.records {
                stmt.execute(params![
                    record.id as i64,
                    record.completed_at.to_rfc3339(),
                    record
                        .completed_at
                        .with_timezone(&Utc)
                        .to_rfc3339_opts(SecondsFormat::Nanos, true),
                    record.category.as_str(),
                    record.focus_score,
                ])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![NEXT_ID_KEY, snapshot.next_id.to_string()],
        )?;
        tx.commit()?;
        tracing::debug!(records = snapshot.records.len(), "completion log saved to sqlite");
        Ok(())
    }
}
