use std::fs;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::error::Result;

use super::diff::SessionDiff;

/// A row of the `audio` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub file_path: String,
    /// Comma separated bookmark positions.
    pub time_stamp: String,
    /// Creation time as written by SQLite (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub added: String,
    pub duration: i64,
    pub spend_time: i64,
    pub finished_times: i64,
}

/// Record store for sessions.
pub trait SessionStore {
    fn find_by_name(&self, name: &str) -> Result<Option<Record>>;
    fn create(&mut self, name: &str, file_path: &Path) -> Result<Record>;
    /// Overwrite only the given columns of record `id`.
    fn update_fields(&mut self, id: i64, fields: &SessionDiff) -> Result<()>;
    /// Every record, oldest first.
    fn list_all(&self) -> Result<Vec<Record>>;
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS audio (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    file_path TEXT NOT NULL,
    time_stamp TEXT NOT NULL DEFAULT '',
    added TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    duration INTEGER NOT NULL DEFAULT 0,
    spend_time INTEGER NOT NULL DEFAULT 0,
    finished_times INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS audio_name ON audio (name);";

const COLUMNS: &str = "id, name, file_path, time_stamp, added, duration, spend_time, finished_times";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        name: row.get(1)?,
        file_path: row.get(2)?,
        time_stamp: row.get(3)?,
        added: row.get(4)?,
        duration: row.get(5)?,
        spend_time: row.get(6)?,
        finished_times: row.get(7)?,
    })
}

/// SQLite-backed [`SessionStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and create if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn get(&self, id: i64) -> Result<Record> {
        let sql = format!("SELECT {COLUMNS} FROM audio WHERE id = ?1");
        Ok(self.conn.query_row(&sql, [id], record_from_row)?)
    }
}

impl SessionStore for SqliteStore {
    fn find_by_name(&self, name: &str) -> Result<Option<Record>> {
        let sql = format!("SELECT {COLUMNS} FROM audio WHERE name = ?1 ORDER BY id LIMIT 1");
        Ok(self
            .conn
            .query_row(&sql, [name], record_from_row)
            .optional()?)
    }

    fn create(&mut self, name: &str, file_path: &Path) -> Result<Record> {
        let file_path = file_path.to_string_lossy();
        self.conn.execute(
            "INSERT INTO audio (name, file_path, time_stamp) VALUES (?1, ?2, '')",
            [name, &*file_path],
        )?;
        self.get(self.conn.last_insert_rowid())
    }

    fn update_fields(&mut self, id: i64, fields: &SessionDiff) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }

        // Column names come from `Column::as_str`, never from input.
        let assignments: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column.as_str(), i + 1))
            .collect();
        let sql = format!(
            "UPDATE audio SET {} WHERE id = ?{}",
            assignments.join(", "),
            fields.len() + 1
        );

        let mut params: Vec<&dyn ToSql> = fields.iter().map(|(_, v)| v as &dyn ToSql).collect();
        params.push(&id);
        self.conn.execute(&sql, params.as_slice())?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Record>> {
        let sql = format!("SELECT {COLUMNS} FROM audio ORDER BY added, id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], record_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<Record>>>()?)
    }
}
