//! Connection management.
//!
//! [`Store`] is the process-wide persistence handle. It knows where the
//! database lives, applies migrations once when it is opened, and hands out
//! [`Database`] connections. A `Database` is meant to live for one unit of
//! work (one HTTP request) and is closed when dropped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::migrations;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at an explicit path and run migrations.
    pub fn open_at(path: &Path) -> Result<Self> {
        let db = Self::connect_at(path)?;
        migrations::run_migrations(db.conn())?;
        Ok(db)
    }

    /// Open a connection without checking migrations.
    fn connect_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying connection.
    ///
    /// Needed to start a transaction.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// Cheap, cloneable handle that opens per-request connections.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create the parent directory if needed, open the database once and
    /// bring the schema up to date.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::info!(path = %path.display(), "opening database");
        Database::open_at(&path)?;

        Ok(Self { path })
    }

    /// Open a fresh connection. Drop it to release it.
    pub fn connect(&self) -> Result<Database> {
        Database::connect_at(&self.path)
    }
}

/// Read an RFC 3339 text column as a UTC timestamp.
pub(crate) fn timestamp_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Whether `table` has a row with this primary key.
pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: i64) -> Result<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE id = ?1"),
            rusqlite::params![id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path).expect("should open");
        let version: u32 = db
            .conn()
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert!(version > 0);
        assert!(path.exists());
    }

    #[test]
    fn store_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("tabletop.db");

        let store = Store::open(&path).expect("should open");
        assert!(path.exists());
        store.connect().expect("should connect");
    }

    #[test]
    fn connections_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("test.db")).unwrap();

        let a = store.connect().unwrap();
        a.conn()
            .execute(
                "INSERT INTO users (nickname, email, password_hash, created_at)
                 VALUES ('a', 'a@x.com', 'h', '2024-01-01T00:00:00+00:00')",
                [],
            )
            .unwrap();
        drop(a);

        let b = store.connect().unwrap();
        let count: i64 = b
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
