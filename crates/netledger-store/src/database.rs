//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation. Handles are cheap to open;
//! the core opens one per operation and drops it when the operation ends.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{Result, StoreError};
use crate::migrations;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at an explicit path.
    ///
    /// Parent directories are created when missing.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        Self::prepare(conn)
    }

    /// Open a private in-memory database (used by tests and dry runs).
    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        // Passes of different kinds append to the audit log concurrently.
        conn.busy_timeout(BUSY_TIMEOUT)?;

        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying connection.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }

    /// Run `f` inside one `BEGIN IMMEDIATE` transaction.
    ///
    /// Commits when `f` returns `Ok`. On `Err` (or a panic unwinding through
    /// here) the transaction is dropped and SQLite rolls every write back.
    pub fn with_transaction<T, E, F>(&mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let value = f(&tx)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}

/// Map `QueryReturnedNoRows` to `Ok(None)` for optional single-row lookups.
pub(crate) fn optional<T>(result: rusqlite::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(other) => Err(StoreError::Sqlite(other)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{audit_log, models::NewAuditEntry};

    #[test]
    fn open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("netledger.db");

        let db = Database::open_at(&path).expect("should open");
        assert!(db.path().is_some());
        assert!(path.exists());
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let mut db = Database::open_in_memory().unwrap();

        let result: std::result::Result<(), StoreError> = db.with_transaction(|tx| {
            audit_log::append(tx, &NewAuditEntry::plain("first"))?;
            Err(StoreError::NotFound)
        });

        assert!(matches!(result, Err(StoreError::NotFound)));
        assert_eq!(audit_log::count(db.conn()).unwrap(), 0);
    }

    #[test]
    fn committed_transaction_is_visible_to_new_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netledger.db");

        let mut writer = Database::open_at(&path).unwrap();
        writer
            .with_transaction(|tx| audit_log::append(tx, &NewAuditEntry::plain("hello")))
            .unwrap();

        let reader = Database::open_at(&path).unwrap();
        assert_eq!(audit_log::count(reader.conn()).unwrap(), 1);
    }
}
