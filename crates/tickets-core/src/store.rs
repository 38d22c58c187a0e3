//! SQLite-backed store for users and incidents.
//!
//! # Schema
//!
//! ```text
//! users     (id, name, email UNIQUE)
//! incidents (id, title, description, priority, user_id -> users.id)
//! ```
//!
//! Both ids are `AUTOINCREMENT`, so they start at 1 and are never reused.
//! Foreign keys are switched on for every connection; the data-access
//! methods still check referential integrity themselves so callers get a
//! domain error instead of a raw constraint failure.
//!
//! Every write runs inside its own transaction. A `Transaction` that is
//! dropped without `commit` rolls back, so early returns and `?` leave the
//! store untouched.

use std::path::Path;
use std::time::Duration;

use rusqlite::{ffi, Connection, ErrorCode, Transaction, TransactionBehavior};

use crate::error::Result;

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      email TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS incidents (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      title TEXT NOT NULL,
      description TEXT NOT NULL,
      priority TEXT NOT NULL,
      user_id INTEGER NOT NULL REFERENCES users(id)
    );

    CREATE INDEX IF NOT EXISTS idx_incidents_user ON incidents(user_id);
"#;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        tracing::debug!(path = %path.display(), "opened store");
        Self::init(conn)
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Begin a write transaction. The write lock is taken up front so a
    /// concurrent writer fails here rather than half-way through.
    pub(crate) fn write_tx(&mut self) -> Result<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

// ---------------------------------------------------------------------------
// Constraint classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
    Unique,
    ForeignKey,
}

/// Which constraint, if any, a failed statement tripped.
pub(crate) fn violated_constraint(err: &rusqlite::Error) -> Option<Constraint> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            match e.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE => Some(Constraint::Unique),
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Count incidents owned by `user_id`.
pub(crate) fn incidents_owned(conn: &Connection, user_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(id) FROM incidents WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )
}

pub(crate) fn user_exists(conn: &Connection, user_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [user_id],
        |row| row.get(0),
    )
}
