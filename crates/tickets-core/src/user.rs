use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::error::{Result, TicketsError};
use crate::store::{self, Constraint, Store};
use crate::types::{normalize_email, required_text, NAME_MAX};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
        })
    }
}

fn duplicate_email(err: rusqlite::Error, email: &str) -> TicketsError {
    if store::violated_constraint(&err) == Some(Constraint::Unique) {
        tracing::warn!(%email, "rejected duplicate email");
        TicketsError::DuplicateEmail(email.to_string())
    } else {
        err.into()
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl Store {
    pub fn create_user(&mut self, name: &str, email: &str) -> Result<User> {
        let name = required_text("name", name, Some(NAME_MAX))?;
        let email = normalize_email(email)?;

        let tx = self.write_tx()?;
        tx.execute(
            "INSERT INTO users(name, email) VALUES (?1, ?2)",
            params![name, email],
        )
        .map_err(|e| duplicate_email(e, &email))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(id, %email, "created user");
        Ok(User { id, name, email })
    }

    /// All users ordered by name, ties broken by id.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM users ORDER BY name, id")?;
        let users = stmt
            .query_map([], User::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1",
                [id],
                User::from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Replace name and email. Returns `None` when `id` does not exist.
    pub fn edit_user(&mut self, id: i64, name: &str, email: &str) -> Result<Option<User>> {
        let name = required_text("name", name, Some(NAME_MAX))?;
        let email = normalize_email(email)?;

        let tx = self.write_tx()?;
        let updated = tx
            .execute(
                "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3",
                params![name, email, id],
            )
            .map_err(|e| duplicate_email(e, &email))?;
        if updated == 0 {
            return Ok(None);
        }
        tx.commit()?;

        tracing::debug!(id, %email, "edited user");
        Ok(Some(User { id, name, email }))
    }

    /// Delete a user that owns no incidents. Returns false when `id` does not exist.
    pub fn delete_user(&mut self, id: i64) -> Result<bool> {
        let tx = self.write_tx()?;
        if !store::user_exists(&tx, id)? {
            return Ok(false);
        }
        let incidents = store::incidents_owned(&tx, id)?;
        if incidents > 0 {
            tracing::warn!(id, incidents, "refused to delete user with incidents");
            return Err(TicketsError::HasDependents {
                user_id: id,
                incidents,
            });
        }
        tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
        tx.commit()?;

        tracing::debug!(id, "deleted user");
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
