use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::error::{Result, TicketsError};
use crate::store::{self, Store};
use crate::types::{required_text, Priority, TITLE_MAX};

// ---------------------------------------------------------------------------
// Incident
// ---------------------------------------------------------------------------

/// A ticket. The owner is referenced by id only; use `Store::get_user` to
/// resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incident {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub user_id: i64,
}

impl Incident {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            priority: row.get(3)?,
            user_id: row.get(4)?,
        })
    }
}

/// An incident as shown in listings, carrying its owner's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentListing {
    #[serde(flatten)]
    pub incident: Incident,
    /// `None` only if the owner row is missing, which the store never writes.
    pub user_name: Option<String>,
}

/// Optional filters for `Store::list_incidents`. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    pub user_id: Option<i64>,
    pub priority: Option<Priority>,
}

impl IncidentFilter {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.priority.is_none()
    }
}

/// Partial update for `Store::edit_incident`. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub user_id: Option<i64>,
}

impl IncidentUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.user_id.is_none()
    }
}

const INCIDENT_COLUMNS: &str = "id, title, description, priority, user_id";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl Store {
    pub fn create_incident(
        &mut self,
        title: &str,
        description: &str,
        priority: Priority,
        user_id: i64,
    ) -> Result<Incident> {
        let title = required_text("title", title, Some(TITLE_MAX))?;
        let description = required_text("description", description, None)?;

        let tx = self.write_tx()?;
        if !store::user_exists(&tx, user_id)? {
            tracing::warn!(user_id, "refused incident for unknown user");
            return Err(TicketsError::UnknownUser(user_id));
        }
        tx.execute(
            "INSERT INTO incidents(title, description, priority, user_id) VALUES (?1, ?2, ?3, ?4)",
            params![title, description, priority, user_id],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(id, user_id, %priority, "created incident");
        Ok(Incident {
            id,
            title,
            description,
            priority,
            user_id,
        })
    }

    /// Incidents matching `filter`, newest first, with owner names.
    pub fn list_incidents(&self, filter: &IncidentFilter) -> Result<Vec<IncidentListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.title, i.description, i.priority, i.user_id, u.name
             FROM incidents i
             LEFT JOIN users u ON u.id = i.user_id
             WHERE (?1 IS NULL OR i.user_id = ?1)
               AND (?2 IS NULL OR i.priority = ?2)
             ORDER BY i.id DESC",
        )?;
        let rows = stmt
            .query_map(params![filter.user_id, filter.priority], |row| {
                Ok(IncidentListing {
                    incident: Incident::from_row(row)?,
                    user_name: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn get_incident(&self, id: i64) -> Result<Option<Incident>> {
        let incident = self
            .conn
            .query_row(
                &format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"),
                [id],
                Incident::from_row,
            )
            .optional()?;
        Ok(incident)
    }

    /// Apply the supplied fields of `update`. Returns `None` when `id` does not exist.
    pub fn edit_incident(&mut self, id: i64, update: &IncidentUpdate) -> Result<Option<Incident>> {
        let title = update
            .title
            .as_deref()
            .map(|t| required_text("title", t, Some(TITLE_MAX)))
            .transpose()?;
        let description = update
            .description
            .as_deref()
            .map(|d| required_text("description", d, None))
            .transpose()?;

        let tx = self.write_tx()?;
        let current = tx
            .query_row(
                &format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"),
                [id],
                Incident::from_row,
            )
            .optional()?;
        let Some(mut incident) = current else {
            return Ok(None);
        };

        if let Some(user_id) = update.user_id {
            if !store::user_exists(&tx, user_id)? {
                tracing::warn!(id, user_id, "refused reassignment to unknown user");
                return Err(TicketsError::UnknownUser(user_id));
            }
            incident.user_id = user_id;
        }
        if let Some(title) = title {
            incident.title = title;
        }
        if let Some(description) = description {
            incident.description = description;
        }
        if let Some(priority) = update.priority {
            incident.priority = priority;
        }

        tx.execute(
            "UPDATE incidents SET title = ?1, description = ?2, priority = ?3, user_id = ?4
             WHERE id = ?5",
            params![
                incident.title,
                incident.description,
                incident.priority,
                incident.user_id,
                id
            ],
        )?;
        tx.commit()?;

        tracing::debug!(id, "edited incident");
        Ok(Some(incident))
    }

    /// Returns false when `id` does not exist.
    pub fn delete_incident(&mut self, id: i64) -> Result<bool> {
        let tx = self.write_tx()?;
        let deleted = tx.execute("DELETE FROM incidents WHERE id = ?1", [id])?;
        tx.commit()?;

        if deleted > 0 {
            tracing::debug!(id, "deleted incident");
        }
        Ok(deleted > 0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
