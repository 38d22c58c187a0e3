//! Canned reporting queries: an inner join of incidents with their owners,
//! and a per-user incident count.

use serde::Serialize;

use crate::error::Result;
use crate::store::Store;
use crate::types::Priority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentSummary {
    pub id: i64,
    pub title: String,
    pub priority: Priority,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIncidentCount {
    pub user_id: i64,
    pub user_name: String,
    pub incidents: i64,
}

impl Store {
    /// Incidents joined with their owner's name, newest first. Incidents
    /// whose owner cannot be resolved are left out.
    pub fn incidents_with_user_names(&self) -> Result<Vec<IncidentSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.title, i.priority, u.name
             FROM incidents i
             JOIN users u ON u.id = i.user_id
             ORDER BY i.id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(IncidentSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    priority: row.get(2)?,
                    user_name: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// One row per user, including users without incidents, ordered by name.
    ///
    /// Grouped by user id so two users sharing a display name stay separate.
    pub fn incident_counts_per_user(&self) -> Result<Vec<UserIncidentCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.name, COUNT(i.id)
             FROM users u
             LEFT JOIN incidents i ON i.user_id = u.id
             GROUP BY u.id, u.name
             ORDER BY u.name, u.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(UserIncidentCount {
                    user_id: row.get(0)?,
                    user_name: row.get(1)?,
                    incidents: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::IncidentFilter;

    fn seeded() -> (Store, i64, i64, i64) {
        let mut s = Store::open_in_memory().unwrap();
        let zoe = s.create_user("Zoe", "zoe@x.com").unwrap().id;
        let ana = s.create_user("Ana", "ana@x.com").unwrap().id;
        let idle = s.create_user("Mia", "mia@x.com").unwrap().id;
        s.create_incident("one", "d", Priority::Low, ana).unwrap();
        s.create_incident("two", "d", Priority::High, zoe).unwrap();
        s.create_incident("three", "d", Priority::Medium, ana).unwrap();
        (s, ana, zoe, idle)
    }

    #[test]
    fn joined_listing_is_newest_first_with_names() {
        let (s, ..) = seeded();
        let rows = s.incidents_with_user_names().unwrap();
        let view: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.title.as_str(), r.user_name.as_str()))
            .collect();
        assert_eq!(view, [("three", "Ana"), ("two", "Zoe"), ("one", "Ana")]);
        assert!(rows.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn joined_listing_drops_orphans() {
        let (s, ..) = seeded();
        s.conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
        s.conn
            .execute(
                "INSERT INTO incidents(title, description, priority, user_id) \
                 VALUES ('orphan', 'd', 'Low', 999)",
                [],
            )
            .unwrap();

        let joined = s.incidents_with_user_names().unwrap();
        assert_eq!(joined.len(), 3);
        assert!(joined.iter().all(|r| r.title != "orphan"));

        let all = s.list_incidents(&IncidentFilter::default()).unwrap();
        let orphan = all.iter().find(|l| l.incident.title == "orphan").unwrap();
        assert!(orphan.user_name.is_none());
    }

    #[test]
    fn counts_include_idle_users_in_name_order() {
        let (s, ana, zoe, idle) = seeded();
        let counts = s.incident_counts_per_user().unwrap();
        let view: Vec<(i64, &str, i64)> = counts
            .iter()
            .map(|c| (c.user_id, c.user_name.as_str(), c.incidents))
            .collect();
        assert_eq!(view, [(ana, "Ana", 2), (idle, "Mia", 0), (zoe, "Zoe", 1)]);
    }

    #[test]
    fn counts_keep_same_named_users_apart() {
        let mut s = Store::open_in_memory().unwrap();
        let a = s.create_user("Sam", "sam1@x.com").unwrap().id;
        let b = s.create_user("Sam", "sam2@x.com").unwrap().id;
        s.create_incident("t", "d", Priority::Low, b).unwrap();

        let counts = s.incident_counts_per_user().unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!((counts[0].user_id, counts[0].incidents), (a, 0));
        assert_eq!((counts[1].user_id, counts[1].incidents), (b, 1));
    }

    #[test]
    fn empty_store_reports_nothing() {
        let s = Store::open_in_memory().unwrap();
        assert!(s.incidents_with_user_names().unwrap().is_empty());
        assert!(s.incident_counts_per_user().unwrap().is_empty());
    }
}
