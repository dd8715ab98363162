//! Session records over a rusqlite connection.
//!
//! # Example
//!
//! ```no_run
//! use ideagen_core::IdeaBundle;
//! use ideagen_sqlite::SessionStore;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("ideagen.db").unwrap();
//! let mut store = SessionStore::new(conn, "ig_").unwrap();
//! store.up().unwrap();
//!
//! store.create_session("s-1", "Make bus stops safer", None, None).unwrap();
//! let bundle = IdeaBundle::new("Make bus stops safer", "2024-01-15T10:30:00Z");
//! store.update_session("s-1", &bundle).unwrap();
//!
//! let purged = store.purge_expired_sessions(180).unwrap();
//! println!("purged {purged} sessions");
//! ```

use std::path::Path;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use ideagen_core::IdeaBundle;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SessionError};
use crate::schema::{generate_drop_sql, generate_schema_sql, validate_prefix};

/// One stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub challenge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// The latest generation result, once one has been stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<IdeaBundle>,
    /// RFC 3339, UTC.
    pub created_at: String,
    /// RFC 3339, UTC.
    pub updated_at: String,
}

/// Persists sessions in a prefixed SQLite table.
pub struct SessionStore {
    conn: Connection,
    prefix: String,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl SessionStore {
    /// Creates a store for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidPrefix`] if the prefix contains invalid characters.
    pub fn new(conn: Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self { conn, prefix })
    }

    /// Opens (or creates) the database at `path` and ensures the table exists.
    pub fn open(path: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let mut store = Self::new(conn, prefix)?;
        store.up()?;
        Ok(store)
    }

    /// Creates the session table. Safe to call repeatedly.
    pub fn up(&mut self) -> Result<()> {
        let sql = generate_schema_sql(&self.prefix)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql)?;
        tx.commit()?;
        Ok(())
    }

    /// Drops the session table.
    pub fn down(&mut self) -> Result<()> {
        let sql = generate_drop_sql(&self.prefix)?;
        self.conn.execute_batch(&sql)?;
        Ok(())
    }

    /// Inserts a new session without a bundle.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionExists`] if `id` is already taken.
    pub fn create_session(
        &self,
        id: &str,
        challenge: &str,
        user_name: Option<&str>,
        user_email: Option<&str>,
    ) -> Result<()> {
        let now = timestamp(Utc::now());
        let inserted = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {}sessions
                 (id, challenge, user_name, user_email, bundle, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?5)",
                self.prefix
            ),
            params![id, challenge, user_name, user_email, now],
        )?;
        if inserted == 0 {
            return Err(SessionError::SessionExists(id.to_string()));
        }
        debug!(session = id, "Created session");
        Ok(())
    }

    /// Stores `bundle` as the session's latest result and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionNotFound`] if no session has this id.
    pub fn update_session(&self, id: &str, bundle: &IdeaBundle) -> Result<()> {
        let json = serde_json::to_string(bundle)?;
        let updated = self.conn.execute(
            &format!(
                "UPDATE {}sessions SET bundle = ?1, updated_at = ?2 WHERE id = ?3",
                self.prefix
            ),
            params![json, timestamp(Utc::now()), id],
        )?;
        if updated == 0 {
            return Err(SessionError::SessionNotFound(id.to_string()));
        }
        debug!(session = id, "Stored bundle");
        Ok(())
    }

    /// Loads one session. Returns `None` if it does not exist.
    pub fn get_session(&self, id: &str) -> Result<Option<SessionRecord>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT id, challenge, user_name, user_email, bundle, created_at, updated_at
                     FROM {}sessions WHERE id = ?1",
                    self.prefix
                ),
                params![id],
                raw_record,
            )
            .optional()?;

        row.map(RawRecord::into_record).transpose()
    }

    /// Lists all sessions, newest first.
    pub fn list_sessions(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, challenge, user_name, user_email, bundle, created_at, updated_at
             FROM {}sessions ORDER BY created_at DESC, id",
            self.prefix
        ))?;
        let rows = stmt
            .query_map([], raw_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(RawRecord::into_record).collect()
    }

    /// Deletes sessions created more than `retention_days` days ago.
    ///
    /// Returns the number of sessions removed. A window reaching past the
    /// earliest representable date removes nothing.
    pub fn purge_expired_sessions(&self, retention_days: u32) -> Result<usize> {
        let cutoff = Duration::try_days(i64::from(retention_days))
            .and_then(|window| Utc::now().checked_sub_signed(window));
        match cutoff {
            Some(cutoff) => self.purge_created_before(cutoff),
            None => {
                debug!(retention_days, "Retention window exceeds date range; nothing to purge");
                Ok(0)
            }
        }
    }

    /// Deletes sessions created strictly before `cutoff`.
    pub fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let removed = self.conn.execute(
            &format!("DELETE FROM {}sessions WHERE created_at < ?1", self.prefix),
            params![timestamp(cutoff)],
        )?;
        info!(removed, cutoff = %timestamp(cutoff), "Purged expired sessions");
        Ok(removed)
    }

    /// Number of stored sessions.
    pub fn session_count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}sessions", self.prefix),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

struct RawRecord {
    id: String,
    challenge: String,
    user_name: Option<String>,
    user_email: Option<String>,
    bundle: Option<String>,
    created_at: String,
    updated_at: String,
}

fn raw_record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        id: row.get(0)?,
        challenge: row.get(1)?,
        user_name: row.get(2)?,
        user_email: row.get(3)?,
        bundle: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl RawRecord {
    fn into_record(self) -> Result<SessionRecord> {
        let bundle = self
            .bundle
            .as_deref()
            .map(serde_json::from_str::<IdeaBundle>)
            .transpose()?;
        Ok(SessionRecord {
            id: self.id,
            challenge: self.challenge,
            user_name: self.user_name,
            user_email: self.user_email,
            bundle,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = SessionStore::new(conn, "ig_").unwrap();
        store.up().unwrap();
        store
    }

    #[test]
    fn test_new_validates_prefix() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            SessionStore::new(conn, "bad prefix"),
            Err(SessionError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_up_is_idempotent() {
        let mut store = store();
        store.up().unwrap();
        assert_eq!(store.session_count().unwrap(), 0);
    }

    #[test]
    fn test_create_and_get() {
        let store = store();
        store
            .create_session("s-1", "Safer stops", Some("Ana"), Some("ana@example.com"))
            .unwrap();

        let record = store.get_session("s-1").unwrap().unwrap();
        assert_eq!(record.challenge, "Safer stops");
        assert_eq!(record.user_name.as_deref(), Some("Ana"));
        assert_eq!(record.bundle, None);
        assert_eq!(record.created_at, record.updated_at);
        assert!(record.created_at.ends_with('Z'));
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let store = store();
        store.create_session("s-1", "a", None, None).unwrap();
        assert!(matches!(
            store.create_session("s-1", "b", None, None),
            Err(SessionError::SessionExists(_))
        ));
    }

    #[test]
    fn test_update_missing_session() {
        let store = store();
        let bundle = IdeaBundle::new("x", "2024-01-15T10:30:00Z");
        assert!(matches!(
            store.update_session("nope", &bundle),
            Err(SessionError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_purge_with_huge_window_removes_nothing() {
        let store = store();
        store.create_session("s-1", "a", None, None).unwrap();

        assert_eq!(store.purge_expired_sessions(u32::MAX).unwrap(), 0);
        assert_eq!(store.session_count().unwrap(), 1);
    }

    #[test]
    fn test_get_missing_session_is_none() {
        assert!(store().get_session("nope").unwrap().is_none());
    }
}
