//! SessionStore implementations: an in-memory map and a SQLite table holding
//! one JSON document per session.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{self, DatabaseError};
use crate::models::ConversationState;

use super::error::IntakeError;
use super::traits::SessionStore;

fn poisoned<T>(_: std::sync::PoisonError<T>) -> IntakeError {
    IntakeError::LockPoisoned("session store".to_string())
}

// ═══════════════════════════════════════════
// In-memory
// ═══════════════════════════════════════════

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, ConversationState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &str) -> Result<Option<ConversationState>, IntakeError> {
        Ok(self.sessions.lock().map_err(poisoned)?.get(id).cloned())
    }

    fn save(&self, id: &str, state: &ConversationState) -> Result<(), IntakeError> {
        self.sessions
            .lock()
            .map_err(poisoned)?
            .insert(id.to_string(), state.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, IntakeError> {
        Ok(self.sessions.lock().map_err(poisoned)?.remove(id).is_some())
    }

    fn list_ids(&self) -> Result<Vec<String>, IntakeError> {
        let mut ids: Vec<String> = self.sessions.lock().map_err(poisoned)?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

// ═══════════════════════════════════════════
// SQLite
// ═══════════════════════════════════════════

pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Open (or create) the sessions database at `path`.
    pub fn open(path: &Path) -> Result<Self, IntakeError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self::from_connection(db::open_database(path)?))
    }

    /// Store at the default location under the app data directory.
    pub fn open_default() -> Result<Self, IntakeError> {
        Self::open(&crate::config::sessions_db_path())
    }

    pub fn in_memory() -> Result<Self, IntakeError> {
        Ok(Self::from_connection(db::open_memory_database()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self, id: &str) -> Result<Option<ConversationState>, IntakeError> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let json: Option<String> = conn
            .query_row(
                "SELECT state_json FROM intake_sessions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(DatabaseError::from)?;

        json.map(|j| serde_json::from_str(&j))
            .transpose()
            .map_err(|e| IntakeError::JsonParsing(e.to_string()))
    }

    fn save(&self, id: &str, state: &ConversationState) -> Result<(), IntakeError> {
        let json =
            serde_json::to_string(state).map_err(|e| IntakeError::JsonParsing(e.to_string()))?;
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().map_err(poisoned)?;
        conn.execute(
            "INSERT INTO intake_sessions (id, state_json, phase, issue_type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(id) DO UPDATE SET
                state_json = excluded.state_json,
                phase = excluded.phase,
                issue_type = excluded.issue_type,
                updated_at = excluded.updated_at",
            params![
                id,
                json,
                state.phase.as_str(),
                state.issue_type.map(|i| i.as_str()),
                now,
            ],
        )
        .map_err(DatabaseError::from)?;
        tracing::debug!(session_id = %id, phase = %state.phase, "Session saved");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, IntakeError> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let removed = conn
            .execute("DELETE FROM intake_sessions WHERE id = ?1", params![id])
            .map_err(DatabaseError::from)?;
        Ok(removed > 0)
    }

    fn list_ids(&self) -> Result<Vec<String>, IntakeError> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let mut stmt = conn
            .prepare("SELECT id FROM intake_sessions ORDER BY id")
            .map_err(DatabaseError::from)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(DatabaseError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::from)?;
        Ok(ids)
    }
}
