//! Database module for Susana
//!
//! Persists the single conversation log. One `rusqlite` connection is shared
//! behind a mutex; every operation holds the lock for its whole duration, so
//! destructive operations are never observed half-done.

mod schema;
mod snapshot;

#[cfg(test)]
mod proptests;

pub use schema::*;
pub use snapshot::ImportError;

use crate::persona::WELCOME_MESSAGE;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database handle poisoned by a panicked writer")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    generation: Arc<AtomicU64>,
}

impl Database {
    /// Open or create database at the given path (`:memory:` is accepted)
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    /// Bumped by every destructive operation (`clear`, `import`).
    /// A changed value means any cached view of the log is stale.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    // ==================== Message Log ====================

    /// Append a message, assigning the next sequence number
    #[allow(dead_code)] // Turns go through `begin_turn`; used in tests
    pub fn append(&self, role: Role, content: &str) -> DbResult<Message> {
        let conn = self.lock()?;
        insert_message(&conn, role, content)
    }

    /// All messages, ordered by sequence ascending
    pub fn read_all(&self) -> DbResult<Vec<Message>> {
        let conn = self.lock()?;
        select_all(&conn)
    }

    /// The conversation as a caller should first see it.
    ///
    /// An empty log is seeded with the assistant's welcome message before
    /// returning, under the same lock, so concurrent first readers cannot
    /// synthesize it twice.
    pub fn history(&self) -> DbResult<Vec<Message>> {
        let conn = self.lock()?;
        seeded_history(&conn)
    }

    /// Open a conversation turn in one critical section: seed the welcome
    /// line if needed, read the log, append the user message and note the
    /// generation the turn belongs to.
    pub fn begin_turn(&self, content: &str) -> DbResult<TurnStart> {
        let conn = self.lock()?;
        let prior = seeded_history(&conn)?;
        let user = insert_message(&conn, Role::User, content)?;
        Ok(TurnStart {
            prior,
            user,
            generation: self.generation(),
        })
    }

    /// Append only while the log is still at `generation`.
    ///
    /// Returns `None` when a clear or import replaced the log in between;
    /// nothing is written in that case.
    pub fn append_in_generation(
        &self,
        role: Role,
        content: &str,
        generation: u64,
    ) -> DbResult<Option<Message>> {
        let conn = self.lock()?;
        if self.generation() != generation {
            return Ok(None);
        }
        insert_message(&conn, role, content).map(Some)
    }

    /// Remove every message in a single statement
    pub fn clear(&self) -> DbResult<u64> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM history", [])?;
        let generation = self.bump_generation();
        tracing::info!(removed, generation, "Conversation log cleared");
        Ok(generation)
    }

    /// Number of stored messages
    pub fn message_count(&self) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// Log state captured when a turn starts
#[derive(Debug, Clone)]
pub struct TurnStart {
    /// The log before the user message, welcome line included
    pub prior: Vec<Message>,
    pub user: Message,
    pub generation: u64,
}

fn seeded_history(conn: &Connection) -> DbResult<Vec<Message>> {
    let messages = select_all(conn)?;
    if !messages.is_empty() {
        return Ok(messages);
    }

    tracing::debug!("Empty conversation log, seeding welcome message");
    let welcome = insert_message(conn, Role::Assistant, WELCOME_MESSAGE)?;
    Ok(vec![welcome])
}

fn insert_message(conn: &Connection, role: Role, content: &str) -> DbResult<Message> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO history (role, content, created_at) VALUES (?1, ?2, ?3)",
        params![role.as_str(), content, now.to_rfc3339()],
    )?;

    Ok(Message {
        sequence: conn.last_insert_rowid(),
        role,
        content: content.to_string(),
        created_at: now,
    })
}

fn select_all(conn: &Connection) -> DbResult<Vec<Message>> {
    let mut stmt =
        conn.prepare("SELECT id, role, content, created_at FROM history ORDER BY id ASC")?;
    let rows = stmt.query_map([], parse_message_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

/// Parse a message row from the database
fn parse_message_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let role = row.get::<_, String>(1)?.parse::<Role>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Message {
        sequence: row.get(0)?,
        role,
        content: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}
