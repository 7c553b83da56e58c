//! Snapshot export and import
//!
//! A snapshot is a plain SQL reconstruction script (schema plus one insert
//! per row) that the `sqlite3` shell can also replay. Imports are validated
//! on a scratch connection before the live log is touched, and the swap
//! happens inside a single transaction.

use super::{
    parse_message_row, select_all, Database, DbError, DbResult, Role, HISTORY_COLUMNS, SCHEMA,
};
use chrono::DateTime;
use rusqlite::limits::Limit;
use rusqlite::{params, Connection, OptionalExtension};
use std::fmt::Write;
use thiserror::Error;

/// First line of every snapshot; identifies the format and its version
pub const SNAPSHOT_HEADER: &str = "-- susana-snapshot v1";

const SNAPSHOT_TRAILER: &str = "COMMIT;";

/// Why a snapshot was rejected. The live log is untouched in every case.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Snapshot is not valid UTF-8 text")]
    Encoding,
    #[error("Unsupported snapshot format (expected a `-- susana-snapshot v1` script)")]
    UnsupportedFormat,
    #[error("Snapshot is truncated (missing final `COMMIT;`)")]
    Truncated,
    #[error("Snapshot script failed to run: {0}")]
    Malformed(String),
    #[error("Snapshot does not contain a valid conversation: {0}")]
    Schema(String),
    #[error("Storage failure while restoring snapshot: {0}")]
    Storage(#[from] DbError),
}

/// Result of a successful import. `generation` is the new log generation;
/// callers holding a cached view should refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub restored: usize,
    pub generation: u64,
}

/// A validated row lifted out of the scratch database
struct SnapshotRow {
    id: i64,
    role: Role,
    content: String,
    created_at: String,
}

impl Database {
    /// Serialize the whole log into a self-contained SQL script
    pub fn export(&self) -> DbResult<Vec<u8>> {
        let conn = self.lock()?;
        let messages = select_all(&conn)?;
        let high_water = autoincrement_high_water(&conn)?;
        drop(conn);

        let mut script = String::new();
        let _ = writeln!(script, "{SNAPSHOT_HEADER}");
        let _ = writeln!(script, "BEGIN TRANSACTION;");
        let _ = writeln!(script, "{}", SCHEMA.trim());
        for msg in &messages {
            let _ = writeln!(
                script,
                "INSERT INTO history VALUES({},{},{},{});",
                msg.sequence,
                sql_text(msg.role.as_str()),
                sql_text(&msg.content),
                sql_text(&msg.created_at.to_rfc3339()),
            );
        }
        if let Some(seq) = high_water {
            let _ = writeln!(script, "DELETE FROM sqlite_sequence WHERE name = 'history';");
            let _ = writeln!(script, "INSERT INTO sqlite_sequence VALUES('history',{seq});");
        }
        let _ = writeln!(script, "{SNAPSHOT_TRAILER}");

        tracing::info!(messages = messages.len(), bytes = script.len(), "Exported snapshot");
        Ok(script.into_bytes())
    }

    /// Replace the whole log with the contents of a snapshot.
    ///
    /// All-or-nothing: any validation or storage failure leaves the current
    /// log exactly as it was.
    pub fn import(&self, bytes: &[u8]) -> Result<ImportSummary, ImportError> {
        let script = std::str::from_utf8(bytes).map_err(|_| ImportError::Encoding)?;
        let script = script.strip_prefix('\u{feff}').unwrap_or(script);

        if script.lines().next().map(str::trim_end) != Some(SNAPSHOT_HEADER) {
            return Err(ImportError::UnsupportedFormat);
        }
        if !script.trim_end().ends_with(SNAPSHOT_TRAILER) {
            return Err(ImportError::Truncated);
        }

        let (rows, high_water) = load_into_scratch(script)?;

        let mut conn = self.lock()?;
        restore_rows(&mut conn, &rows, high_water).map_err(DbError::from)?;
        let generation = self.bump_generation();
        drop(conn);

        tracing::info!(restored = rows.len(), generation, "Imported snapshot");
        Ok(ImportSummary {
            restored: rows.len(),
            generation,
        })
    }
}

/// Run the script against a throwaway connection and read back its rows
fn load_into_scratch(script: &str) -> Result<(Vec<SnapshotRow>, Option<i64>), ImportError> {
    let scratch = Connection::open_in_memory().map_err(DbError::from)?;
    // No ATTACH: a snapshot must not reach files outside the scratch database
    let _previous = scratch.set_limit(Limit::SQLITE_LIMIT_ATTACHED, 0);

    scratch
        .execute_batch(script)
        .map_err(|e| ImportError::Malformed(e.to_string()))?;

    let columns = table_columns(&scratch).map_err(|e| ImportError::Malformed(e.to_string()))?;
    if columns.is_empty() {
        return Err(ImportError::Schema("no `history` table".to_string()));
    }
    if columns != HISTORY_COLUMNS {
        return Err(ImportError::Schema(format!(
            "unexpected `history` columns: {}",
            columns.join(", ")
        )));
    }

    let mut stmt = scratch
        .prepare("SELECT id, role, content, created_at FROM history ORDER BY id ASC")
        .map_err(|e| ImportError::Schema(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            let message = parse_message_row(row)?;
            Ok(SnapshotRow {
                id: message.sequence,
                role: message.role,
                content: message.content,
                created_at: row.get(3)?,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(|e| ImportError::Schema(e.to_string()))?;

    if let Some(bad) = rows
        .iter()
        .find(|row| DateTime::parse_from_rfc3339(&row.created_at).is_err())
    {
        return Err(ImportError::Schema(format!(
            "row {}: invalid created_at `{}`",
            bad.id, bad.created_at
        )));
    }

    let high_water = autoincrement_high_water(&scratch).map_err(ImportError::Storage)?;
    Ok((rows, high_water))
}

/// Drop the live table, recreate it and insert the validated rows, in one transaction
fn restore_rows(
    conn: &mut Connection,
    rows: &[SnapshotRow],
    high_water: Option<i64>,
) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch("DROP TABLE IF EXISTS history;")?;
    tx.execute_batch(SCHEMA)?;

    {
        let mut insert = tx.prepare(
            "INSERT INTO history (id, role, content, created_at) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for row in rows {
            insert.execute(params![row.id, row.role.as_str(), row.content, row.created_at])?;
        }
    }

    if let Some(seq) = high_water {
        let max_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'history'", [])?;
        tx.execute(
            "INSERT INTO sqlite_sequence (name, seq) VALUES ('history', ?1)",
            params![seq.max(max_id)],
        )?;
    }

    tx.commit()
}

fn table_columns(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('history') ORDER BY cid")?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
    names.collect()
}

fn autoincrement_high_water(conn: &Connection) -> DbResult<Option<i64>> {
    let has_sequence_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence')",
        [],
        |row| row.get(0),
    )?;
    if !has_sequence_table {
        return Ok(None);
    }

    conn.query_row(
        "SELECT seq FROM sqlite_sequence WHERE name = 'history'",
        [],
        |row| row.get(0),
    )
    .optional()
    .map_err(DbError::from)
}

/// Quote text as an SQL literal. NUL bytes cannot live inside a quoted
/// literal, so such text is written as a hex blob cast back to TEXT.
fn sql_text(text: &str) -> String {
    if text.contains('\0') {
        let mut hex = String::with_capacity(text.len() * 2);
        for byte in text.as_bytes() {
            let _ = write!(hex, "{byte:02X}");
        }
        format!("CAST(X'{hex}' AS TEXT)")
    } else {
        format!("'{}'", text.replace('\'', "''"))
    }
}
