// 🗄️ SQLite Ledger - durable append-only key/value versions
//
// Every put is a new row in `ledger_writes`; rows are never updated or
// deleted. get(key) reads the row with the highest seq for that key.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use crate::ledger::{Ledger, LedgerError};

/// One stored version of a key
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerWrite {
    pub seq: i64,
    pub key: String,
    pub value: Vec<u8>,
    pub written_at: DateTime<Utc>,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Ledger Writes Table (append-only, one row per put)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS ledger_writes (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL,
            value BLOB NOT NULL,
            written_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_ledger_key_seq ON ledger_writes(key, seq)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// SQLITE LEDGER
// ============================================================================

pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open (or create) a ledger file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger database {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Ledger that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory ledger")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn).context("Failed to set up ledger schema")?;
        Ok(SqliteLedger {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, LedgerError> {
        let conn = self.conn.lock().map_err(|e| LedgerError::backend(key, e))?;
        f(&conn).map_err(|e| LedgerError::backend(key, e))
    }

    /// All versions written at a key, oldest first
    pub fn history(&self, key: &str) -> Result<Vec<LedgerWrite>, LedgerError> {
        let rows = self.with_conn(key, |conn| {
            let mut stmt = conn.prepare(
                "SELECT seq, key, value, written_at FROM ledger_writes
                 WHERE key = ?1 ORDER BY seq ASC",
            )?;
            let rows = stmt
                .query_map(params![key], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        rows.into_iter()
            .map(|(seq, key, value, written_at)| {
                let written_at = DateTime::parse_from_rfc3339(&written_at)
                    .map_err(|e| LedgerError::backend(&key, e))?
                    .with_timezone(&Utc);
                Ok(LedgerWrite {
                    seq,
                    key,
                    value,
                    written_at,
                })
            })
            .collect()
    }

    /// Total rows in the ledger (all keys, all versions)
    pub fn write_count(&self) -> Result<i64, LedgerError> {
        self.with_conn("", |conn| {
            conn.query_row("SELECT COUNT(*) FROM ledger_writes", [], |row| row.get(0))
        })
    }
}

impl Ledger for SqliteLedger {
    fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        let value = self.with_conn(key, |conn| {
            conn.query_row(
                "SELECT value FROM ledger_writes WHERE key = ?1 ORDER BY seq DESC LIMIT 1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
        })?;

        value.ok_or_else(|| LedgerError::KeyNotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        let written_at = Utc::now().to_rfc3339();
        self.with_conn(key, |conn| {
            conn.execute(
                "INSERT INTO ledger_writes (key, value, written_at) VALUES (?1, ?2, ?3)",
                params![key, value, written_at],
            )
        })?;

        debug!(key, bytes = value.len(), "ledger write appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        assert_eq!(
            ledger.get("cp:nothing"),
            Err(LedgerError::KeyNotFound("cp:nothing".to_string()))
        );
    }

    #[test]
    fn test_append_only_versions() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        ledger.put("acct:ACME", b"first").unwrap();
        ledger.put("acct:OTHER", b"other").unwrap();
        ledger.put("acct:ACME", b"second").unwrap();

        // Latest version wins on read
        assert_eq!(ledger.get("acct:ACME").unwrap(), b"second");

        // Nothing was overwritten
        let history = ledger.history("acct:ACME").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].value, b"first");
        assert_eq!(history[1].value, b"second");
        assert!(history[0].seq < history[1].seq);
        assert!(history[0].written_at <= history[1].written_at);

        assert_eq!(ledger.write_count().unwrap(), 3);
    }

    #[test]
    fn test_empty_blob_is_present() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        ledger.put("vendor:V1", b"").unwrap();
        assert!(ledger.get("vendor:V1").unwrap().is_empty());
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        setup_database(&conn).unwrap();
    }
}
