//! Idempotent `persons` schema initializer.
//!
//! # Invariants
//! - DDL uses `IF NOT EXISTS` only, so concurrent callers cannot corrupt state.
//! - Creation runs in an immediate transaction; racing connections to one
//!   file queue on the write lock (within their busy timeout) instead of
//!   failing on a lock upgrade.
//! - Timestamps default to store time in epoch milliseconds.

use super::DbResult;
use rusqlite::{Connection, Transaction, TransactionBehavior};

pub const PERSONS_TABLE: &str = "persons";

const PERSONS_DDL: &str = "
CREATE TABLE IF NOT EXISTS persons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL CHECK (length(trim(first_name)) > 0),
    last_name TEXT NOT NULL CHECK (length(trim(last_name)) > 0),
    email TEXT UNIQUE,
    phone_number TEXT,
    date_of_birth TEXT,
    address TEXT,
    city TEXT,
    country TEXT,
    created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000),
    updated_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
);
CREATE INDEX IF NOT EXISTS idx_persons_city ON persons (city);
CREATE INDEX IF NOT EXISTS idx_persons_country ON persons (country);
";

/// Creates the `persons` table and its indexes when absent.
///
/// Safe to call before every operation; a no-op once the table exists.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    if schema_exists(conn)? {
        return Ok(());
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(PERSONS_DDL)?;
    tx.commit()?;
    Ok(())
}

/// Returns whether the `persons` table is present on `conn`.
pub fn schema_exists(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [PERSONS_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
