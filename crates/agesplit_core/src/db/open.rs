//! Connection bootstrap utilities for partition stores.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for one partition.
//! - Configure connection pragmas required by core behavior.
//! - Ensure the `persons` schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have a 5s busy timeout.
//! - Returned connections have the store's scalar functions registered.
//! - Returned connections already contain the `persons` table.

use super::functions::register_functions;
use super::schema::ensure_schema;
use super::DbResult;
use crate::routing::Partition;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the SQLite file backing `partition` and ensures its schema.
///
/// # Side effects
/// - Creates the file when absent.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, partition: Partition) -> DbResult<Connection> {
    open_with("file", partition, || Connection::open(path))
}

/// Opens a private in-memory store for `partition` and ensures its schema.
///
/// Every call yields an independent, empty database.
pub fn open_db_in_memory(partition: Partition) -> DbResult<Connection> {
    open_with("memory", partition, Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    partition: Partition,
    opener: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode} partition={partition}");

    let conn = match opener() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} partition={partition} duration_ms={} error_code=db_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
    };

    if let Err(err) = bootstrap_connection(&conn) {
        error!(
            "event=db_open module=db status=error mode={mode} partition={partition} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} partition={partition} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    register_functions(conn)?;
    ensure_schema(conn)?;
    Ok(())
}
