//! SQLite store bootstrap and schema initialization.
//!
//! # Responsibility
//! - Open and configure one SQLite connection per partition.
//! - Ensure the `persons` table exists before any read or write.
//!
//! # Invariants
//! - Schema initialization only ever touches the connection it is given.
//! - Core code must not read/write person rows before `ensure_schema` succeeds.

use crate::routing::Partition;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod functions;
mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A previous holder of the store lock panicked mid-operation.
    LockPoisoned(Partition),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::LockPoisoned(partition) => {
                write!(f, "connection lock for {partition} store is poisoned")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::LockPoisoned(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
