//! Store configuration and wiring.
//!
//! # Responsibility
//! - Describe where each partition's store lives.
//! - Open both stores from one configuration value.
//!
//! # Invariants
//! - The two partitions never share a physical store.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::repo::person_store::{RepoError, SqlitePersonStore};
use crate::routing::Partition;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Location of one partition's SQLite store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreLocation {
    /// Private in-memory database, reset when the process exits.
    Memory,
    /// Database file; created on first open.
    File { path: PathBuf },
}

/// Locations of both partition stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub adults: StoreLocation,
    pub minors: StoreLocation,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl StoreConfig {
    /// Two independent in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            adults: StoreLocation::Memory,
            minors: StoreLocation::Memory,
        }
    }

    /// One file per partition.
    pub fn files(adults: impl Into<PathBuf>, minors: impl Into<PathBuf>) -> Self {
        Self {
            adults: StoreLocation::File {
                path: adults.into(),
            },
            minors: StoreLocation::File {
                path: minors.into(),
            },
        }
    }

    pub fn location(&self, partition: Partition) -> &StoreLocation {
        match partition {
            Partition::Adults => &self.adults,
            Partition::Minors => &self.minors,
        }
    }

    /// Rejects configurations where both partitions point at one file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.adults, &self.minors) {
            (StoreLocation::File { path: adults }, StoreLocation::File { path: minors })
                if adults == minors =>
            {
                Err(ConfigError::SharedStore(adults.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// Both partitions resolve to the same database file.
    SharedStore(PathBuf),
    /// A store could not be opened or bootstrapped.
    Open { partition: Partition, source: DbError },
    /// Opened stores could not be composed into a repository.
    Wiring(RepoError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SharedStore(path) => write!(
                f,
                "ADULTS and MINORS must use separate stores, both point at `{}`",
                path.display()
            ),
            Self::Open { partition, source } => {
                write!(f, "failed to open {partition} store: {source}")
            }
            Self::Wiring(err) => write!(f, "failed to wire stores: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SharedStore(_) => None,
            Self::Open { source, .. } => Some(source),
            Self::Wiring(err) => Some(err),
        }
    }
}

/// Opens both stores described by `config`, ADULTS first.
pub fn open_stores(
    config: &StoreConfig,
) -> Result<(SqlitePersonStore, SqlitePersonStore), ConfigError> {
    config.validate()?;
    let adults = open_store(config, Partition::Adults)?;
    let minors = open_store(config, Partition::Minors)?;
    Ok((adults, minors))
}

fn open_store(config: &StoreConfig, partition: Partition) -> Result<SqlitePersonStore, ConfigError> {
    let conn = match config.location(partition) {
        StoreLocation::Memory => open_db_in_memory(partition),
        StoreLocation::File { path } => open_db(path, partition),
    }
    .map_err(|source| ConfigError::Open { partition, source })?;
    Ok(SqlitePersonStore::new(partition, conn))
}
