//! Core domain logic for agesplit.
//! Routes every person to an ADULTS or MINORS store by age at write time and
//! presents both stores as one dataset on reads.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod routing;
pub mod seed;
pub mod service;

pub use config::{open_stores, ConfigError, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{Person, PersonId, PersonValidationError};
pub use repo::dual_repo::{DualStoreRepository, PartitionCounts, PersonRouter, StoredPerson};
pub use repo::person_store::{
    InsertedRow, PersonListQuery, PersonStore, RepoError, RepoResult, SqlitePersonStore,
};
pub use routing::classifier::{classify, AgeClassification};
pub use routing::clock::{FixedClock, ReferenceClock, SystemClock};
pub use routing::{Partition, RoutingDecision};
pub use service::routing_service::{RoutingService, SavedPerson};
pub use service::routing_workflow::{
    RoutingOutcome, RoutingRequest, SearchMethod, TargetDatabase,
};

/// SQLite-backed repository as wired by [`open_repository`].
pub type SqliteDualRepository<C> = DualStoreRepository<SqlitePersonStore, SqlitePersonStore, C>;

/// Opens both stores from `config` and wires them into a repository.
pub fn open_repository<C: ReferenceClock>(
    config: &StoreConfig,
    clock: C,
) -> Result<SqliteDualRepository<C>, ConfigError> {
    let (adults, minors) = open_stores(config)?;
    DualStoreRepository::new(adults, minors, clock).map_err(ConfigError::Wiring)
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
