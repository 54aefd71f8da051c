//! Repository layer: partition stores and the dual-store router.
//!
//! # Responsibility
//! - Define the single-store contract (`PersonStore`) and its SQLite backend.
//! - Compose two stores into one age-partitioned repository.
//!
//! # Invariants
//! - Repository writes enforce `Person::validate()` before persistence.
//! - Not-found is reported as `None`, never as an error.

pub mod dual_repo;
pub mod person_store;
