//! Domain model for age-partitioned person storage.
//!
//! # Responsibility
//! - Define the person record shared by both partitions.
//!
//! # Invariants
//! - Identity is store-local; the model never assumes global id uniqueness.

pub mod person;
