//! Use-case services over the age-partitioned repository.
//!
//! # Responsibility
//! - Expose one cohesive API so callers never see the partitioning scheme.
//! - Produce workflow-facing routing outcomes.

pub mod routing_service;
pub mod routing_workflow;
