//! Write-time routing rules.
//!
//! # Responsibility
//! - Classify a birth date into age and minor/adult.
//! - Map that classification onto one of the two partitions.
//!
//! # Invariants
//! - Classification is pure given a reference day.
//! - Partition choice depends only on `is_minor`.

pub mod classifier;
pub mod clock;
pub mod partition;

use crate::model::person::Person;
use chrono::NaiveDate;
use serde::Serialize;

pub use classifier::{classify, AgeClassification};
pub use partition::Partition;

/// Where a person would be stored if saved on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    pub age_years: i32,
    pub is_minor: bool,
    pub partition: Partition,
}

impl RoutingDecision {
    /// Classifies `person` against `today` and resolves its partition.
    pub fn for_person(person: &Person, today: NaiveDate) -> Self {
        let AgeClassification {
            age_years,
            is_minor,
        } = classify(person.date_of_birth, today);
        Self {
            age_years,
            is_minor,
            partition: Partition::for_minor(is_minor),
        }
    }
}
