//! Workflow-facing routing step.
//!
//! # Responsibility
//! - Resolve a person by id or email and report where they are routed.
//! - Emit the exact variable set a process step writes back.
//!
//! # Invariants
//! - `person_id` takes precedence over `email`; a blank email is ignored.
//! - A request with neither key is reported as not found.
//! - `search_method` names the key that produced a hit and stays empty
//!   otherwise.
//! - Partition counts are always reported, even for not-found and error
//!   outcomes.
//! - Age and target are computed against the current reference day, which
//!   may differ from the partition the row was stored in.

use super::routing_service::RoutingService;
use crate::model::person::{Person, PersonId};
use crate::repo::dual_repo::{PartitionCounts, PersonRouter, StoredPerson};
use crate::routing::{Partition, RoutingDecision};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// `personAge` value reported when no person was resolved.
pub const AGE_NOT_FOUND: i32 = -1;

/// Lookup keys read from the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRequest {
    pub person_id: Option<PersonId>,
    pub email: Option<String>,
}

impl RoutingRequest {
    pub fn by_id(person_id: PersonId) -> Self {
        Self {
            person_id: Some(person_id),
            email: None,
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            person_id: None,
            email: Some(email.into()),
        }
    }
}

/// `targetDatabase` process variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetDatabase {
    Adults,
    Minors,
    None,
    /// Reserved for a hosting step that failed outside the lookup itself.
    Error,
}

impl From<Partition> for TargetDatabase {
    fn from(value: Partition) -> Self {
        match value {
            Partition::Adults => Self::Adults,
            Partition::Minors => Self::Minors,
        }
    }
}

impl TargetDatabase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adults => "ADULTS",
            Self::Minors => "MINORS",
            Self::None => "NONE",
            Self::Error => "ERROR",
        }
    }
}

/// `searchMethod` process variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMethod {
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "EMAIL")]
    Email,
    #[serde(rename = "")]
    Unresolved,
}

/// Variables written back to the process after a routing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingOutcome {
    pub person_found: bool,
    pub person: Option<Person>,
    /// Partition the row is actually stored in.
    #[serde(skip)]
    pub stored_in: Option<Partition>,
    pub person_age: i32,
    pub is_minor: bool,
    pub target_database: TargetDatabase,
    pub search_method: SearchMethod,
    pub routing_result: String,
    pub adults_count: u64,
    pub minors_count: u64,
    pub total_count: u64,
}

impl RoutingOutcome {
    fn found(
        stored: StoredPerson,
        decision: RoutingDecision,
        search_method: SearchMethod,
        counts: PartitionCounts,
    ) -> Self {
        let target_database = TargetDatabase::from(decision.partition);
        let routing_result = format!(
            "Person {} (age {}) routed to {} database",
            stored.person.display_name(),
            decision.age_years,
            target_database.as_str()
        );
        Self {
            person_found: true,
            person: Some(stored.person),
            stored_in: Some(stored.partition),
            person_age: decision.age_years,
            is_minor: decision.is_minor,
            target_database,
            search_method,
            routing_result,
            adults_count: counts.adults,
            minors_count: counts.minors,
            total_count: counts.total,
        }
    }

    fn not_found(counts: PartitionCounts) -> Self {
        Self {
            person_found: false,
            person: None,
            stored_in: None,
            person_age: AGE_NOT_FOUND,
            is_minor: false,
            target_database: TargetDatabase::None,
            search_method: SearchMethod::Unresolved,
            routing_result: "Person not found".to_string(),
            adults_count: counts.adults,
            minors_count: counts.minors,
            total_count: counts.total,
        }
    }
}

impl<R: PersonRouter> RoutingService<R> {
    /// Runs one routing step for `request`.
    ///
    /// Never fails: a missing key or a miss in both stores yields a
    /// `TargetDatabase::None` outcome.
    pub fn route(&self, request: &RoutingRequest) -> RoutingOutcome {
        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty());

        let (lookup, search_method) = match (request.person_id, email) {
            (Some(id), _) => (self.by_id(id), SearchMethod::Id),
            (None, Some(email)) => (self.by_email(email), SearchMethod::Email),
            (None, None) => (None, SearchMethod::Unresolved),
        };

        match lookup {
            Some(stored) => {
                let decision = self.classify(&stored.person);
                info!(
                    "event=route_lookup module=service status=found method={:?} stored_in={} target={} age={}",
                    search_method, stored.partition, decision.partition, decision.age_years
                );
                RoutingOutcome::found(stored, decision, search_method, self.counts())
            }
            None => {
                warn!("event=route_lookup module=service status=not_found method={search_method:?}");
                RoutingOutcome::not_found(self.counts())
            }
        }
    }
}
