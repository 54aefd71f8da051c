//! Routing facade.
//!
//! # Responsibility
//! - Single entry point for HTTP handlers and workflow steps.
//! - Delegate storage and fan-out to a `PersonRouter`.
//!
//! # Invariants
//! - Holds no state besides the router itself.

use crate::model::person::{Person, PersonId};
use crate::repo::dual_repo::{PartitionCounts, PersonRouter, StoredPerson};
use crate::repo::person_store::{PersonListQuery, RepoResult};
use crate::routing::RoutingDecision;
use serde::Serialize;

/// A freshly saved person and the routing decision that placed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPerson {
    pub person: Person,
    pub decision: RoutingDecision,
}

/// Stateless facade over a partition-aware router.
pub struct RoutingService<R: PersonRouter> {
    router: R,
}

impl<R: PersonRouter> RoutingService<R> {
    pub fn new(router: R) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    /// Saves `person` into the store chosen by its current age.
    ///
    /// On error nothing was written and the person is dropped unsaved.
    pub fn save(&self, mut person: Person) -> RepoResult<SavedPerson> {
        let decision = self.router.save(&mut person)?;
        Ok(SavedPerson { person, decision })
    }

    /// Looks up by store-local id, ADULTS first.
    pub fn by_id(&self, id: PersonId) -> Option<StoredPerson> {
        self.router.find_by_id(id)
    }

    /// Looks up by email, ADULTS first.
    pub fn by_email(&self, email: &str) -> Option<StoredPerson> {
        self.router.find_by_email(email)
    }

    pub fn all(&self) -> Vec<StoredPerson> {
        self.router.list_all()
    }

    pub fn adults_only(&self) -> Vec<Person> {
        self.router.list_adults()
    }

    pub fn minors_only(&self) -> Vec<Person> {
        self.router.list_minors()
    }

    pub fn search(&self, query: &PersonListQuery) -> Vec<StoredPerson> {
        self.router.search(query)
    }

    /// Case-insensitive first-name substring match over both stores.
    pub fn by_first_name(&self, first_name: &str) -> Vec<StoredPerson> {
        self.router.search(&PersonListQuery::first_name(first_name))
    }

    /// Case-insensitive last-name substring match over both stores.
    pub fn by_last_name(&self, last_name: &str) -> Vec<StoredPerson> {
        self.router.search(&PersonListQuery::last_name(last_name))
    }

    pub fn counts(&self) -> PartitionCounts {
        self.router.counts()
    }

    /// Reports which store `person` would land in if saved today.
    ///
    /// Pure diagnostic: nothing is written and stored rows are not moved.
    pub fn classify(&self, person: &Person) -> RoutingDecision {
        RoutingDecision::for_person(person, self.router.today())
    }
}
