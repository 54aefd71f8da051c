//! Age-partitioned repository over two independent person stores.
//!
//! # Responsibility
//! - Route every write to exactly one store, chosen from the person's age at
//!   write time.
//! - Fan reads out over both stores and merge the results ADULTS first.
//!
//! # Invariants
//! - A saved person lives in exactly one store; rows are never moved between
//!   stores afterwards, even once a minor turns 18.
//! - Write failures always propagate to the caller.
//! - A failing store on a multi-store read is logged and contributes nothing
//!   (empty list, zero count, no hit); the other store still answers.
//! - On id or email collisions across stores the ADULTS row wins.

use super::person_store::{PersonListQuery, PersonStore, RepoError, RepoResult};
use crate::model::person::{Person, PersonId};
use crate::routing::clock::ReferenceClock;
use crate::routing::{Partition, RoutingDecision};
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::Serialize;

/// A person together with the partition that owns it.
///
/// `(partition, person.id)` is the only globally unique identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPerson {
    pub partition: Partition,
    pub person: Person,
}

/// Per-partition row counts taken one store after the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionCounts {
    pub adults: u64,
    pub minors: u64,
    pub total: u64,
}

impl PartitionCounts {
    pub fn new(adults: u64, minors: u64) -> Self {
        Self {
            adults,
            minors,
            total: adults + minors,
        }
    }

    /// Share of ADULTS rows in percent; 0 when both stores are empty.
    pub fn adults_percentage(&self) -> f64 {
        percentage(self.adults, self.total)
    }

    /// Share of MINORS rows in percent; 0 when both stores are empty.
    pub fn minors_percentage(&self) -> f64 {
        percentage(self.minors, self.total)
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}

/// Partition-aware person access used by the routing facade.
pub trait PersonRouter {
    /// Reference day used for write-time classification.
    fn today(&self) -> NaiveDate;
    /// Inserts `person` into the store chosen by its age and sets its id.
    fn save(&self, person: &mut Person) -> RepoResult<RoutingDecision>;
    fn find_by_id(&self, id: PersonId) -> Option<StoredPerson>;
    fn find_by_email(&self, email: &str) -> Option<StoredPerson>;
    /// Rows matching `query` from both stores, ADULTS first.
    fn search(&self, query: &PersonListQuery) -> Vec<StoredPerson>;
    /// All rows of a single store.
    fn list_partition(&self, partition: Partition) -> Vec<Person>;
    fn count_partition(&self, partition: Partition) -> u64;

    fn list_all(&self) -> Vec<StoredPerson> {
        self.search(&PersonListQuery::default())
    }

    fn list_adults(&self) -> Vec<Person> {
        self.list_partition(Partition::Adults)
    }

    fn list_minors(&self) -> Vec<Person> {
        self.list_partition(Partition::Minors)
    }

    fn count_adults(&self) -> u64 {
        self.count_partition(Partition::Adults)
    }

    fn count_minors(&self) -> u64 {
        self.count_partition(Partition::Minors)
    }

    fn count(&self) -> u64 {
        self.count_adults() + self.count_minors()
    }

    fn counts(&self) -> PartitionCounts {
        PartitionCounts::new(self.count_adults(), self.count_minors())
    }
}

/// Repository routing between an ADULTS store and a MINORS store.
#[derive(Debug)]
pub struct DualStoreRepository<A, M, C> {
    adults: A,
    minors: M,
    clock: C,
}

impl<A, M, C> DualStoreRepository<A, M, C>
where
    A: PersonStore,
    M: PersonStore,
    C: ReferenceClock,
{
    /// Wires the two stores and the reference clock.
    ///
    /// # Errors
    /// - `PartitionMismatch` when a store is dedicated to the other partition.
    pub fn new(adults: A, minors: M, clock: C) -> RepoResult<Self> {
        check_slot(Partition::Adults, adults.partition())?;
        check_slot(Partition::Minors, minors.partition())?;
        Ok(Self {
            adults,
            minors,
            clock,
        })
    }

    fn store(&self, partition: Partition) -> &dyn PersonStore {
        match partition {
            Partition::Adults => &self.adults,
            Partition::Minors => &self.minors,
        }
    }

    /// Runs `op` against one store after ensuring its schema.
    ///
    /// Any failure is logged and replaced by `T::default()`.
    fn read_degraded<T: Default>(
        &self,
        partition: Partition,
        op_name: &'static str,
        op: impl FnOnce(&dyn PersonStore) -> RepoResult<T>,
    ) -> T {
        let store = self.store(partition);
        match store.ensure_schema().and_then(|()| op(store)) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_read module=repo status=degraded partition={partition} op={op_name} error={err}"
                );
                T::default()
            }
        }
    }

    /// Returns the first hit in fan-out order.
    fn first_hit(
        &self,
        op_name: &'static str,
        lookup: impl Fn(&dyn PersonStore) -> RepoResult<Option<Person>>,
    ) -> Option<StoredPerson> {
        Partition::ALL.into_iter().find_map(|partition| {
            self.read_degraded(partition, op_name, &lookup)
                .map(|person| StoredPerson { partition, person })
        })
    }
}

impl<A, M, C> PersonRouter for DualStoreRepository<A, M, C>
where
    A: PersonStore,
    M: PersonStore,
    C: ReferenceClock,
{
    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn save(&self, person: &mut Person) -> RepoResult<RoutingDecision> {
        let decision = RoutingDecision::for_person(person, self.clock.today());
        let store = self.store(decision.partition);

        let inserted = store.ensure_schema().and_then(|()| store.insert(person));
        match inserted {
            Ok(row) => {
                person.id = Some(row.id);
                person.created_at = Some(row.created_at);
                person.updated_at = Some(row.updated_at);
                info!(
                    "event=person_save module=repo status=ok partition={} person_id={} age={}",
                    decision.partition, row.id, decision.age_years
                );
                Ok(decision)
            }
            Err(err) => {
                person.id = None;
                error!(
                    "event=person_save module=repo status=error partition={} age={} error={err}",
                    decision.partition, decision.age_years
                );
                Err(err)
            }
        }
    }

    fn find_by_id(&self, id: PersonId) -> Option<StoredPerson> {
        self.first_hit("find_by_id", |store| store.find_by_id(id))
    }

    fn find_by_email(&self, email: &str) -> Option<StoredPerson> {
        self.first_hit("find_by_email", |store| store.find_by_email(email))
    }

    fn search(&self, query: &PersonListQuery) -> Vec<StoredPerson> {
        Partition::ALL
            .into_iter()
            .flat_map(|partition| {
                self.read_degraded(partition, "list", |store| store.list(query))
                    .into_iter()
                    .map(move |person| StoredPerson { partition, person })
            })
            .collect()
    }

    fn list_partition(&self, partition: Partition) -> Vec<Person> {
        self.read_degraded(partition, "list", |store| {
            store.list(&PersonListQuery::default())
        })
    }

    fn count_partition(&self, partition: Partition) -> u64 {
        self.read_degraded(partition, "count", |store| store.count())
    }
}

fn check_slot(expected: Partition, actual: Partition) -> RepoResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(RepoError::PartitionMismatch { expected, actual })
    }
}

impl<R: PersonRouter + ?Sized> PersonRouter for &R {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn save(&self, person: &mut Person) -> RepoResult<RoutingDecision> {
        (**self).save(person)
    }

    fn find_by_id(&self, id: PersonId) -> Option<StoredPerson> {
        (**self).find_by_id(id)
    }

    fn find_by_email(&self, email: &str) -> Option<StoredPerson> {
        (**self).find_by_email(email)
    }

    fn search(&self, query: &PersonListQuery) -> Vec<StoredPerson> {
        (**self).search(query)
    }

    fn list_partition(&self, partition: Partition) -> Vec<Person> {
        (**self).list_partition(partition)
    }

    fn count_partition(&self, partition: Partition) -> u64 {
        (**self).count_partition(partition)
    }
}
