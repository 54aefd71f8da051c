//! Reference "today" used for write-time classification.

use chrono::{Local, NaiveDate};
use std::sync::Mutex;

/// Source of the reference day that ages are computed against.
pub trait ReferenceClock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar day of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ReferenceClock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Pinned reference day that can be moved explicitly.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Moves the reference day; later calls to `today()` observe it.
    pub fn set(&self, today: NaiveDate) {
        match self.today.lock() {
            Ok(mut guard) => *guard = today,
            Err(poisoned) => *poisoned.into_inner() = today,
        }
    }
}

impl ReferenceClock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl<C: ReferenceClock + ?Sized> ReferenceClock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
