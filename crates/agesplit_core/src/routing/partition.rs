//! Partition identity and resolution.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One of the two independent physical stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Partition {
    /// People aged 18 or more at write time (also the default for unknown age).
    Adults,
    /// People younger than 18 at write time.
    Minors,
}

impl Partition {
    /// Fan-out order for every multi-store read.
    pub const ALL: [Partition; 2] = [Partition::Adults, Partition::Minors];

    /// Resolves the owning partition from a minor/adult classification.
    pub fn for_minor(is_minor: bool) -> Self {
        if is_minor {
            Self::Minors
        } else {
            Self::Adults
        }
    }

    /// Stable upper-case name used in logs and workflow variables.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adults => "ADULTS",
            Self::Minors => "MINORS",
        }
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
