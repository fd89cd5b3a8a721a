//! Vote records and the running tally.

use crate::{Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// One accepted ballot. Immutable; never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: Identity,
    /// `true` = yes, `false` = no.
    pub choice: bool,
    pub cast_at: Timestamp,
}

/// Aggregate yes/no counters.
///
/// `yes + no` always equals the number of accepted vote records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

impl Tally {
    pub fn total(&self) -> u64 {
        self.yes.saturating_add(self.no)
    }

    /// Count one more vote. Returns `None` on counter overflow.
    pub fn record(&self, choice: bool) -> Option<Tally> {
        let mut next = *self;
        if choice {
            next.yes = next.yes.checked_add(1)?;
        } else {
            next.no = next.no.checked_add(1)?;
        }
        Some(next)
    }

    /// Recompute a tally from a vote log.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a VoteRecord>) -> Tally {
        records.into_iter().fold(Tally::default(), |acc, r| {
            if r.choice {
                Tally { yes: acc.yes + 1, ..acc }
            } else {
                Tally { no: acc.no + 1, ..acc }
            }
        })
    }
}
