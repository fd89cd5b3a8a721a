//! Vote log storage trait.

use crate::StoreError;
use votegate_types::{Identity, Tally, Timestamp, VoteRecord};

/// Append-only vote log with a per-voter last-vote index and a derived tally.
pub trait VoteStore: Send + Sync {
    /// Append a vote record, update the voter's last-vote index and the tally
    /// in one atomic write. Returns the committed tally.
    ///
    /// No reader can observe the record without its tally increment.
    fn append_vote(&self, record: &VoteRecord) -> Result<Tally, StoreError>;

    /// `cast_at` of the voter's most recent accepted vote.
    fn last_vote_at(&self, voter: &Identity) -> Result<Option<Timestamp>, StoreError>;

    /// Every vote cast by `voter`, oldest first.
    fn votes_by(&self, voter: &Identity) -> Result<Vec<VoteRecord>, StoreError>;

    /// Number of accepted vote records.
    fn vote_count(&self) -> Result<u64, StoreError>;

    /// Current committed tally.
    fn tally(&self) -> Result<Tally, StoreError>;

    /// The whole vote log, in append order.
    fn iter_votes(&self) -> Result<Vec<VoteRecord>, StoreError>;
}
