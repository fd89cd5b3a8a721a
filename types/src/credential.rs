//! Eligibility credential record.

use crate::{Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// The one-time-issued eligibility token gating ballot participation.
///
/// Immutable once created. `sequence` is the issuance counter: unique and
/// strictly increasing in acceptance order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub owner: Identity,
    pub sequence: u64,
    pub issued_at: Timestamp,
}
