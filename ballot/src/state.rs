//! Per-identity eligibility, derived on every read.
//!
//! Nothing here is stored: the state is always recomputed from whether the
//! identity holds a credential, its last vote time, the cooldown and a single
//! clock reading. There is no cached "on cooldown" flag to drift from the clock.

use serde::{Deserialize, Serialize};
use votegate_types::Timestamp;

/// Position of an identity in the ballot state machine, and the answer
/// the query facade gives callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityState {
    /// No credential held.
    Ineligible,
    /// May cast a vote now.
    Eligible,
    /// Voted within the last cooldown window.
    OnCooldown { remaining_secs: u64 },
}

/// Seconds until `last_vote_at + cooldown_secs`, or 0 once that has passed
/// (or if there was no vote).
pub fn cooldown_remaining(
    last_vote_at: Option<Timestamp>,
    cooldown_secs: u64,
    now: Timestamp,
) -> u64 {
    match last_vote_at {
        Some(cast_at) => cast_at
            .saturating_add(cooldown_secs)
            .as_secs()
            .saturating_sub(now.as_secs()),
        None => 0,
    }
}

/// Derive the state machine position.
pub fn derive_state(
    has_credential: bool,
    last_vote_at: Option<Timestamp>,
    cooldown_secs: u64,
    now: Timestamp,
) -> EligibilityState {
    if !has_credential {
        return EligibilityState::Ineligible;
    }
    match cooldown_remaining(last_vote_at, cooldown_secs, now) {
        0 => EligibilityState::Eligible,
        remaining_secs => EligibilityState::OnCooldown { remaining_secs },
    }
}
