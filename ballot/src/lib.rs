//! Credential-gated recurring yes/no ballot.
//!
//! Per identity the ballot is a three-state machine:
//! `Ineligible` (no credential) → `Eligible` → `OnCooldown` → `Eligible` …
//! The first transition happens when the credential registry issues a
//! credential; the cooldown transitions happen purely as time passes and are
//! derived on every read from the last vote time and the shared clock.
//!
//! - [`BallotLedger`] casts votes and owns the vote log and tally.
//! - [`QueryFacade`] answers eligibility and tally questions for callers.

pub mod error;
pub mod ledger;
pub mod query;
pub mod state;

pub use error::BallotError;
pub use ledger::BallotLedger;
pub use query::{QueryFacade, VoterSummary};
pub use state::{cooldown_remaining, derive_state, EligibilityState};
