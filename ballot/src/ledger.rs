//! Ballot ledger: credential-gated, cooldown-limited vote casting.

use std::sync::{Arc, Mutex, PoisonError};

use votegate_credential::CredentialRegistry;
use votegate_store::VoteStore;
use votegate_types::{
    BallotEvent, BallotParams, ClockSource, EventBus, Identity, Tally, Timestamp, VoteRecord,
};

use crate::error::BallotError;
use crate::state::{cooldown_remaining, derive_state, EligibilityState};

/// Records votes, enforces credential possession and the per-identity
/// cooldown, and maintains the running tally.
///
/// `cast_vote` runs its whole check-and-append under one writer lock, so two
/// concurrent votes by the same identity cannot both pass the cooldown check.
/// The append and the tally increment are committed by the store as a single
/// atomic write. Reads go straight to the store.
pub struct BallotLedger {
    registry: Arc<CredentialRegistry>,
    store: Arc<dyn VoteStore>,
    clock: Arc<dyn ClockSource>,
    cooldown_secs: u64,
    events: Arc<EventBus>,
    write_lock: Mutex<()>,
}

impl BallotLedger {
    pub fn new(
        registry: Arc<CredentialRegistry>,
        store: Arc<dyn VoteStore>,
        clock: Arc<dyn ClockSource>,
        params: &BallotParams,
    ) -> Self {
        Self {
            registry,
            store,
            clock,
            cooldown_secs: params.cooldown_secs,
            events: Arc::new(EventBus::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Deliver [`BallotEvent::VoteCast`] to `events` after each accepted vote.
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// The cooldown constant `C`, in seconds.
    pub fn cooldown_secs(&self) -> u64 {
        self.cooldown_secs
    }

    pub(crate) fn clock(&self) -> &dyn ClockSource {
        self.clock.as_ref()
    }

    /// Cast a yes (`true`) or no (`false`) vote.
    ///
    /// Rejections, in priority order: [`BallotError::NotEligible`] if the
    /// identity holds no credential, then [`BallotError::OnCooldown`] if its
    /// last vote was less than `C` seconds ago.
    pub fn cast_vote(&self, identity: &Identity, choice: bool) -> Result<VoteRecord, BallotError> {
        // Guards no data, so a poisoned lock is still safe to take.
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.registry.has_credential(identity)? {
            tracing::debug!(identity = %identity, "vote rejected: no credential");
            return Err(BallotError::NotEligible(identity.clone()));
        }

        let now = self.clock.now();
        let last = self.store.last_vote_at(identity)?;
        let remaining_secs = cooldown_remaining(last, self.cooldown_secs, now);
        if remaining_secs > 0 {
            tracing::debug!(identity = %identity, remaining_secs, "vote rejected: cooldown");
            return Err(BallotError::OnCooldown {
                voter: identity.clone(),
                remaining_secs,
            });
        }

        let record = VoteRecord {
            voter: identity.clone(),
            choice,
            cast_at: now,
        };
        let tally = self.store.append_vote(&record).map_err(|e| {
            tracing::warn!(identity = %identity, error = %e, "vote append failed");
            e
        })?;

        tracing::info!(
            identity = %identity,
            choice,
            cast_at = now.as_secs(),
            yes = tally.yes,
            no = tally.no,
            "vote cast"
        );
        self.events.emit(&BallotEvent::VoteCast {
            voter: record.voter.clone(),
            choice,
            cast_at: now,
            tally,
        });
        Ok(record)
    }

    /// Seconds until `identity` may vote again; 0 if it never voted or its
    /// cooldown has passed. Answers only the cooldown question, not eligibility.
    pub fn time_until_next_vote(&self, identity: &Identity) -> Result<u64, BallotError> {
        self.time_until_next_vote_at(identity, self.clock.now())
    }

    pub(crate) fn time_until_next_vote_at(
        &self,
        identity: &Identity,
        now: Timestamp,
    ) -> Result<u64, BallotError> {
        let last = self.store.last_vote_at(identity)?;
        Ok(cooldown_remaining(last, self.cooldown_secs, now))
    }

    /// Current committed tally.
    pub fn tally(&self) -> Result<Tally, BallotError> {
        Ok(self.store.tally()?)
    }

    /// `cast_at` of the identity's most recent accepted vote.
    pub fn last_vote_at(&self, identity: &Identity) -> Result<Option<Timestamp>, BallotError> {
        Ok(self.store.last_vote_at(identity)?)
    }

    /// Every accepted vote by `identity`, oldest first.
    pub fn votes_by(&self, identity: &Identity) -> Result<Vec<VoteRecord>, BallotError> {
        Ok(self.store.votes_by(identity)?)
    }

    /// Number of accepted votes across all identities.
    pub fn vote_count(&self) -> Result<u64, BallotError> {
        Ok(self.store.vote_count()?)
    }

    /// Where `identity` currently sits in the Ineligible / Eligible /
    /// OnCooldown state machine.
    pub fn state_of(&self, identity: &Identity) -> Result<EligibilityState, BallotError> {
        let now = self.clock.now();
        let has_credential = self.registry.has_credential(identity)?;
        let last = self.store.last_vote_at(identity)?;
        Ok(derive_state(has_credential, last, self.cooldown_secs, now))
    }
}
