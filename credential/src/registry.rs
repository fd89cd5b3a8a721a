//! Exactly-once credential issuance.

use std::sync::{Arc, Mutex, PoisonError};

use votegate_store::{CredentialStore, StoreError};
use votegate_types::{BallotEvent, BallotParams, ClockSource, Credential, EventBus, Identity};

use crate::error::CredentialError;

/// Issues and records at most one credential per identity.
///
/// The check-then-append sequence of [`issue`](Self::issue) runs under a
/// registry-wide writer lock, and the store itself refuses a second credential
/// for the same owner inside its write transaction. Reads go straight to the
/// store and never take the writer lock.
pub struct CredentialRegistry {
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn ClockSource>,
    sequence_base: u64,
    events: Arc<EventBus>,
    issue_lock: Mutex<()>,
}

impl CredentialRegistry {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn ClockSource>,
        params: &BallotParams,
    ) -> Self {
        Self {
            store,
            clock,
            sequence_base: params.sequence_base,
            events: Arc::new(EventBus::new()),
            issue_lock: Mutex::new(()),
        }
    }

    /// Deliver [`BallotEvent::CredentialIssued`] to `events` after each issuance.
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Issue the credential for `identity`.
    ///
    /// Fails with [`CredentialError::AlreadyIssued`] if the identity already
    /// holds one, however many callers race for it.
    pub fn issue(&self, identity: &Identity) -> Result<Credential, CredentialError> {
        // Guards no data, so a poisoned lock is still safe to take.
        let _guard = self.issue_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.store.get_credential(identity)?.is_some() {
            tracing::debug!(identity = %identity, "credential already issued");
            return Err(CredentialError::AlreadyIssued(identity.clone()));
        }

        let sequence = self.next_sequence()?;
        let credential = Credential {
            owner: identity.clone(),
            sequence,
            issued_at: self.clock.now(),
        };

        match self.store.append_credential(&credential) {
            Ok(()) => {}
            Err(StoreError::Duplicate(reason)) => {
                // Another writer sharing the store got there first. If it was
                // for this identity the caller lost the race; otherwise only
                // the sequence collided and a retry will succeed.
                if self.store.get_credential(identity)?.is_some() {
                    tracing::debug!(identity = %identity, "lost credential issuance race");
                    return Err(CredentialError::AlreadyIssued(identity.clone()));
                }
                tracing::warn!(identity = %identity, %reason, "credential sequence collision");
                return Err(StoreError::Duplicate(reason).into());
            }
            Err(e) => {
                tracing::warn!(identity = %identity, error = %e, "credential append failed");
                return Err(e.into());
            }
        }

        tracing::info!(
            identity = %identity,
            sequence,
            issued_at = credential.issued_at.as_secs(),
            "credential issued"
        );
        self.events.emit(&BallotEvent::CredentialIssued {
            owner: credential.owner.clone(),
            sequence,
            issued_at: credential.issued_at,
        });
        Ok(credential)
    }

    /// Whether `identity` holds a credential.
    pub fn has_credential(&self, identity: &Identity) -> Result<bool, StoreError> {
        Ok(self.store.get_credential(identity)?.is_some())
    }

    /// The credential held by `identity`, if any.
    pub fn credential_of(&self, identity: &Identity) -> Result<Option<Credential>, StoreError> {
        self.store.get_credential(identity)
    }

    /// Owner of the credential carrying `sequence`.
    pub fn owner_of(&self, sequence: u64) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .store
            .credential_by_sequence(sequence)?
            .map(|c| c.owner))
    }

    /// Sequence number the next successful issuance will receive.
    pub fn next_sequence(&self) -> Result<u64, StoreError> {
        self.store
            .credential_count()?
            .checked_add(self.sequence_base)
            .ok_or_else(|| StoreError::Backend("credential sequence overflow".into()))
    }

    /// Number of credentials issued so far.
    pub fn issued_count(&self) -> Result<u64, StoreError> {
        self.store.credential_count()
    }
}
