//! Read-only projections for external callers.
//!
//! Every query here is a cheap, idempotent snapshot that is safe to poll.
//! Each one reads the clock once and uses that reading throughout.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use votegate_credential::CredentialRegistry;
use votegate_types::{Credential, Identity, Tally, Timestamp};

use crate::error::BallotError;
use crate::ledger::BallotLedger;
use crate::state::{derive_state, EligibilityState};

/// Everything a dashboard shows for one identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterSummary {
    pub identity: Identity,
    pub credential: Option<Credential>,
    pub status: EligibilityState,
    pub last_vote_at: Option<Timestamp>,
    pub votes_cast: u64,
    /// Reading of the shared clock the summary was computed at.
    pub as_of: Timestamp,
}

/// Pure composition over the registry and the ledger; holds no state.
pub struct QueryFacade {
    registry: Arc<CredentialRegistry>,
    ledger: Arc<BallotLedger>,
}

impl QueryFacade {
    pub fn new(registry: Arc<CredentialRegistry>, ledger: Arc<BallotLedger>) -> Self {
        Self { registry, ledger }
    }

    /// One answer to "can this identity vote now": no credential
    /// ([`EligibilityState::Ineligible`]), eligible, or on cooldown.
    pub fn eligibility_status(&self, identity: &Identity) -> Result<EligibilityState, BallotError> {
        let now = self.ledger.clock().now();
        // Credentials are never revoked, so a positive answer cannot go stale.
        if !self.registry.has_credential(identity)? {
            return Ok(EligibilityState::Ineligible);
        }
        Ok(match self.ledger.time_until_next_vote_at(identity, now)? {
            0 => EligibilityState::Eligible,
            remaining_secs => EligibilityState::OnCooldown { remaining_secs },
        })
    }

    pub fn current_tally(&self) -> Result<Tally, BallotError> {
        self.ledger.tally()
    }

    /// Status, last vote and count all come from the same vote history read.
    pub fn voter_summary(&self, identity: &Identity) -> Result<VoterSummary, BallotError> {
        let now = self.ledger.clock().now();
        // Votes first: any vote read implies a credential the second read sees.
        let votes = self.ledger.votes_by(identity)?;
        let credential = self.registry.credential_of(identity)?;
        let last_vote_at = votes.last().map(|v| v.cast_at);
        let status = derive_state(
            credential.is_some(),
            last_vote_at,
            self.ledger.cooldown_secs(),
            now,
        );
        Ok(VoterSummary {
            identity: identity.clone(),
            credential,
            status,
            last_vote_at,
            votes_cast: votes.len() as u64,
            as_of: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votegate_nullables::{NullClock, NullStore};
    use votegate_types::BallotParams;

    const DAY: u64 = 86_400;

    fn setup() -> (QueryFacade, Arc<CredentialRegistry>, Arc<BallotLedger>, Arc<NullClock>) {
        let store = Arc::new(NullStore::new());
        let clock = Arc::new(NullClock::new(10_000));
        let params = BallotParams::default();
        let registry = Arc::new(CredentialRegistry::new(store.clone(), clock.clone(), &params));
        let ledger = Arc::new(BallotLedger::new(
            registry.clone(),
            store,
            clock.clone(),
            &params,
        ));
        let facade = QueryFacade::new(registry.clone(), ledger.clone());
        (facade, registry, ledger, clock)
    }

    #[test]
    fn status_walks_through_every_variant() {
        let (facade, registry, ledger, clock) = setup();
        let alice = Identity::new("alice");

        assert_eq!(facade.eligibility_status(&alice).unwrap(), EligibilityState::Ineligible);

        registry.issue(&alice).unwrap();
        assert_eq!(facade.eligibility_status(&alice).unwrap(), EligibilityState::Eligible);

        ledger.cast_vote(&alice, true).unwrap();
        clock.advance(60);
        assert_eq!(
            facade.eligibility_status(&alice).unwrap(),
            EligibilityState::OnCooldown {
                remaining_secs: DAY - 60
            }
        );

        clock.advance(DAY - 60);
        assert_eq!(facade.eligibility_status(&alice).unwrap(), EligibilityState::Eligible);
    }

    #[test]
    fn current_tally_matches_ledger() {
        let (facade, registry, ledger, _) = setup();
        for name in ["a", "b", "c"] {
            registry.issue(&Identity::new(name)).unwrap();
        }
        ledger.cast_vote(&Identity::new("a"), true).unwrap();
        ledger.cast_vote(&Identity::new("b"), false).unwrap();
        ledger.cast_vote(&Identity::new("c"), true).unwrap();
        assert_eq!(facade.current_tally().unwrap(), Tally { yes: 2, no: 1 });
    }

    #[test]
    fn summary_for_unknown_identity() {
        let (facade, _, _, _) = setup();
        let summary = facade.voter_summary(&Identity::new("ghost")).unwrap();
        assert_eq!(summary.credential, None);
        assert_eq!(summary.status, EligibilityState::Ineligible);
        assert_eq!(summary.votes_cast, 0);
        assert_eq!(summary.last_vote_at, None);
        assert_eq!(summary.as_of, Timestamp::new(10_000));
    }

    #[test]
    fn summary_after_two_votes() {
        let (facade, registry, ledger, clock) = setup();
        let bob = Identity::new("bob");
        registry.issue(&bob).unwrap();
        ledger.cast_vote(&bob, true).unwrap();
        clock.advance(DAY);
        ledger.cast_vote(&bob, false).unwrap();
        clock.advance(5);

        let summary = facade.voter_summary(&bob).unwrap();
        assert_eq!(summary.credential.map(|c| c.sequence), Some(1));
        assert_eq!(summary.votes_cast, 2);
        assert_eq!(summary.last_vote_at, Some(Timestamp::new(10_000 + DAY)));
        assert_eq!(
            summary.status,
            EligibilityState::OnCooldown {
                remaining_secs: DAY - 5
            }
        );
    }

    #[test]
    fn summary_status_agrees_with_last_vote() {
        let (facade, registry, ledger, clock) = setup();
        let erin = Identity::new("erin");
        registry.issue(&erin).unwrap();
        ledger.cast_vote(&erin, false).unwrap();
        clock.advance(DAY + 1);

        let summary = facade.voter_summary(&erin).unwrap();
        assert_eq!(summary.status, EligibilityState::Eligible);
        assert_eq!(
            summary.status,
            derive_state(true, summary.last_vote_at, DAY, summary.as_of)
        );
    }
}
