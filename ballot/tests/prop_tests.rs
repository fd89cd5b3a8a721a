use std::sync::Arc;

use proptest::prelude::*;

use votegate_ballot::{cooldown_remaining, BallotError, BallotLedger, EligibilityState, QueryFacade};
use votegate_credential::CredentialRegistry;
use votegate_nullables::{NullClock, NullStore};
use votegate_types::{BallotParams, Identity, Tally, Timestamp};

struct Harness {
    registry: Arc<CredentialRegistry>,
    ledger: Arc<BallotLedger>,
    facade: QueryFacade,
    clock: Arc<NullClock>,
}

fn harness(cooldown_secs: u64, start: u64) -> Harness {
    let store = Arc::new(NullStore::new());
    let clock = Arc::new(NullClock::new(start));
    let params = BallotParams {
        cooldown_secs,
        ..BallotParams::default()
    };
    let registry = Arc::new(CredentialRegistry::new(store.clone(), clock.clone(), &params));
    let ledger = Arc::new(BallotLedger::new(registry.clone(), store, clock.clone(), &params));
    let facade = QueryFacade::new(registry.clone(), ledger.clone());
    Harness {
        registry,
        ledger,
        facade,
        clock,
    }
}

proptest! {
    /// Remaining cooldown never increases as the clock moves forward.
    #[test]
    fn cooldown_is_monotonically_non_increasing(
        cooldown in 1u64..1_000_000,
        cast_at in 0u64..1_000_000_000,
        t1 in 0u64..2_000_000,
        step in 0u64..2_000_000,
    ) {
        let last = Some(Timestamp::new(cast_at));
        let r1 = cooldown_remaining(last, cooldown, Timestamp::new(cast_at + t1));
        let r2 = cooldown_remaining(last, cooldown, Timestamp::new(cast_at + t1 + step));
        prop_assert!(r2 <= r1, "remaining grew: {} -> {}", r1, r2);
        prop_assert!(r1 <= cooldown);
    }

    /// A rejected retry reports exactly how long is left, and a vote at
    /// `cast_at + C` is accepted.
    #[test]
    fn on_cooldown_reports_exact_remaining(
        cooldown in 1u64..1_000_000,
        start in 0u64..1_000_000_000,
        wait_frac in 0u64..1000,
    ) {
        let h = harness(cooldown, start);
        let alice = Identity::new("alice");
        h.registry.issue(&alice).unwrap();
        h.ledger.cast_vote(&alice, true).unwrap();

        let waited = cooldown * wait_frac / 1000;
        h.clock.advance(waited);
        match h.ledger.cast_vote(&alice, false) {
            Err(BallotError::OnCooldown { remaining_secs, .. }) => {
                prop_assert_eq!(remaining_secs, cooldown - waited);
            }
            other => prop_assert!(false, "expected OnCooldown, got {:?}", other),
        }

        h.clock.advance(cooldown - waited);
        prop_assert!(h.ledger.cast_vote(&alice, false).is_ok());
    }

    /// yes + no always equals the number of accepted votes, however the
    /// casts and rejections interleave.
    #[test]
    fn tally_conserves_accepted_votes(
        steps in prop::collection::vec((0usize..4, any::<bool>(), 0u64..200), 1..60),
    ) {
        let h = harness(100, 1_000);
        let voters: Vec<Identity> = (0..4).map(|i| Identity::new(format!("voter-{i}"))).collect();
        for v in &voters[..3] {
            h.registry.issue(v).unwrap();
        }

        let mut expected = Tally::default();
        for (who, choice, advance) in steps {
            h.clock.advance(advance);
            if h.ledger.cast_vote(&voters[who], choice).is_ok() {
                expected = expected.record(choice).unwrap();
            }
        }

        let tally = h.facade.current_tally().unwrap();
        prop_assert_eq!(tally, expected);
        prop_assert_eq!(tally.total(), h.ledger.vote_count().unwrap());
    }

    /// Blind retries of the same vote move the tally by at most one per
    /// cooldown window.
    #[test]
    fn blind_retries_count_once(retries in 1usize..20, choice in any::<bool>()) {
        let h = harness(3_600, 50);
        let bob = Identity::new("bob");
        h.registry.issue(&bob).unwrap();

        for _ in 0..retries {
            let _ = h.ledger.cast_vote(&bob, choice);
        }

        prop_assert_eq!(h.facade.current_tally().unwrap().total(), 1);
        prop_assert_eq!(
            h.facade.eligibility_status(&bob).unwrap(),
            EligibilityState::OnCooldown { remaining_secs: 3_600 }
        );
    }

    /// Issuance is exactly-once and sequences are contiguous from the base.
    #[test]
    fn credentials_issue_once_with_contiguous_sequences(
        names in prop::collection::vec("[a-z]{1,6}", 1..30),
    ) {
        let h = harness(60, 0);
        let mut issued = Vec::new();
        for name in &names {
            let id = Identity::new(name.as_str());
            if let Ok(credential) = h.registry.issue(&id) {
                issued.push(credential.sequence);
            } else {
                prop_assert!(h.registry.has_credential(&id).unwrap());
            }
        }
        let expected: Vec<u64> = (1..=issued.len() as u64).collect();
        prop_assert_eq!(issued, expected);
    }
}
