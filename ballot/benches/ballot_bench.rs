use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use votegate_ballot::{cooldown_remaining, BallotLedger, QueryFacade};
use votegate_credential::CredentialRegistry;
use votegate_nullables::{NullClock, NullStore};
use votegate_types::{BallotParams, Identity, Timestamp};

fn setup(voters: usize) -> (Arc<BallotLedger>, QueryFacade, Arc<NullClock>, Vec<Identity>) {
    let store = Arc::new(NullStore::new());
    let clock = Arc::new(NullClock::new(0));
    let params = BallotParams::default();
    let registry = Arc::new(CredentialRegistry::new(store.clone(), clock.clone(), &params));
    let ledger = Arc::new(BallotLedger::new(registry.clone(), store, clock.clone(), &params));
    let facade = QueryFacade::new(registry.clone(), ledger.clone());
    let identities: Vec<Identity> = (0..voters)
        .map(|i| Identity::new(format!("voter-{i}")))
        .collect();
    for id in &identities {
        registry.issue(id).unwrap();
    }
    (ledger, facade, clock, identities)
}

fn bench_cooldown_remaining(c: &mut Criterion) {
    let last = Some(Timestamp::new(1_000));
    c.bench_function("cooldown_remaining", |b| {
        b.iter(|| {
            black_box(cooldown_remaining(
                black_box(last),
                black_box(86_400),
                black_box(Timestamp::new(50_000)),
            ))
        });
    });
}

fn bench_cast_vote(c: &mut Criterion) {
    let mut group = c.benchmark_group("cast_vote");

    for voters in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("round", voters), &voters, |b, &n| {
            let (ledger, _, clock, ids) = setup(n);
            b.iter(|| {
                for id in &ids {
                    black_box(ledger.cast_vote(id, true).ok());
                }
                clock.advance(86_400);
            });
        });
    }

    group.finish();
}

fn bench_eligibility_status(c: &mut Criterion) {
    let (ledger, facade, _, ids) = setup(100);
    for id in &ids {
        ledger.cast_vote(id, false).unwrap();
    }
    c.bench_function("eligibility_status", |b| {
        b.iter(|| black_box(facade.eligibility_status(black_box(&ids[42])).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_cooldown_remaining,
    bench_cast_vote,
    bench_eligibility_status
);
criterion_main!(benches);
