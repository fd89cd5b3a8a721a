//! Events emitted after a write commits.

use std::panic::{self, AssertUnwindSafe};

use crate::{Identity, Tally, Timestamp};

/// Ballot-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BallotEvent {
    /// A credential was issued.
    CredentialIssued {
        owner: Identity,
        sequence: u64,
        issued_at: Timestamp,
    },
    /// A vote was accepted. `tally` is the committed aggregate including it.
    VoteCast {
        voter: Identity,
        choice: bool,
        cast_at: Timestamp,
        tally: Tally,
    },
}

type Listener = Box<dyn Fn(&BallotEvent) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the writing thread, inside the write boundary;
/// keep handlers fast. A panicking listener is logged and skipped: the write
/// it reports on has already committed.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &BallotEvent) {
        for listener in &self.listeners {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::warn!(?event, "event listener panicked");
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&BallotEvent::CredentialIssued {
            owner: Identity::new("alice"),
            sequence: 1,
            issued_at: Timestamp::new(5),
        });

        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn listener_sees_variant_payload() {
        let yes_votes = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        let seen = Arc::clone(&yes_votes);
        bus.subscribe(Box::new(move |event| {
            if let BallotEvent::VoteCast { choice: true, .. } = event {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        }));

        for choice in [true, false, true] {
            bus.emit(&BallotEvent::VoteCast {
                voter: Identity::new("bob"),
                choice,
                cast_at: Timestamp::new(1),
                tally: Tally::default(),
            });
        }
        assert_eq!(yes_votes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::default();
        assert_eq!(bus.listener_count(), 0);
        bus.emit(&BallotEvent::CredentialIssued {
            owner: Identity::new("carol"),
            sequence: 7,
            issued_at: Timestamp::EPOCH,
        });
    }

    #[test]
    fn panicking_listener_does_not_stop_the_others() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(|_| panic!("listener failure")));
        let c = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        let event = BallotEvent::CredentialIssued {
            owner: Identity::new("dave"),
            sequence: 1,
            issued_at: Timestamp::EPOCH,
        };
        bus.emit(&event);
        bus.emit(&event);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
