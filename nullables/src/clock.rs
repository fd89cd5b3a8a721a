//! Nullable clock: deterministic time for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use votegate_types::{ClockSource, Timestamp};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, and never moves backwards.
/// Thread-safe so one clock can be shared by every component and by
/// concurrent test threads.
#[derive(Debug)]
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        let _ = self
            .current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(secs))
            });
    }

    /// Move the clock to `secs`. Earlier values are ignored.
    pub fn set(&self, secs: u64) {
        self.current.fetch_max(secs, Ordering::SeqCst);
    }
}

impl ClockSource for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }
}
