//! The shared reference clock.
//!
//! Every component reads "now" through a [`ClockSource`]. Operations read the
//! clock exactly once and reuse that reading for every comparison they make.

use crate::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of a monotonically non-decreasing timestamp.
pub trait ClockSource: Send + Sync {
    /// Current time. Never smaller than any earlier reading from the same clock.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in Unix seconds, clamped so it never goes backwards.
///
/// If the OS clock steps back (NTP correction, manual change) the clock keeps
/// returning the highest value it has already handed out until real time
/// catches up again.
#[derive(Debug, Default)]
pub struct SystemClock {
    high_water: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> Timestamp {
        let wall = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs(),
            Err(_) => {
                tracing::warn!("system clock is before the Unix epoch");
                0
            }
        };
        let previous = self.high_water.fetch_max(wall, Ordering::SeqCst);
        Timestamp::new(previous.max(wall))
    }
}
