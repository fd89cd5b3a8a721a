//! Fundamental types for votegate.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, timestamps and the shared clock, credentials, vote records, tallies,
//! deployment parameters and post-commit events.

pub mod clock;
pub mod credential;
pub mod error;
pub mod event;
pub mod identity;
pub mod params;
pub mod time;
pub mod vote;

pub use clock::{ClockSource, SystemClock};
pub use credential::Credential;
pub use error::{FailureClass, TypesError};
pub use event::{BallotEvent, EventBus};
pub use identity::Identity;
pub use params::BallotParams;
pub use time::Timestamp;
pub use vote::{Tally, VoteRecord};
