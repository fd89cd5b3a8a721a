//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! External dependencies (clock, storage) are abstracted behind traits. This
//! crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! `NullStore` also backs the node's `memory` storage mode.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullStore;
