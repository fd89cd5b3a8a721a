//! Abstract storage traits for votegate.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The registry and the ledger depend only on the traits.
//!
//! Logical layout: an append-only credential log keyed by identity, an
//! append-only vote log, and a tally maintained under the same atomic write
//! as each vote append.

pub mod credential;
pub mod error;
pub mod meta;
pub mod vote;

pub use credential::CredentialStore;
pub use error::StoreError;
pub use meta::MetaStore;
pub use vote::VoteStore;
