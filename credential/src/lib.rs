//! Credential registry.
//!
//! Issues at most one eligibility credential per identity. Credentials are
//! immutable, never revoked, and carry a strictly increasing sequence number
//! assigned in acceptance order. The ballot ledger only ever reads from here.

pub mod error;
pub mod registry;

pub use error::CredentialError;
pub use registry::CredentialRegistry;
