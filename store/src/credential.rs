//! Credential log storage trait.

use crate::StoreError;
use votegate_types::{Credential, Identity};

/// Append-only log of issued credentials, keyed by owner and by sequence.
pub trait CredentialStore: Send + Sync {
    /// Append a credential in a single atomic write.
    ///
    /// Fails with [`StoreError::Duplicate`] (and writes nothing) if the owner
    /// already holds a credential or the sequence number is already taken.
    fn append_credential(&self, credential: &Credential) -> Result<(), StoreError>;

    /// The credential held by `owner`, if any.
    fn get_credential(&self, owner: &Identity) -> Result<Option<Credential>, StoreError>;

    /// The credential carrying `sequence`, if any.
    fn credential_by_sequence(&self, sequence: u64) -> Result<Option<Credential>, StoreError>;

    /// Number of credentials ever issued.
    fn credential_count(&self) -> Result<u64, StoreError>;

    /// All credentials in issuance order.
    fn iter_credentials(&self) -> Result<Vec<Credential>, StoreError>;
}
