//! LMDB implementation of CredentialStore.
//!
//! `credentials` maps the owner's identity key to the bincode-encoded
//! credential; `credential_seq` maps the big-endian sequence number back to
//! that identity key.
//! Both entries are written in the same write transaction.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use votegate_store::{CredentialStore, StoreError};
use votegate_types::{Credential, Identity};

use crate::keys::identity_key;
use crate::LmdbError;

pub struct LmdbCredentialStore {
    pub(crate) env: Arc<Env>,
    pub(crate) credentials_db: Database<Bytes, Bytes>,
    pub(crate) credential_seq_db: Database<Bytes, Bytes>,
}

fn decode(bytes: &[u8]) -> Result<Credential, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

impl CredentialStore for LmdbCredentialStore {
    fn append_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        let owner_key = identity_key(&credential.owner);
        let seq_key = credential.sequence.to_be_bytes();
        let value = bincode::serialize(credential).map_err(LmdbError::from)?;

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .credentials_db
            .get(&wtxn, &owner_key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(format!(
                "credential for {}",
                credential.owner
            )));
        }
        if self
            .credential_seq_db
            .get(&wtxn, &seq_key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(format!(
                "credential sequence {}",
                credential.sequence
            )));
        }
        self.credentials_db
            .put(&mut wtxn, &owner_key, &value)
            .map_err(LmdbError::from)?;
        self.credential_seq_db
            .put(&mut wtxn, &seq_key, &owner_key)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_credential(&self, owner: &Identity) -> Result<Option<Credential>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .credentials_db
            .get(&rtxn, &identity_key(owner))
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn credential_by_sequence(&self, sequence: u64) -> Result<Option<Credential>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let owner = match self
            .credential_seq_db
            .get(&rtxn, &sequence.to_be_bytes())
            .map_err(LmdbError::from)?
        {
            Some(owner) => owner,
            None => return Ok(None),
        };
        let bytes = self
            .credentials_db
            .get(&rtxn, owner)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                StoreError::Corruption(format!("sequence {sequence} points at a missing credential"))
            })?;
        Ok(Some(decode(bytes)?))
    }

    fn credential_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .credential_seq_db
            .len(&rtxn)
            .map_err(LmdbError::from)?)
    }

    fn iter_credentials(&self) -> Result<Vec<Credential>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self
            .credential_seq_db
            .iter(&rtxn)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_seq, owner) = entry.map_err(LmdbError::from)?;
            let bytes = self
                .credentials_db
                .get(&rtxn, owner)
                .map_err(LmdbError::from)?
                .ok_or_else(|| StoreError::Corruption("dangling sequence index entry".into()))?;
            results.push(decode(bytes)?);
        }
        Ok(results)
    }
}
