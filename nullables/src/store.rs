//! Nullable store: thread-safe in-memory storage for testing.
//!
//! All state sits behind one `RwLock`, so a vote append, its voter index
//! entry and the tally increment become visible together.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use votegate_store::{CredentialStore, MetaStore, StoreError, VoteStore};
use votegate_types::{Credential, Identity, Tally, Timestamp, VoteRecord};

#[derive(Default)]
struct Inner {
    credentials: HashMap<Identity, Credential>,
    by_sequence: BTreeMap<u64, Identity>,
    votes: Vec<VoteRecord>,
    by_voter: HashMap<Identity, Vec<usize>>,
    tally: Tally,
    meta: HashMap<String, Vec<u8>>,
    schema_version: u32,
}

/// An in-memory credential + vote + meta store.
///
/// `fail_writes(true)` makes every subsequent write return
/// [`StoreError::Backend`] without touching state, which simulates an
/// unreachable storage backend.
#[derive(Default)]
pub struct NullStore {
    inner: RwLock<Inner>,
    fail_writes: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle write fault injection.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            tracing::debug!("null store rejecting write (fault injection)");
            return Err(StoreError::Backend("injected write failure".into()));
        }
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
    }
}

impl CredentialStore for NullStore {
    fn append_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if inner.credentials.contains_key(&credential.owner) {
            return Err(StoreError::Duplicate(format!(
                "credential for {}",
                credential.owner
            )));
        }
        if inner.by_sequence.contains_key(&credential.sequence) {
            return Err(StoreError::Duplicate(format!(
                "credential sequence {}",
                credential.sequence
            )));
        }
        inner
            .by_sequence
            .insert(credential.sequence, credential.owner.clone());
        inner
            .credentials
            .insert(credential.owner.clone(), credential.clone());
        Ok(())
    }

    fn get_credential(&self, owner: &Identity) -> Result<Option<Credential>, StoreError> {
        Ok(self.read()?.credentials.get(owner).cloned())
    }

    fn credential_by_sequence(&self, sequence: u64) -> Result<Option<Credential>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .by_sequence
            .get(&sequence)
            .and_then(|owner| inner.credentials.get(owner))
            .cloned())
    }

    fn credential_count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.by_sequence.len() as u64)
    }

    fn iter_credentials(&self) -> Result<Vec<Credential>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .by_sequence
            .values()
            .filter_map(|owner| inner.credentials.get(owner))
            .cloned()
            .collect())
    }
}

impl VoteStore for NullStore {
    fn append_vote(&self, record: &VoteRecord) -> Result<Tally, StoreError> {
        let mut inner = self.write()?;
        let tally = inner
            .tally
            .record(record.choice)
            .ok_or_else(|| StoreError::Backend("tally counter overflow".into()))?;
        let index = inner.votes.len();
        inner.votes.push(record.clone());
        inner
            .by_voter
            .entry(record.voter.clone())
            .or_default()
            .push(index);
        inner.tally = tally;
        Ok(tally)
    }

    fn last_vote_at(&self, voter: &Identity) -> Result<Option<Timestamp>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .by_voter
            .get(voter)
            .and_then(|indexes| indexes.last())
            .map(|&i| inner.votes[i].cast_at))
    }

    fn votes_by(&self, voter: &Identity) -> Result<Vec<VoteRecord>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .by_voter
            .get(voter)
            .map(|indexes| indexes.iter().map(|&i| inner.votes[i].clone()).collect())
            .unwrap_or_default())
    }

    fn vote_count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.votes.len() as u64)
    }

    fn tally(&self) -> Result<Tally, StoreError> {
        Ok(self.read()?.tally)
    }

    fn iter_votes(&self) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self.read()?.votes.clone())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.write()?.meta.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.read()?.meta.get(key).cloned())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        Ok(self.read()?.schema_version)
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.write()?.schema_version = version;
        Ok(())
    }
}
