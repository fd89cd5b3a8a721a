//! LMDB implementation of VoteStore.
//!
//! `votes` is the append-only log keyed by big-endian log index.
//! `voter_votes` indexes it per voter with composite keys
//! `identity_key(voter) ++ index`; identity keys have a fixed length, so a
//! prefix scan never crosses into another voter. `last_vote` holds each
//! voter's latest `cast_at` and the tally lives in `meta`. A vote append
//! touches all four in one write transaction.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use votegate_store::{StoreError, VoteStore};
use votegate_types::{Identity, Tally, Timestamp, VoteRecord};

use crate::keys::{identity_key, IDENTITY_KEY_LEN};
use crate::LmdbError;

pub(crate) const TALLY_KEY: &[u8] = b"tally";

pub struct LmdbVoteStore {
    pub(crate) env: Arc<Env>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) voter_votes_db: Database<Bytes, Bytes>,
    pub(crate) last_vote_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

/// `voter_votes` key for the vote at `index` of the log.
fn voter_vote_key(voter: &Identity, index: &[u8; 8]) -> [u8; IDENTITY_KEY_LEN + 8] {
    let mut key = [0u8; IDENTITY_KEY_LEN + 8];
    key[..IDENTITY_KEY_LEN].copy_from_slice(&identity_key(voter));
    key[IDENTITY_KEY_LEN..].copy_from_slice(index);
    key
}

/// Smallest key greater than every key starting with `prefix`, or `None` if
/// the prefix is all `0xFF`.
fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(last) = upper.pop() {
        if last < u8::MAX {
            upper.push(last + 1);
            return Some(upper);
        }
    }
    None
}

fn be_u64(bytes: &[u8], what: &str) -> Result<u64, StoreError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StoreError::Serialization(format!("{what} has unexpected byte length")))?;
    Ok(u64::from_be_bytes(arr))
}

impl LmdbVoteStore {
    fn read_tally(&self, txn: &RoTxn) -> Result<Tally, StoreError> {
        match self.meta_db.get(txn, TALLY_KEY).map_err(LmdbError::from)? {
            Some(bytes) => Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?),
            None => Ok(Tally::default()),
        }
    }

    fn read_record(&self, txn: &RoTxn, index: &[u8]) -> Result<VoteRecord, StoreError> {
        let bytes = self
            .votes_db
            .get(txn, index)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::Corruption("voter index points at a missing vote".into()))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }
}

impl VoteStore for LmdbVoteStore {
    fn append_vote(&self, record: &VoteRecord) -> Result<Tally, StoreError> {
        let value = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let index = self.votes_db.len(&wtxn).map_err(LmdbError::from)?;
        let index_key = index.to_be_bytes();
        let tally = self
            .read_tally(&wtxn)?
            .record(record.choice)
            .ok_or_else(|| StoreError::Backend("tally counter overflow".into()))?;
        let tally_bytes = bincode::serialize(&tally).map_err(LmdbError::from)?;

        let voter_key = voter_vote_key(&record.voter, &index_key);

        self.votes_db
            .put(&mut wtxn, &index_key, &value)
            .map_err(LmdbError::from)?;
        self.voter_votes_db
            .put(&mut wtxn, &voter_key, &index_key)
            .map_err(LmdbError::from)?;
        self.last_vote_db
            .put(
                &mut wtxn,
                &identity_key(&record.voter),
                &record.cast_at.as_secs().to_be_bytes(),
            )
            .map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, TALLY_KEY, &tally_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(tally)
    }

    fn last_vote_at(&self, voter: &Identity) -> Result<Option<Timestamp>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .last_vote_db
            .get(&rtxn, &identity_key(voter))
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(Timestamp::new(be_u64(bytes, "last_vote")?))),
            None => Ok(None),
        }
    }

    fn votes_by(&self, voter: &Identity) -> Result<Vec<VoteRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = identity_key(voter);
        let upper = prefix_upper_bound(&prefix);
        let bounds = (
            Bound::Included(prefix.as_slice()),
            match &upper {
                Some(upper) => Bound::Excluded(upper.as_slice()),
                None => Bound::Unbounded,
            },
        );
        let iter = self
            .voter_votes_db
            .range(&rtxn, &bounds)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, index) = entry.map_err(LmdbError::from)?;
            results.push(self.read_record(&rtxn, index)?);
        }
        Ok(results)
    }

    fn vote_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.votes_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn tally(&self) -> Result<Tally, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.read_tally(&rtxn)
    }

    fn iter_votes(&self) -> Result<Vec<VoteRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.votes_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_index, bytes) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(results)
    }
}
