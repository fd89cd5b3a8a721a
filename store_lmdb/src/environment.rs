//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::credential::LmdbCredentialStore;
use crate::meta::LmdbMetaStore;
use crate::migration::Migrator;
use crate::vote::LmdbVoteStore;
use crate::LmdbError;

/// Default LMDB map size: 64 MiB.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// Default maximum number of named databases.
pub const DEFAULT_MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
///
/// LMDB serialises write transactions and serves readers from MVCC
/// snapshots, so readers never block the single writer.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) credentials_db: Database<Bytes, Bytes>,
    pub(crate) credential_seq_db: Database<Bytes, Bytes>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) voter_votes_db: Database<Bytes, Bytes>,
    pub(crate) last_vote_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path and bring its
    /// schema up to date.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process and
        // the memory map is only accessed through heed transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let credentials_db = env.create_database(&mut wtxn, Some("credentials"))?;
        let credential_seq_db = env.create_database(&mut wtxn, Some("credential_seq"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let voter_votes_db = env.create_database(&mut wtxn, Some("voter_votes"))?;
        let last_vote_db = env.create_database(&mut wtxn, Some("last_vote"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            credentials_db,
            credential_seq_db,
            votes_db,
            voter_votes_db,
            last_vote_db,
            meta_db,
        };

        Migrator::run(&environment.meta_store())?;
        tracing::info!(path = %path.display(), "opened LMDB environment");
        Ok(environment)
    }

    pub(crate) fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn credential_store(&self) -> LmdbCredentialStore {
        LmdbCredentialStore {
            env: Arc::clone(&self.env),
            credentials_db: self.credentials_db,
            credential_seq_db: self.credential_seq_db,
        }
    }

    pub fn vote_store(&self) -> LmdbVoteStore {
        LmdbVoteStore {
            env: Arc::clone(&self.env),
            votes_db: self.votes_db,
            voter_votes_db: self.voter_votes_db,
            last_vote_db: self.last_vote_db,
            meta_db: self.meta_db,
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votegate_store::MetaStore;

    #[test]
    fn open_creates_directory_and_sets_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger");
        let env = LmdbEnvironment::open(&path, DEFAULT_MAX_DBS, 1 << 20).unwrap();
        assert!(path.join("data.mdb").exists());
        assert_eq!(
            env.meta_store().get_schema_version().unwrap(),
            crate::migration::CURRENT_SCHEMA_VERSION
        );
    }

    #[test]
    fn reopen_existing_environment() {
        let dir = tempfile::tempdir().unwrap();
        {
            LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 1 << 20).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAX_DBS, 1 << 20).unwrap();
        assert_eq!(
            env.meta_store().get_schema_version().unwrap(),
            crate::migration::CURRENT_SCHEMA_VERSION
        );
    }
}
