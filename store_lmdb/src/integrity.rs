//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the ballot starts
//! accepting writes. Checks the invariants the stores maintain across
//! databases: both credential indexes agree, every vote is indexed for its
//! voter, and the stored tally equals a recount of the vote log.

use std::path::Path;

use votegate_types::{Tally, VoteRecord};

use crate::vote::TALLY_KEY;
use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub credentials: u64,
    pub votes: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check LMDB database integrity on startup.
///
/// Read failures and invariant violations are recorded in the report rather
/// than causing a hard error; only failing to start a read transaction does.
pub fn check_integrity(environment: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let env = environment.env();
    let rtxn = env.read_txn()?;
    let mut errors = Vec::new();

    let credentials = environment.credentials_db.len(&rtxn)?;
    let sequences = environment.credential_seq_db.len(&rtxn)?;
    if credentials != sequences {
        errors.push(format!(
            "credential index mismatch: {credentials} owners vs {sequences} sequence entries"
        ));
    }

    let votes = environment.votes_db.len(&rtxn)?;
    let indexed = environment.voter_votes_db.len(&rtxn)?;
    if votes != indexed {
        errors.push(format!(
            "vote index mismatch: {votes} log entries vs {indexed} voter index entries"
        ));
    }

    let mut recount = Tally::default();
    for entry in environment.votes_db.iter(&rtxn)? {
        let (_index, bytes) = entry?;
        match bincode::deserialize::<VoteRecord>(bytes) {
            Ok(record) => match recount.record(record.choice) {
                Some(next) => recount = next,
                None => errors.push("tally recount overflowed".to_string()),
            },
            Err(e) => errors.push(format!("undecodable vote record: {e}")),
        }
    }

    let stored = match environment.meta_db.get(&rtxn, TALLY_KEY)? {
        Some(bytes) => bincode::deserialize::<Tally>(bytes)?,
        None => Tally::default(),
    };
    if stored != recount {
        errors.push(format!(
            "tally mismatch: stored {}/{} vs recount {}/{}",
            stored.yes, stored.no, recount.yes, recount.no
        ));
    }

    Ok(IntegrityReport {
        credentials,
        votes,
        errors,
    })
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent or empty) directory. Returns an
/// error if the directory holds other files but `data.mdb` is missing, which
/// suggests corruption or a misconfigured path.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    let mut entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) if !path.exists() => return Ok(()),
        Err(e) => return Err(format!("cannot read {}: {e}", path.display())),
    };
    if entries.next().is_none() {
        return Ok(());
    }
    if !path.join("data.mdb").exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use votegate_store::{CredentialStore, VoteStore};
    use votegate_types::{Credential, Identity, Timestamp};

    #[test]
    fn check_data_dir_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_data_dir(&dir.path().join("missing")).is_ok());
    }

    #[test]
    fn check_data_dir_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_data_dir(dir.path()).is_ok());
    }

    #[test]
    fn check_data_dir_without_data_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stray.txt"), b"x").unwrap();
        assert!(check_data_dir(dir.path()).is_err());
    }

    #[test]
    fn check_data_dir_after_open() {
        let dir = tempfile::tempdir().unwrap();
        let _env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        assert!(check_data_dir(dir.path()).is_ok());
    }

    #[test]
    fn populated_database_is_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        env.credential_store()
            .append_credential(&Credential {
                owner: Identity::new("alice"),
                sequence: 1,
                issued_at: Timestamp::new(1),
            })
            .unwrap();
        for (i, choice) in [true, false, true].into_iter().enumerate() {
            env.vote_store()
                .append_vote(&VoteRecord {
                    voter: Identity::new("alice"),
                    choice,
                    cast_at: Timestamp::new(i as u64),
                })
                .unwrap();
        }

        let report = check_integrity(&env).unwrap();
        assert!(report.is_healthy(), "{:?}", report.errors);
        assert_eq!(report.credentials, 1);
        assert_eq!(report.votes, 3);
    }

    #[test]
    fn tampered_tally_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        env.vote_store()
            .append_vote(&VoteRecord {
                voter: Identity::new("bob"),
                choice: true,
                cast_at: Timestamp::new(1),
            })
            .unwrap();

        let forged = bincode::serialize(&Tally { yes: 5, no: 0 }).unwrap();
        let mut wtxn = env.env().write_txn().unwrap();
        env.meta_db.put(&mut wtxn, TALLY_KEY, &forged).unwrap();
        wtxn.commit().unwrap();

        let report = check_integrity(&env).unwrap();
        assert!(!report.is_healthy());
        assert!(report.errors[0].contains("tally mismatch"));
    }
}
