use std::sync::Arc;

use votegate_ballot::{
    BallotError, BallotLedger, EligibilityState, QueryFacade, VoterSummary,
};
use votegate_credential::{CredentialError, CredentialRegistry};
use votegate_nullables::NullStore;
use votegate_store::{CredentialStore, MetaStore, StoreError, VoteStore};
use votegate_store_lmdb::{check_data_dir, check_integrity, IntegrityReport, LmdbEnvironment};
use votegate_types::{
    BallotParams, ClockSource, Credential, EventBus, Identity, SystemClock, Tally, VoteRecord,
};

use crate::config::{NodeConfig, StorageBackend};
use crate::NodeError;

/// Meta key under which the deployed [`BallotParams`] are pinned.
const PARAMS_META_KEY: &str = "ballot_params";

/// A running ballot: registry, ledger and query facade sharing one clock and
/// one storage backend.
pub struct BallotNode {
    pub config: NodeConfig,
    params: BallotParams,
    registry: Arc<CredentialRegistry>,
    ledger: Arc<BallotLedger>,
    facade: QueryFacade,
    /// Present only for the LMDB backend.
    lmdb: Option<LmdbEnvironment>,
}

impl BallotNode {
    /// Open a node on the wall clock with no event subscribers.
    pub fn open(config: NodeConfig) -> Result<Self, NodeError> {
        Self::open_with(config, Arc::new(SystemClock::new()), EventBus::new())
    }

    /// Open a node with an explicit clock and event bus.
    ///
    /// Validates the configuration, opens the storage backend, checks LMDB
    /// integrity, pins the ballot parameters on first open and refuses to
    /// start if they differ from the pinned ones afterwards.
    pub fn open_with(
        config: NodeConfig,
        clock: Arc<dyn ClockSource>,
        events: EventBus,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let params = config.params();

        let (credentials, votes, meta, lmdb): (
            Arc<dyn CredentialStore>,
            Arc<dyn VoteStore>,
            Arc<dyn MetaStore>,
            Option<LmdbEnvironment>,
        ) = match config.storage {
            StorageBackend::Lmdb => {
                check_data_dir(&config.data_dir).map_err(NodeError::Integrity)?;
                let env = LmdbEnvironment::open(
                    &config.data_dir,
                    config.lmdb_max_dbs,
                    config.lmdb_map_size,
                )?;
                let report = check_integrity(&env)?;
                if !report.is_healthy() {
                    for error in &report.errors {
                        tracing::warn!(error = %error, "integrity check");
                    }
                    return Err(NodeError::Integrity(report.errors.join("; ")));
                }
                (
                    Arc::new(env.credential_store()) as Arc<dyn CredentialStore>,
                    Arc::new(env.vote_store()) as Arc<dyn VoteStore>,
                    Arc::new(env.meta_store()) as Arc<dyn MetaStore>,
                    Some(env),
                )
            }
            StorageBackend::Memory => {
                let store = Arc::new(NullStore::new());
                (
                    store.clone() as Arc<dyn CredentialStore>,
                    store.clone() as Arc<dyn VoteStore>,
                    store as Arc<dyn MetaStore>,
                    None,
                )
            }
        };

        pin_params(meta.as_ref(), &params)?;

        let events = Arc::new(events);
        let registry = Arc::new(
            CredentialRegistry::new(credentials, clock.clone(), &params)
                .with_events(events.clone()),
        );
        let ledger = Arc::new(
            BallotLedger::new(registry.clone(), votes, clock, &params).with_events(events),
        );
        let facade = QueryFacade::new(registry.clone(), ledger.clone());

        tracing::info!(
            storage = ?config.storage,
            cooldown_secs = params.cooldown_secs,
            credentials = registry.issued_count()?,
            votes = ledger.vote_count()?,
            "ballot node opened"
        );

        Ok(Self {
            config,
            params,
            registry,
            ledger,
            facade,
            lmdb,
        })
    }

    pub fn params(&self) -> BallotParams {
        self.params
    }

    pub fn registry(&self) -> &Arc<CredentialRegistry> {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<BallotLedger> {
        &self.ledger
    }

    pub fn facade(&self) -> &QueryFacade {
        &self.facade
    }

    pub fn issue_credential(&self, identity: &Identity) -> Result<Credential, CredentialError> {
        self.registry.issue(identity)
    }

    pub fn cast_vote(&self, identity: &Identity, choice: bool) -> Result<VoteRecord, BallotError> {
        self.ledger.cast_vote(identity, choice)
    }

    pub fn eligibility_status(&self, identity: &Identity) -> Result<EligibilityState, BallotError> {
        self.facade.eligibility_status(identity)
    }

    pub fn current_tally(&self) -> Result<Tally, BallotError> {
        self.facade.current_tally()
    }

    pub fn voter_summary(&self, identity: &Identity) -> Result<VoterSummary, BallotError> {
        self.facade.voter_summary(identity)
    }

    /// Re-run the LMDB integrity check. `None` for the memory backend.
    pub fn integrity_report(&self) -> Result<Option<IntegrityReport>, NodeError> {
        match &self.lmdb {
            Some(env) => Ok(Some(check_integrity(env)?)),
            None => Ok(None),
        }
    }
}

/// Write `params` on first open; afterwards they must match what is stored.
fn pin_params(meta: &dyn MetaStore, params: &BallotParams) -> Result<(), NodeError> {
    match meta.get_meta(PARAMS_META_KEY)? {
        Some(bytes) => {
            let stored: BallotParams = bincode::deserialize(&bytes)
                .map_err(|e| StoreError::Corruption(format!("pinned ballot params: {e}")))?;
            if stored != *params {
                tracing::warn!(?stored, configured = ?params, "ballot parameter mismatch");
                return Err(NodeError::ParamsMismatch {
                    stored,
                    configured: *params,
                });
            }
        }
        None => {
            let bytes = bincode::serialize(params)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            meta.put_meta(PARAMS_META_KEY, &bytes)?;
            tracing::info!(
                cooldown_secs = params.cooldown_secs,
                sequence_base = params.sequence_base,
                "pinned ballot parameters"
            );
        }
    }
    Ok(())
}
