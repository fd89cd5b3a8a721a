use thiserror::Error;
use votegate_types::BallotParams;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("ballot parameters differ from the deployed ones: stored {stored:?}, configured {configured:?}")]
    ParamsMismatch {
        stored: BallotParams,
        configured: BallotParams,
    },

    #[error("database integrity check failed: {0}")]
    Integrity(String),

    #[error("store error: {0}")]
    Store(#[from] votegate_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] votegate_store_lmdb::LmdbError),

    #[error("credential error: {0}")]
    Credential(#[from] votegate_credential::CredentialError),

    #[error("ballot error: {0}")]
    Ballot(#[from] votegate_ballot::BallotError),
}
