use thiserror::Error;
use votegate_store::StoreError;
use votegate_types::{FailureClass, Identity};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("identity {0} already holds a credential")]
    AlreadyIssued(Identity),

    #[error("credential storage unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

impl CredentialError {
    pub fn class(&self) -> FailureClass {
        match self {
            Self::AlreadyIssued(_) => FailureClass::Rejected,
            Self::Unavailable(_) => FailureClass::Transient,
        }
    }

    /// Whether retrying the same call can succeed without any state change.
    pub fn is_retryable(&self) -> bool {
        self.class() == FailureClass::Transient
    }
}
