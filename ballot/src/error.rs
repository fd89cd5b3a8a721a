use thiserror::Error;
use votegate_store::StoreError;
use votegate_types::{FailureClass, Identity};
use votegate_utils::format_duration;

#[derive(Debug, Error)]
pub enum BallotError {
    #[error("identity {0} holds no credential and cannot vote")]
    NotEligible(Identity),

    #[error("identity {voter} is on cooldown; next vote allowed in {}", human_wait(.remaining_secs))]
    OnCooldown { voter: Identity, remaining_secs: u64 },

    #[error("ballot storage unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

fn human_wait(secs: &u64) -> String {
    format_duration(*secs)
}

impl BallotError {
    pub fn class(&self) -> FailureClass {
        match self {
            Self::NotEligible(_) | Self::OnCooldown { .. } => FailureClass::Rejected,
            Self::Unavailable(_) => FailureClass::Transient,
        }
    }

    /// Whether retrying the same call right away can succeed without any
    /// state change. A cooldown rejection becomes retryable only after
    /// [`retry_after_secs`](Self::retry_after_secs).
    pub fn is_retryable(&self) -> bool {
        self.class() == FailureClass::Transient
    }

    /// Seconds to wait before a retry can succeed, when known.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::OnCooldown { remaining_secs, .. } => Some(*remaining_secs),
            Self::Unavailable(_) => Some(0),
            Self::NotEligible(_) => None,
        }
    }
}
