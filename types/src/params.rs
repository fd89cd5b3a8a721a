//! Deployment constants shared by every component.
//!
//! Both values are fixed when a ballot is first deployed and must be identical
//! for every component that reads them.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// Ballot parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotParams {
    /// Minimum number of seconds between two accepted votes by the same identity.
    /// Default: 24 hours = 86400 seconds.
    pub cooldown_secs: u64,

    /// Sequence number given to the first issued credential.
    pub sequence_base: u64,
}

impl BallotParams {
    /// 24 hours in seconds.
    pub const DEFAULT_COOLDOWN_SECS: u64 = 86_400;

    /// Short cooldown for local development.
    pub fn dev_defaults() -> Self {
        Self {
            cooldown_secs: 60,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.cooldown_secs == 0 {
            return Err(TypesError::InvalidParams(
                "cooldown_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for BallotParams {
    fn default() -> Self {
        Self {
            cooldown_secs: Self::DEFAULT_COOLDOWN_SECS,
            sequence_base: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_daily_ballot() {
        let p = BallotParams::default();
        assert_eq!(p.cooldown_secs, 86_400);
        assert_eq!(p.sequence_base, 1);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_cooldown_rejected() {
        let p = BallotParams {
            cooldown_secs: 0,
            sequence_base: 1,
        };
        assert!(matches!(p.validate(), Err(TypesError::InvalidParams(_))));
    }
}
