//! Logging set-up driven by [`NodeConfig`].

use crate::{NodeConfig, NodeError};

/// Install the global subscriber using the configured format and level.
///
/// Returns `Ok(false)` if a subscriber was already installed.
pub fn init_from_config(config: &NodeConfig) -> Result<bool, NodeError> {
    let format = config.log_format()?;
    Ok(votegate_utils::init_logging(format, &config.log_level))
}
