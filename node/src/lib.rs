//! votegate node: the ballot assembled from its parts.
//!
//! The node
//! - loads [`NodeConfig`] from TOML,
//! - opens the LMDB or in-memory storage backend,
//! - pins the ballot parameters so every restart enforces the same cooldown,
//! - wires the credential registry, ballot ledger and query facade onto one
//!   shared clock.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;

pub use config::{NodeConfig, StorageBackend};
pub use error::NodeError;
pub use logging::init_from_config;
pub use node::BallotNode;
