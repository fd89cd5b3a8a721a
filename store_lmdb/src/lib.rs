//! LMDB storage backend for votegate.
//!
//! Implements all storage traits from `votegate-store` using the `heed` LMDB bindings.
//! Each logical store maps to one or more LMDB databases within a single environment.

pub mod credential;
pub mod environment;
pub mod error;
pub mod integrity;
mod keys;
pub mod meta;
pub mod migration;
pub mod vote;

pub use credential::LmdbCredentialStore;
pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE, DEFAULT_MAX_DBS};
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use meta::LmdbMetaStore;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
pub use vote::LmdbVoteStore;
