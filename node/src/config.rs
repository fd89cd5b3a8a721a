//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use votegate_store_lmdb::{DEFAULT_MAP_SIZE, DEFAULT_MAX_DBS};
use votegate_types::BallotParams;
use votegate_utils::LogFormat;

use crate::NodeError;

/// Databases the LMDB backend creates in its environment.
const LMDB_DATABASES: u32 = 6;

/// Where ballot state lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Durable LMDB environment under `data_dir`.
    Lmdb,
    /// Process-local store, lost on exit.
    Memory,
}

/// Configuration for a ballot node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for LMDB storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    /// LMDB memory map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    #[serde(default = "default_lmdb_max_dbs")]
    pub lmdb_max_dbs: u32,

    /// Minimum seconds between two accepted votes by one identity.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Sequence number of the first issued credential.
    #[serde(default = "default_sequence_base")]
    pub sequence_base: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./votegate_data")
}

fn default_storage() -> StorageBackend {
    StorageBackend::Lmdb
}

fn default_lmdb_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_lmdb_max_dbs() -> u32 {
    DEFAULT_MAX_DBS
}

fn default_cooldown_secs() -> u64 {
    BallotParams::DEFAULT_COOLDOWN_SECS
}

fn default_sequence_base() -> u64 {
    BallotParams::default().sequence_base
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// In-memory configuration, handy for tests and demos.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The ballot parameters every component is wired with.
    pub fn params(&self) -> BallotParams {
        BallotParams {
            cooldown_secs: self.cooldown_secs,
            sequence_base: self.sequence_base,
        }
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse().map_err(NodeError::Config)
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        self.params()
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))?;
        self.log_format()?;
        if self.storage == StorageBackend::Lmdb {
            if self.lmdb_max_dbs < LMDB_DATABASES {
                return Err(NodeError::Config(format!(
                    "lmdb_max_dbs must be at least {LMDB_DATABASES}, got {}",
                    self.lmdb_max_dbs
                )));
            }
            if self.lmdb_map_size == 0 {
                return Err(NodeError::Config("lmdb_map_size must be non-zero".into()));
            }
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: default_storage(),
            lmdb_map_size: default_lmdb_map_size(),
            lmdb_max_dbs: default_lmdb_max_dbs(),
            cooldown_secs: default_cooldown_secs(),
            sequence_base: default_sequence_base(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
