//! Schema version check run on every open.
//!
//! Version 1 is the only layout so far: six databases, with every
//! identity-keyed entry stored under the 32-byte identity key.

use votegate_store::{MetaStore, StoreError};

use crate::LmdbError;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Stamps fresh environments and refuses layouts this build cannot read.
pub struct Migrator;

impl Migrator {
    pub fn run(meta_store: &impl MetaStore) -> Result<(), LmdbError> {
        match meta_store.get_schema_version().map_err(schema_error)? {
            0 => {
                meta_store
                    .set_schema_version(CURRENT_SCHEMA_VERSION)
                    .map_err(schema_error)?;
                tracing::info!(version = CURRENT_SCHEMA_VERSION, "stamped new ballot database");
                Ok(())
            }
            CURRENT_SCHEMA_VERSION => Ok(()),
            other => Err(LmdbError::Schema(format!(
                "ballot database has schema version {other}, expected {CURRENT_SCHEMA_VERSION}"
            ))),
        }
    }
}

fn schema_error(e: StoreError) -> LmdbError {
    LmdbError::Schema(e.to_string())
}
