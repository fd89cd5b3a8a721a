//! Fixed-length LMDB keys for identities.
//!
//! LMDB refuses empty keys and keys longer than 511 bytes, while an
//! [`Identity`] may be any string. Every database keyed by identity uses the
//! 32-byte Blake2b digest of the raw key instead, so all identities the
//! in-memory backend accepts are storable here too.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use votegate_types::Identity;

type Blake2b256 = Blake2b<U32>;

pub(crate) const IDENTITY_KEY_LEN: usize = 32;

pub(crate) fn identity_key(identity: &Identity) -> [u8; IDENTITY_KEY_LEN] {
    let mut hasher = Blake2b256::new();
    hasher.update(identity.as_bytes());
    let result = hasher.finalize();
    let mut output = [0u8; IDENTITY_KEY_LEN];
    output.copy_from_slice(&result);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_length_is_fixed() {
        for raw in [String::new(), "a".to_string(), "x".repeat(4096)] {
            assert_eq!(identity_key(&Identity::new(raw)).len(), IDENTITY_KEY_LEN);
        }
    }

    #[test]
    fn distinct_identities_get_distinct_keys() {
        assert_ne!(
            identity_key(&Identity::new("alice")),
            identity_key(&Identity::new("Alice"))
        );
        assert_eq!(
            identity_key(&Identity::new("alice")),
            identity_key(&Identity::new("alice"))
        );
    }
}
