//! Canonical serialization for deterministic hashing.
//!
//! Page fingerprints are computed over canonical JSON so that two resolutions
//! against the same snapshot with the same arguments can be compared cheaply.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - Stable Vec order: Vectors serialize in index order
//! - No HashMap allowed: Use BTreeMap for maps in hashed data

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// Values that fail to serialize hash as the empty byte string.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let paths = vec![vec![1i64, 2, 4, 5], vec![1, 3, 4, 5]];

        let h1 = canonical_hash(&paths);
        let h2 = canonical_hash(&paths);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_order_sensitive() {
        let forward = vec![vec![1i64, 2], vec![1, 3]];
        let reversed = vec![vec![1i64, 3], vec![1, 2]];

        assert_ne!(canonical_hash_hex(&forward), canonical_hash_hex(&reversed));
        assert_eq!(canonical_hash_hex(&forward).len(), 16);
    }
}
