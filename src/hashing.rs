//! Descriptor hashing and folding.
//!
//! A fragment descriptor maps to a bit index via an unseeded xxh64 hash
//! folded modulo the fingerprint length. Two different descriptors landing
//! on the same index both set that bit; the reasoning trace records the
//! identities this fold discards.
//!
//! ## Determinism guarantees
//!
//! - Fixed hash seed (0); no per-process randomness
//! - Stable modulo fold: same descriptor + same length -> same bit index

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Default fingerprint length in bits.
pub const DEFAULT_FINGERPRINT_BITS: usize = 2048;

/// Resolve a requested bit length: zero falls back to the default.
pub fn resolve_bit_length(requested: usize) -> usize {
    if requested == 0 {
        DEFAULT_FINGERPRINT_BITS
    } else {
        requested
    }
}

/// Deterministic hash of a descriptor string.
pub fn descriptor_hash(descriptor: &str) -> u64 {
    xxh64(descriptor.as_bytes(), 0)
}

/// Fold a descriptor into a bit index within `[0, bits)`. A `bits` of zero
/// resolves to the default length, like every other bit-length input.
pub fn fold_descriptor(descriptor: &str, bits: usize) -> usize {
    let bits = resolve_bit_length(bits);
    (descriptor_hash(descriptor) % bits as u64) as usize
}

/// Canonical hash of any serializable value, as a hex string. Used for
/// configuration provenance (`params_hash`).
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).expect("canonical serialization failed");
    format!("{:016x}", xxh64(&bytes, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_across_calls() {
        let a = descriptor_hash("r0:[CH3:1]");
        let b = descriptor_hash("r0:[CH3:1]");
        assert_eq!(a, b);
    }

    #[test]
    fn fold_stays_in_range() {
        for bits in [1usize, 7, 64, 2048, 4096] {
            for token in ["r0:[CH3:1]", "r1:[OH:1]-[CH2]", "r2:[cH:1]:1"] {
                assert!(fold_descriptor(token, bits) < bits);
            }
        }
    }

    #[test]
    fn different_descriptors_usually_differ() {
        // Not a collision-freedom guarantee, just a sanity check that the
        // hash actually distributes.
        let a = fold_descriptor("r0:[CH3:1]", 2048);
        let b = fold_descriptor("r0:[OH:1]", 2048);
        assert_ne!(a, b);
    }

    #[test]
    fn zero_bits_resolves_to_default() {
        assert_eq!(resolve_bit_length(0), DEFAULT_FINGERPRINT_BITS);
        assert_eq!(resolve_bit_length(512), 512);
    }

    #[test]
    fn zero_bits_fold_uses_the_default_modulus() {
        let token = "r1:[CH3:1]-[OH]";
        let folded = fold_descriptor(token, 0);
        assert_eq!(folded, fold_descriptor(token, DEFAULT_FINGERPRINT_BITS));
        assert!(folded < DEFAULT_FINGERPRINT_BITS);
    }

    #[test]
    fn params_hash_format() {
        #[derive(Serialize)]
        struct Params {
            radius: u32,
        }
        let h = canonical_hash_hex(&Params { radius: 2 });
        assert_eq!(h.len(), 16);
        assert_eq!(h, canonical_hash_hex(&Params { radius: 2 }));
        assert_ne!(h, canonical_hash_hex(&Params { radius: 3 }));
    }
}
