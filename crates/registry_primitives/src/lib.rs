#![forbid(unsafe_code)]
#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::multiple_crate_versions
)]

//! Stake registry primitives: tagged hashing, fixed-width encodings, Merkle accumulator.
//
// Shared by the signature gateway and the registry ledger:
//
// - Domain-tagged SHA3-256 with length framing
// - Fixed-width big-endian (wire) and little-endian (framing) integer encodings
// - Zero-padded binary Merkle accumulator with proof generation and verification
// - Constant-time equality helpers for 32-byte digests

use sha3::{Digest, Sha3_256};
use subtle::ConstantTimeEq;

/// 32-byte hash (SHA3-256 output).
pub type Hash256 = [u8; 32];

/// The all-zero hash: degenerate root and Merkle padding leaf.
pub const ZERO_HASH: Hash256 = [0u8; 32];

pub mod constants;
pub mod merkle;

pub use merkle::{
    merkle_node, merkle_proof, merkle_root, merkle_root_with_height, merkle_verify, tree_height,
    MerkleError, MerklePath, MAX_TREE_HEIGHT,
};

/// Convert an unsigned integer to fixed-width little-endian bytes.
///
/// The output is exactly `W` bytes (no overlong encodings).
#[must_use]
pub fn le_bytes<const W: usize>(mut x: u128) -> [u8; W] {
    let mut out = [0u8; W];
    let mut i = 0usize;
    while i < W {
        out[i] = (x & 0xFF) as u8;
        x >>= 8;
        i += 1;
    }
    out
}

/// Convert an unsigned integer to fixed-width big-endian bytes (wire order).
#[must_use]
pub fn be_bytes<const W: usize>(x: u128) -> [u8; W] {
    let mut out = le_bytes::<W>(x);
    out.reverse();
    out
}

/// Domain-tagged SHA3-256 with length framing:
/// `H(tag_ascii, parts[])` = `SHA3_256`( UTF8(tag) || Σ ( LE(|p|,8) || p ) )
#[must_use]
pub fn h_tag(tag: &str, parts: &[&[u8]]) -> Hash256 {
    debug_assert!(
        tag.starts_with("registry."),
        "non-registry.* tag used in commitment hashing: {tag}"
    );
    let mut hasher = Sha3_256::new();
    hasher.update(tag.as_bytes());
    for p in parts {
        let len_le = le_bytes::<8>(p.len() as u128);
        hasher.update(len_le);
        hasher.update(p);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Leaf committed for one registered key: `H("registry.leaf", pk, sig)`.
///
/// Both the fraud-proof path and the commitment path recompute leaves with this function.
#[must_use]
pub fn registration_leaf(public_key: &[u8], signature: &[u8]) -> Hash256 {
    h_tag(constants::TAG_REGISTRATION_LEAF, &[public_key, signature])
}

/// Constant-time equality for two 32-byte hashes.
#[must_use]
pub fn ct_eq_hash(a: &Hash256, b: &Hash256) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tag_asserts {
    use super::*;

    #[test]
    fn all_public_tag_constants_are_registry_namespaced() {
        let tags = [
            constants::TAG_MERKLE_NODE,
            constants::TAG_REGISTRATION_LEAF,
        ];
        for t in tags {
            assert!(t.starts_with("registry."), "tag not registry.*: {t}");
        }
    }

    #[test]
    fn tag_constants_match_expected_ascii() {
        let checks: &[(&str, &[u8])] = &[
            (constants::TAG_MERKLE_NODE, b"registry.merkle.node"),
            (constants::TAG_REGISTRATION_LEAF, b"registry.leaf"),
        ];
        for (actual, expected) in checks {
            assert_eq!(
                (*actual).as_bytes(),
                *expected,
                "tag ASCII mismatch: {actual}"
            );
        }
    }
}
