#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

//! Stake registry.
//!
//! Operators escrow collateral and commit to a batch of keys with a single Merkle root.
//! Registration is cheap: no signature is checked until someone challenges.
//!
// Fixed choices:
// - Hash: SHA3-256 with `registry.*` ASCII tags and LE64 length framing
// - Merkle tree: binary, zero-padded to a power of two
// - Signatures: BLS12-381 min-pk (aggregatable) or Ed25519, behind one trait
// - Signing input: LE32(|domain|) || domain || message
// - Collateral: u64 minor units of 10^9 base units

pub use registry_ledger::{
    decode_delegation, encode_delegation, registration_leaves, registration_message,
    registration_proof, Adjudicator, AdjudicatorError, Address, CallContext, CodecError,
    ConfigError, Delegation, InMemoryTreasury, Operator, Payout, ReceiveHook, Registration,
    Registry, RegistryError, RegistryEvent, RegistryParams, Root, SignedDelegation,
    SlashVerdict, TransferError, Treasury,
};
pub use registry_primitives::{
    constants, ct_eq_hash, h_tag, merkle_proof, merkle_root, merkle_root_with_height,
    merkle_verify, registration_leaf, tree_height, Hash256, MerkleError, MerklePath,
    MAX_TREE_HEIGHT, ZERO_HASH,
};
pub use registry_sig::{
    signing_input, Bls12381, BlsPublicKey, BlsSignature, Ed25519, SignatureError,
    SignatureScheme,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
