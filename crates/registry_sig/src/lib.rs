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

//! Signature gateway for the stake registry.
//!
//! Registration and delegation checks only see the [`SignatureScheme`] capability:
//! sign, verify, and aggregate over domain-separated messages. Two schemes ship here:
//! [`Bls12381`] (aggregatable, min-pk) and [`Ed25519`].

use core::fmt::Debug;
use registry_primitives::le_bytes;
use thiserror::Error;

pub mod bls;
pub mod ed25519;

pub use bls::{BlsPublicKey, BlsSignature, Bls12381, BLS_DST};
pub use ed25519::{Ed25519, Pk32, Sig64};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("malformed public key")]
    MalformedPublicKey,
    #[error("malformed signature")]
    MalformedSignature,
    #[error("secret key derivation failed")]
    KeyGeneration,
    #[error("nothing to aggregate")]
    EmptyAggregate,
    #[error("{scheme} does not support aggregation")]
    AggregationUnsupported { scheme: &'static str },
    #[error("aggregation failed")]
    AggregationFailed,
}

/// Opaque asymmetric signature capability.
///
/// Every call is scoped to a domain separator; the same message signed under two
/// different domains yields signatures that never verify across them.
pub trait SignatureScheme: Copy + Debug + Default + Eq + Send + Sync + 'static {
    type SecretKey;
    type PublicKey: Copy + Eq + Debug + AsRef<[u8]> + Send + Sync + 'static;
    type Signature: Copy + Eq + Debug + AsRef<[u8]> + Send + Sync + 'static;

    const NAME: &'static str;
    const PUBLIC_KEY_LEN: usize;
    const SIGNATURE_LEN: usize;

    /// Deterministic secret key from 32 bytes of seed material.
    fn secret_key_from_seed(seed: &[u8; 32]) -> Result<Self::SecretKey, SignatureError>;

    fn public_key(secret: &Self::SecretKey) -> Self::PublicKey;

    fn sign(message: &[u8], secret: &Self::SecretKey, domain: &[u8]) -> Self::Signature;

    fn verify(
        message: &[u8],
        signature: &Self::Signature,
        public_key: &Self::PublicKey,
        domain: &[u8],
    ) -> bool;

    /// Combine signatures over one message into a single signature.
    fn aggregate(signatures: &[Self::Signature]) -> Result<Self::Signature, SignatureError>;

    /// Combine public keys so that an aggregate signature verifies against the result.
    fn aggregate_public_keys(keys: &[Self::PublicKey]) -> Result<Self::PublicKey, SignatureError>;

    fn public_key_from_slice(bytes: &[u8]) -> Result<Self::PublicKey, SignatureError>;

    fn signature_from_slice(bytes: &[u8]) -> Result<Self::Signature, SignatureError>;
}

/// Bytes actually signed: `LE32(|domain|) || domain || message`.
#[must_use]
pub fn signing_input(domain: &[u8], message: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(4 + domain.len() + message.len());
    v.extend_from_slice(&le_bytes::<4>(domain.len() as u128));
    v.extend_from_slice(domain);
    v.extend_from_slice(message);
    v
}

pub(crate) const fn check_len(expected: usize, got: usize) -> Result<(), SignatureError> {
    if expected == got {
        Ok(())
    } else {
        Err(SignatureError::InvalidLength { expected, got })
    }
}
