#![forbid(unsafe_code)]

pub const TAG_MERKLE_NODE: &str = "registry.merkle.node";
pub const TAG_REGISTRATION_LEAF: &str = "registry.leaf";

/// Base units per stored collateral minor unit (1 gwei-style unit = 10^9 base units).
pub const COLLATERAL_UNIT: u128 = 1_000_000_000;

/// Minimum escrow per operator, in minor units (0.1 whole units).
pub const MIN_COLLATERAL: u64 = 100_000_000;
/// Minimum height delta between unregister and claim.
pub const MIN_UNREGISTRATION_DELAY: u64 = 64;
/// Heights after registration during which malformed registrations may be challenged.
pub const FRAUD_PROOF_WINDOW: u64 = 7_200;

/// Domain separator for registration signatures.
pub const REGISTRATION_DOMAIN: &[u8] = b"registry.registration.v1";

/// Upper bound on delegation metadata accepted by the decoder.
pub const MAX_METADATA_LEN: usize = 65_536;

/// Width of an account address on the wire.
pub const ADDRESS_LEN: usize = 20;
