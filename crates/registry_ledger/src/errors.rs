use crate::{adjudicator::AdjudicatorError, delegation::CodecError, treasury::TransferError, types::Address};
use registry_primitives::MerkleError;
use thiserror::Error;

/// Every way a registry operation can be rejected. State is untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    // input validation
    #[error("insufficient collateral: got {got} base units, need at least {min}")]
    InsufficientCollateral { got: u128, min: u128 },
    #[error("unregistration delay too short: got {got}, need at least {min}")]
    DelayTooShort { got: u64, min: u64 },
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error("commitment root is degenerate")]
    InvalidRoot,
    #[error("an operator is already registered under this root")]
    AlreadyRegistered,
    #[error("collateral overflows the minor-unit counter")]
    CollateralOverflow,
    #[error(transparent)]
    Delegation(#[from] CodecError),

    // record state and authorization
    #[error("no operator registered under this root")]
    NotRegistered,
    #[error("caller {caller} is not the withdrawal address")]
    WrongCaller { caller: Address },
    #[error("operator already unregistered")]
    AlreadyUnregistered,
    #[error("operator has not unregistered")]
    NotUnregistered,
    #[error("no collateral")]
    NoCollateral,

    // temporal
    #[error("unregistration delay not met: claimable at height {claimable_at}")]
    DelayNotMet { claimable_at: u64 },
    #[error("fraud-proof window still open until height {closes_at}")]
    FraudProofWindowActive { closes_at: u64 },
    #[error("fraud-proof window closed at height {closed_at}")]
    WindowExpired { closed_at: u64 },
    #[error("commitment slashing opens at height {opens_at}")]
    WindowNotMet { opens_at: u64 },
    #[error("delegation expired at {valid_until}")]
    DelegationExpired { valid_until: u64 },

    // challenge verification
    #[error("registration signature is valid; no fraud")]
    ChallengeInvalid,
    #[error("proposer key is not committed under this root")]
    NotRegisteredKey,
    #[error("delegation signature invalid")]
    DelegationSignatureInvalid,

    // adjudicator contract
    #[error("no adjudicator attached at {0}")]
    UnknownAdjudicator(Address),
    #[error("adjudicator already attached at {0}")]
    AdjudicatorExists(Address),
    #[error("adjudicator domain separator collides with the registration domain")]
    DomainCollision,
    #[error("adjudicator slashed nothing")]
    NoCollateralSlashed,
    #[error("slash {slash} + reward {reward} exceeds collateral {collateral}")]
    AmountExceedsCollateral { slash: u64, reward: u64, collateral: u64 },
    #[error("adjudicator failed: {0}")]
    Adjudicator(#[from] AdjudicatorError),

    // value transfer and call discipline
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
    #[error("re-entrant call rejected")]
    Reentrant,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("min_collateral must be non-zero")]
    ZeroCollateral,
    #[error("fraud_proof_window must be non-zero")]
    ZeroWindow,
    #[error("registration_domain must be non-empty")]
    EmptyDomain,
}
