use core::fmt;
use registry_primitives::{
    be_bytes,
    constants::{ADDRESS_LEN, COLLATERAL_UNIT},
    merkle_proof, registration_leaf, Hash256, MerkleError, MerklePath,
};
use registry_sig::SignatureScheme;

/// Commitment root: Merkle root over a batch of registration leaves.
pub type Root = Hash256;

/// Length of the signed registration payload: `address(20) || BE64(delay)`.
pub const REGISTRATION_MESSAGE_LEN: usize = ADDRESS_LEN + 8;

/// Account identity on the ledger.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    #[must_use]
    pub const fn repeat(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Who is calling, at which ledger height and time, with how much attached value (base units).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub height: u64,
    pub timestamp: u64,
    pub value: u128,
}

impl CallContext {
    #[must_use]
    pub const fn new(caller: Address, height: u64, timestamp: u64) -> Self {
        Self { caller, height, timestamp, value: 0 }
    }

    #[must_use]
    pub const fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }
}

/// One key's registration: never stored, only its leaf enters the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registration<S: SignatureScheme> {
    pub public_key: S::PublicKey,
    pub signature: S::Signature,
}

impl<S: SignatureScheme> Registration<S> {
    /// Sign `(withdrawal_address, unregistration_delay)` under the registration domain.
    #[must_use]
    pub fn sign(
        secret: &S::SecretKey,
        withdrawal_address: &Address,
        unregistration_delay: u64,
        domain: &[u8],
    ) -> Self {
        let msg = registration_message(withdrawal_address, unregistration_delay);
        Self {
            public_key: S::public_key(secret),
            signature: S::sign(&msg, secret, domain),
        }
    }

    #[must_use]
    pub fn leaf(&self) -> Hash256 {
        registration_leaf(self.public_key.as_ref(), self.signature.as_ref())
    }
}

/// Exact bytes a key signs at registration.
#[must_use]
pub fn registration_message(
    withdrawal_address: &Address,
    unregistration_delay: u64,
) -> [u8; REGISTRATION_MESSAGE_LEN] {
    let mut out = [0u8; REGISTRATION_MESSAGE_LEN];
    out[..ADDRESS_LEN].copy_from_slice(&withdrawal_address.0);
    out[ADDRESS_LEN..].copy_from_slice(&be_bytes::<8>(u128::from(unregistration_delay)));
    out
}

#[must_use]
pub fn registration_leaves<S: SignatureScheme>(registrations: &[Registration<S>]) -> Vec<Hash256> {
    registrations.iter().map(Registration::leaf).collect()
}

/// Inclusion proof for `registrations[index]`, as a challenger would build it off-ledger.
pub fn registration_proof<S: SignatureScheme>(
    registrations: &[Registration<S>],
    index: u64,
) -> Result<MerklePath, MerkleError> {
    merkle_proof(&registration_leaves(registrations), index)
}

/// Live record for one commitment root. Collateral is held in minor units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operator {
    pub withdrawal_address: Address,
    pub collateral: u64,
    pub registered_at: u64,
    /// Set once by unregister, never reset.
    pub unregistered_at: Option<u64>,
    pub unregistration_delay: u64,
}

impl Operator {
    #[must_use]
    pub const fn is_unregistered(&self) -> bool {
        self.unregistered_at.is_some()
    }

    /// Collateral in base units.
    #[must_use]
    pub const fn collateral_base(&self) -> u128 {
        to_base(self.collateral)
    }
}

/// A single outbound value transfer, in base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub to: Address,
    pub amount: u128,
}

#[inline]
#[must_use]
pub const fn to_base(minor: u64) -> u128 {
    (minor as u128) * COLLATERAL_UNIT
}
