use crate::types::{Address, Root};
use registry_primitives::Hash256;

/// Observable record of a completed operation. Nothing is recorded for rejected calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    OperatorRegistered {
        root: Root,
        withdrawal_address: Address,
        collateral: u64,
        unregistration_delay: u64,
        keys: u64,
    },
    KeyRegistered {
        root: Root,
        index: u64,
        leaf: Hash256,
        public_key: Vec<u8>,
    },
    OperatorUnregistered {
        root: Root,
        height: u64,
    },
    CollateralAdded {
        root: Root,
        from: Address,
        amount: u64,
        collateral: u64,
    },
    CollateralClaimed {
        root: Root,
        to: Address,
        amount: u64,
    },
    RegistrationSlashed {
        root: Root,
        challenger: Address,
        leaf: Hash256,
        challenger_amount: u64,
        remainder: u64,
    },
    OperatorSlashed {
        root: Root,
        challenger: Address,
        proposer_key: Vec<u8>,
        adjudicator: Address,
        slash_amount: u64,
        reward_amount: u64,
        remainder: u64,
    },
    OperatorDeleted {
        root: Root,
    },
}

impl RegistryEvent {
    #[must_use]
    pub const fn root(&self) -> &Root {
        match self {
            Self::OperatorRegistered { root, .. }
            | Self::KeyRegistered { root, .. }
            | Self::OperatorUnregistered { root, .. }
            | Self::CollateralAdded { root, .. }
            | Self::CollateralClaimed { root, .. }
            | Self::RegistrationSlashed { root, .. }
            | Self::OperatorSlashed { root, .. }
            | Self::OperatorDeleted { root } => root,
        }
    }
}
