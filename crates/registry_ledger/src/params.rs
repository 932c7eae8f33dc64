use crate::errors::ConfigError;
use registry_primitives::constants::{
    FRAUD_PROOF_WINDOW, MIN_COLLATERAL, MIN_UNREGISTRATION_DELAY, REGISTRATION_DOMAIN,
};

/// Registry-wide parameters, fixed for the lifetime of a [`crate::Registry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryParams {
    /// Minimum escrow at registration, minor units. Also the fraud-proof challenger's slice.
    pub min_collateral: u64,
    pub min_unregistration_delay: u64,
    /// Heights after registration during which fraud proofs are accepted.
    pub fraud_proof_window: u64,
    pub registration_domain: Vec<u8>,
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            min_collateral: MIN_COLLATERAL,
            min_unregistration_delay: MIN_UNREGISTRATION_DELAY,
            fraud_proof_window: FRAUD_PROOF_WINDOW,
            registration_domain: REGISTRATION_DOMAIN.to_vec(),
        }
    }
}

impl RegistryParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_collateral == 0 {
            return Err(ConfigError::ZeroCollateral);
        }
        if self.fraud_proof_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.registration_domain.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        Ok(())
    }
}
