//! End-to-end harness for the stake registry.
//!
//! Wires a [`Registry`] to an [`InMemoryTreasury`] and provides key batches, call contexts
//! and a scripted adjudicator for the scenario tests under `tests/`.

#![forbid(unsafe_code)]
#![deny(warnings)]

use registry_ledger::{
    registration_proof, Adjudicator, AdjudicatorError, Address, CallContext, Delegation,
    InMemoryTreasury, Registration, Registry, RegistryParams, SignedDelegation, SlashVerdict,
};
use registry_primitives::{constants::COLLATERAL_UNIT, MerklePath};
use registry_sig::SignatureScheme;
use std::sync::Arc;

pub const OWNER: Address = Address::repeat(0x0E);
pub const CHALLENGER: Address = Address::repeat(0xC0);
pub const ADJUDICATOR: Address = Address::repeat(0xAD);
pub const ADJUDICATOR_DOMAIN: &[u8] = b"registry.adjudicator.e2e";

/// Whole minor units to attached base-unit value.
#[must_use]
pub fn value(minor: u64) -> u128 {
    u128::from(minor) * COLLATERAL_UNIT
}

#[must_use]
pub const fn ctx(caller: Address, height: u64) -> CallContext {
    CallContext::new(caller, height, height * 12)
}

/// One batch of keys registered under a single root.
pub struct Batch<S: SignatureScheme> {
    pub secrets: Vec<S::SecretKey>,
    pub registrations: Vec<Registration<S>>,
}

impl<S: SignatureScheme> Batch<S> {
    /// `n` keys from seeds `first..first+n`; each signs `signed_for` except where `forge`
    /// returns an alternative address.
    pub fn new(
        first: u8,
        n: u8,
        signed_for: Address,
        delay: u64,
        domain: &[u8],
        forge: impl Fn(usize) -> Option<Address>,
    ) -> Self {
        let secrets: Vec<_> = (first..first + n)
            .map(|i| S::secret_key_from_seed(&[i; 32]).expect("seeded key"))
            .collect();
        let registrations = secrets
            .iter()
            .enumerate()
            .map(|(i, sk)| {
                let addr = forge(i).unwrap_or(signed_for);
                Registration::<S>::sign(sk, &addr, delay, domain)
            })
            .collect();
        Self { secrets, registrations }
    }

    #[must_use]
    pub fn honest(first: u8, n: u8, owner: Address, delay: u64, domain: &[u8]) -> Self {
        Self::new(first, n, owner, delay, domain, |_| None)
    }

    #[must_use]
    pub fn proof(&self, index: usize) -> MerklePath {
        registration_proof(&self.registrations, index as u64).expect("index in batch")
    }

    /// Delegation by key `index` to `adjudicator`, signed under `domain`.
    #[must_use]
    pub fn delegate(
        &self,
        index: usize,
        adjudicator: Address,
        valid_until: u64,
        domain: &[u8],
    ) -> SignedDelegation<S> {
        let d = Delegation {
            proposer_key: self.registrations[index].public_key,
            delegate_key: self.registrations[(index + 1) % self.registrations.len()].public_key,
            adjudicator,
            valid_until,
            metadata: Vec::new(),
        };
        SignedDelegation::sign(d, &self.secrets[index], domain).expect("small metadata")
    }
}

pub type Judge<S> =
    dyn Fn(&Delegation<S>, &[u8]) -> Result<SlashVerdict, AdjudicatorError> + Send + Sync;

/// Adjudicator whose verdict is a closure.
pub struct ScriptedAdjudicator<S: SignatureScheme> {
    pub domain: Vec<u8>,
    pub judge: Box<Judge<S>>,
}

impl<S: SignatureScheme> ScriptedAdjudicator<S> {
    #[must_use]
    pub fn fixed(verdict: SlashVerdict) -> Self {
        Self {
            domain: ADJUDICATOR_DOMAIN.to_vec(),
            judge: Box::new(move |_, _| Ok(verdict)),
        }
    }
}

impl<S: SignatureScheme> Adjudicator<S> for ScriptedAdjudicator<S> {
    fn domain_separator(&self) -> Vec<u8> {
        self.domain.clone()
    }

    fn slash(
        &self,
        delegation: &Delegation<S>,
        evidence: &[u8],
    ) -> Result<SlashVerdict, AdjudicatorError> {
        (self.judge)(delegation, evidence)
    }
}

pub struct Harness<S: SignatureScheme> {
    pub treasury: Arc<InMemoryTreasury>,
    pub registry: Arc<Registry<S>>,
}

impl<S: SignatureScheme> Harness<S> {
    #[must_use]
    pub fn new() -> Self {
        let treasury = Arc::new(InMemoryTreasury::new());
        let registry = Registry::new(RegistryParams::default(), treasury.clone())
            .expect("default params are valid");
        Self { treasury, registry: Arc::new(registry) }
    }

    #[must_use]
    pub fn params(&self) -> &RegistryParams {
        self.registry.params()
    }

    /// Short hex form of a root for assertion messages.
    #[must_use]
    pub fn label(root: &[u8; 32]) -> String {
        hex::encode(&root[..6])
    }
}

impl<S: SignatureScheme> Default for Harness<S> {
    fn default() -> Self {
        Self::new()
    }
}
