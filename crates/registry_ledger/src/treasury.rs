//! Outbound value transfers.

use crate::types::{Address, Payout};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("recipient {0} rejected the transfer")]
    Rejected(Address),
    #[error("{0}")]
    Failed(String),
}

/// Moves escrowed value out of the registry.
///
/// A batch settles all-or-nothing: on `Err` no payout in it has taken effect.
pub trait Treasury: Send + Sync {
    fn settle(&self, payouts: &[Payout]) -> Result<(), TransferError>;
}

/// Code run on the recipient's side of a transfer before it is credited.
pub type ReceiveHook = Arc<dyn Fn(&Payout) -> Result<(), TransferError> + Send + Sync>;

/// Balance book with per-address rejection and receive hooks.
#[derive(Default)]
pub struct InMemoryTreasury {
    balances: Mutex<BTreeMap<Address, u128>>,
    rejecting: Mutex<BTreeSet<Address>>,
    hooks: Mutex<BTreeMap<Address, ReceiveHook>>,
}

impl InMemoryTreasury {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_from(&self, addr: Address) {
        self.rejecting.lock().insert(addr);
    }

    pub fn accept_from(&self, addr: Address) {
        self.rejecting.lock().remove(&addr);
    }

    pub fn on_receive(&self, addr: Address, hook: ReceiveHook) {
        self.hooks.lock().insert(addr, hook);
    }

    pub fn clear_hook(&self, addr: &Address) {
        self.hooks.lock().remove(addr);
    }

    #[must_use]
    pub fn balance_of(&self, addr: &Address) -> u128 {
        self.balances.lock().get(addr).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_paid(&self) -> u128 {
        self.balances.lock().values().sum()
    }
}

impl Treasury for InMemoryTreasury {
    fn settle(&self, payouts: &[Payout]) -> Result<(), TransferError> {
        {
            let rejecting = self.rejecting.lock();
            if let Some(p) = payouts.iter().find(|p| rejecting.contains(&p.to)) {
                return Err(TransferError::Rejected(p.to));
            }
        }
        // hooks may call back into whoever is paying; no lock is held across them
        let hooks: Vec<(Payout, ReceiveHook)> = {
            let hooks = self.hooks.lock();
            payouts
                .iter()
                .filter_map(|p| hooks.get(&p.to).map(|h| (*p, Arc::clone(h))))
                .collect()
        };
        for (p, hook) in &hooks {
            hook(p)?;
        }

        let mut balances = self.balances.lock();
        let mut next = BTreeMap::new();
        for p in payouts {
            let cur = next
                .get(&p.to)
                .copied()
                .unwrap_or_else(|| balances.get(&p.to).copied().unwrap_or(0));
            let bal = u128::checked_add(cur, p.amount)
                .ok_or_else(|| TransferError::Failed(format!("balance overflow at {}", p.to)))?;
            next.insert(p.to, bal);
        }
        balances.extend(next);
        Ok(())
    }
}
