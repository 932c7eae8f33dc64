//! Operator ledger: one record per commitment root, and its lifecycle.

use crate::{
    adjudicator::Adjudicator,
    errors::{ConfigError, RegistryError},
    events::RegistryEvent,
    guard::CallGuard,
    params::RegistryParams,
    treasury::Treasury,
    types::{registration_leaves, to_base, Address, CallContext, Operator, Payout, Registration, Root},
};
use core::cell::Cell;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use registry_primitives::{
    constants::COLLATERAL_UNIT, ct_eq_hash, merkle_root, merkle_verify, Hash256, MerklePath,
    ZERO_HASH,
};
use registry_sig::SignatureScheme;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Escrow book. `escrowed_base == Σ collateral × COLLATERAL_UNIT + dust` between calls.
#[derive(Default)]
struct Book {
    operators: BTreeMap<Root, Operator>,
    escrowed_base: u128,
    dust: u128,
}

pub struct Registry<S: SignatureScheme> {
    params: RegistryParams,
    serial: ReentrantMutex<Cell<bool>>,
    book: Mutex<Book>,
    adjudicators: RwLock<BTreeMap<Address, Arc<dyn Adjudicator<S>>>>,
    treasury: Arc<dyn Treasury>,
    events: Mutex<Vec<RegistryEvent>>,
}

pub(crate) fn root_hex(root: &Root) -> String {
    hex::encode(root)
}

impl<S: SignatureScheme> Registry<S> {
    pub fn new(params: RegistryParams, treasury: Arc<dyn Treasury>) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            serial: ReentrantMutex::new(Cell::new(false)),
            book: Mutex::new(Book::default()),
            adjudicators: RwLock::new(BTreeMap::new()),
            treasury,
            events: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub const fn params(&self) -> &RegistryParams {
        &self.params
    }

    // ——— Lifecycle ————————————————————————————————————————————————

    /// Escrow `ctx.value` behind the Merkle root of `registrations`.
    ///
    /// No signature is checked here; bad registrations are left to fraud proofs.
    pub fn register(
        &self,
        ctx: &CallContext,
        registrations: &[Registration<S>],
        withdrawal_address: Address,
        unregistration_delay: u64,
    ) -> Result<Root, RegistryError> {
        let _call = CallGuard::enter(&self.serial)?;

        let min = to_base(self.params.min_collateral);
        if ctx.value < min {
            return Err(RegistryError::InsufficientCollateral { got: ctx.value, min });
        }
        if unregistration_delay < self.params.min_unregistration_delay {
            return Err(RegistryError::DelayTooShort {
                got: unregistration_delay,
                min: self.params.min_unregistration_delay,
            });
        }
        let collateral = u64::try_from(ctx.value / COLLATERAL_UNIT)
            .map_err(|_| RegistryError::CollateralOverflow)?;
        let dust = ctx.value % COLLATERAL_UNIT;

        let leaves = registration_leaves(registrations);
        let root = merkle_root(&leaves)?;
        if ct_eq_hash(&root, &ZERO_HASH) {
            return Err(RegistryError::InvalidRoot);
        }

        {
            let mut book = self.book.lock();
            if book.operators.contains_key(&root) {
                return Err(RegistryError::AlreadyRegistered);
            }
            let escrowed = book
                .escrowed_base
                .checked_add(ctx.value)
                .ok_or(RegistryError::CollateralOverflow)?;
            book.operators.insert(
                root,
                Operator {
                    withdrawal_address,
                    collateral,
                    registered_at: ctx.height,
                    unregistered_at: None,
                    unregistration_delay,
                },
            );
            book.escrowed_base = escrowed;
            book.dust += dust;
        }

        let mut events = Vec::with_capacity(leaves.len() + 1);
        events.push(RegistryEvent::OperatorRegistered {
            root,
            withdrawal_address,
            collateral,
            unregistration_delay,
            keys: leaves.len() as u64,
        });
        for (i, (reg, leaf)) in registrations.iter().zip(&leaves).enumerate() {
            events.push(RegistryEvent::KeyRegistered {
                root,
                index: i as u64,
                leaf: *leaf,
                public_key: reg.public_key.as_ref().to_vec(),
            });
        }
        self.emit(events);
        debug!(
            root = %root_hex(&root),
            keys = leaves.len(),
            collateral,
            height = ctx.height,
            "operator registered"
        );
        Ok(root)
    }

    /// Stamp the unregistration height. Only the withdrawal address may call.
    ///
    /// Allowed inside the fraud-proof window; `claim_collateral` refuses with
    /// `FraudProofWindowActive` until it closes.
    pub fn unregister(&self, ctx: &CallContext, root: &Root) -> Result<(), RegistryError> {
        let _call = CallGuard::enter(&self.serial)?;
        {
            let mut book = self.book.lock();
            let op = book.operators.get_mut(root).ok_or(RegistryError::NotRegistered)?;
            if ctx.caller != op.withdrawal_address {
                return Err(RegistryError::WrongCaller { caller: ctx.caller });
            }
            if op.is_unregistered() {
                return Err(RegistryError::AlreadyUnregistered);
            }
            op.unregistered_at = Some(ctx.height);
        }
        self.emit([RegistryEvent::OperatorUnregistered { root: *root, height: ctx.height }]);
        debug!(root = %root_hex(root), height = ctx.height, "operator unregistered");
        Ok(())
    }

    /// Top up a live operator's collateral. Anyone may pay.
    pub fn add_collateral(&self, ctx: &CallContext, root: &Root) -> Result<u64, RegistryError> {
        let _call = CallGuard::enter(&self.serial)?;
        let (amount, collateral) = {
            let mut guard = self.book.lock();
            let book = &mut *guard;
            let op = book.operators.get_mut(root).ok_or(RegistryError::NotRegistered)?;
            if op.is_unregistered() {
                return Err(RegistryError::AlreadyUnregistered);
            }
            let amount = u64::try_from(ctx.value / COLLATERAL_UNIT)
                .map_err(|_| RegistryError::CollateralOverflow)?;
            if amount == 0 {
                return Err(RegistryError::NoCollateral);
            }
            let collateral = op
                .collateral
                .checked_add(amount)
                .ok_or(RegistryError::CollateralOverflow)?;
            let escrowed = book
                .escrowed_base
                .checked_add(ctx.value)
                .ok_or(RegistryError::CollateralOverflow)?;
            op.collateral = collateral;
            book.escrowed_base = escrowed;
            book.dust += ctx.value % COLLATERAL_UNIT;
            (amount, collateral)
        };
        self.emit([RegistryEvent::CollateralAdded {
            root: *root,
            from: ctx.caller,
            amount,
            collateral,
        }]);
        debug!(root = %root_hex(root), amount, collateral, "collateral added");
        Ok(collateral)
    }

    /// Pay the full collateral to the withdrawal address and delete the record.
    pub fn claim_collateral(&self, ctx: &CallContext, root: &Root) -> Result<u64, RegistryError> {
        let _call = CallGuard::enter(&self.serial)?;
        let op = self.live(root)?;
        if ctx.caller != op.withdrawal_address {
            return Err(RegistryError::WrongCaller { caller: ctx.caller });
        }
        let Some(unregistered_at) = op.unregistered_at else {
            return Err(RegistryError::NotUnregistered);
        };
        let closes_at = op.registered_at.saturating_add(self.params.fraud_proof_window);
        if ctx.height <= closes_at {
            return Err(RegistryError::FraudProofWindowActive { closes_at });
        }
        let claimable_at = unregistered_at.saturating_add(op.unregistration_delay);
        if ctx.height < claimable_at {
            return Err(RegistryError::DelayNotMet { claimable_at });
        }
        if op.collateral == 0 {
            return Err(RegistryError::NoCollateral);
        }

        let payout = Payout { to: op.withdrawal_address, amount: op.collateral_base() };
        self.settle_and_delete(root, &[payout])?;
        self.emit([
            RegistryEvent::CollateralClaimed {
                root: *root,
                to: op.withdrawal_address,
                amount: op.collateral,
            },
            RegistryEvent::OperatorDeleted { root: *root },
        ]);
        debug!(root = %root_hex(root), amount = op.collateral, "collateral claimed");
        Ok(op.collateral)
    }

    // ——— Adjudicator directory ————————————————————————————————————————

    /// Make `adjudicator` reachable by delegations that name `addr`.
    pub fn attach_adjudicator(
        &self,
        addr: Address,
        adjudicator: Arc<dyn Adjudicator<S>>,
    ) -> Result<(), RegistryError> {
        let _call = CallGuard::enter(&self.serial)?;
        if adjudicator.domain_separator() == self.params.registration_domain {
            return Err(RegistryError::DomainCollision);
        }
        let mut dir = self.adjudicators.write();
        if dir.contains_key(&addr) {
            return Err(RegistryError::AdjudicatorExists(addr));
        }
        dir.insert(addr, adjudicator);
        debug!(%addr, "adjudicator attached");
        Ok(())
    }

    pub(crate) fn adjudicator(&self, addr: &Address) -> Result<Arc<dyn Adjudicator<S>>, RegistryError> {
        self.adjudicators
            .read()
            .get(addr)
            .cloned()
            .ok_or(RegistryError::UnknownAdjudicator(*addr))
    }

    // ——— Queries ————————————————————————————————————————————————————

    #[must_use]
    pub fn operator(&self, root: &Root) -> Option<Operator> {
        self.book.lock().operators.get(root).copied()
    }

    #[must_use]
    pub fn is_registered(&self, root: &Root) -> bool {
        self.book.lock().operators.contains_key(root)
    }

    /// Whether `leaf` sits at `index` under a live root.
    #[must_use]
    pub fn verify_key(&self, root: &Root, leaf: &Hash256, index: u64, proof: &MerklePath) -> bool {
        self.is_registered(root) && merkle_verify(root, leaf, index, proof)
    }

    /// Value held in escrow, base units, including retained dust.
    #[must_use]
    pub fn escrowed_base(&self) -> u128 {
        self.book.lock().escrowed_base
    }

    /// Sub-unit remainders of deposits, retained and never paid out.
    #[must_use]
    pub fn dust(&self) -> u128 {
        self.book.lock().dust
    }

    #[must_use]
    pub fn operator_count(&self) -> usize {
        self.book.lock().operators.len()
    }

    /// Drain the event log.
    ///
    /// The log is unbounded and grows with every state change until drained here.
    pub fn take_events(&self) -> Vec<RegistryEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    // ——— Internals ——————————————————————————————————————————————————

    pub(crate) fn guard(&self) -> Result<CallGuard<'_>, RegistryError> {
        CallGuard::enter(&self.serial)
    }

    pub(crate) fn live(&self, root: &Root) -> Result<Operator, RegistryError> {
        self.operator(root).ok_or(RegistryError::NotRegistered)
    }

    pub(crate) fn emit(&self, events: impl IntoIterator<Item = RegistryEvent>) {
        self.events.lock().extend(events);
    }

    /// Delete the record, then pay out its full collateral.
    ///
    /// The record leaves the book before any value moves. If the treasury refuses the
    /// batch the record and escrow total are put back exactly as they were.
    pub(crate) fn settle_and_delete(
        &self,
        root: &Root,
        payouts: &[Payout],
    ) -> Result<Operator, RegistryError> {
        let removed = {
            let mut book = self.book.lock();
            let op = book.operators.remove(root).ok_or(RegistryError::NotRegistered)?;
            let left = book.escrowed_base.checked_sub(op.collateral_base());
            debug_assert!(left.is_some(), "escrow below a live record's collateral");
            book.escrowed_base = left.unwrap_or(0);
            op
        };
        let payouts: Vec<Payout> = payouts.iter().filter(|p| p.amount > 0).copied().collect();
        debug_assert_eq!(
            payouts.iter().map(|p| p.amount).sum::<u128>(),
            removed.collateral_base()
        );

        if let Err(e) = self.treasury.settle(&payouts) {
            let mut book = self.book.lock();
            book.escrowed_base += removed.collateral_base();
            book.operators.insert(*root, removed);
            warn!(root = %root_hex(root), error = %e, "settlement failed; record restored");
            return Err(RegistryError::TransferFailed(e));
        }
        Ok(removed)
    }
}
