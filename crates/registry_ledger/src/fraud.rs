//! Fraud-proof slashing of registrations whose key never signed the operator's parameters.

use crate::{
    errors::RegistryError,
    events::RegistryEvent,
    registry::{root_hex, Registry},
    types::{registration_message, to_base, CallContext, Payout, Registration, Root},
};
use registry_primitives::{merkle_verify, MerklePath};
use registry_sig::SignatureScheme;
use tracing::debug;

impl<S: SignatureScheme> Registry<S> {
    /// Prove that `registration`, committed at `leaf_index` under `root`, carries a
    /// signature that does not verify over the stored withdrawal address and delay.
    ///
    /// On success the challenger receives `min(min_collateral, collateral)` and the
    /// withdrawal address the rest; the record is deleted. Returns the challenger's amount.
    pub fn slash_registration(
        &self,
        ctx: &CallContext,
        root: &Root,
        registration: &Registration<S>,
        proof: &MerklePath,
        leaf_index: u64,
    ) -> Result<u64, RegistryError> {
        let _call = self.guard()?;
        let op = self.live(root)?;

        let closed_at = op.registered_at.saturating_add(self.params().fraud_proof_window);
        if ctx.height > closed_at {
            return Err(RegistryError::WindowExpired { closed_at });
        }

        let leaf = registration.leaf();
        if !merkle_verify(root, &leaf, leaf_index, proof) {
            return Err(RegistryError::NotRegistered);
        }

        // parameters come from the stored record, never from the challenger
        let msg = registration_message(&op.withdrawal_address, op.unregistration_delay);
        if S::verify(
            &msg,
            &registration.signature,
            &registration.public_key,
            &self.params().registration_domain,
        ) {
            return Err(RegistryError::ChallengeInvalid);
        }

        let challenger_amount = op.collateral.min(self.params().min_collateral);
        let remainder = op.collateral - challenger_amount;
        self.settle_and_delete(
            root,
            &[
                Payout { to: ctx.caller, amount: to_base(challenger_amount) },
                Payout { to: op.withdrawal_address, amount: to_base(remainder) },
            ],
        )?;

        self.emit([
            RegistryEvent::RegistrationSlashed {
                root: *root,
                challenger: ctx.caller,
                leaf,
                challenger_amount,
                remainder,
            },
            RegistryEvent::OperatorDeleted { root: *root },
        ]);
        debug!(
            root = %root_hex(root),
            challenger = %ctx.caller,
            challenger_amount,
            remainder,
            "registration fraud slashed"
        );
        Ok(challenger_amount)
    }
}
