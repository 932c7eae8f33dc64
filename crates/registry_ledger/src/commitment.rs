//! Slashing of broken delegated commitments through the named adjudicator.

use crate::{
    adjudicator::SlashVerdict,
    delegation::SignedDelegation,
    errors::RegistryError,
    events::RegistryEvent,
    registry::{root_hex, Registry},
    types::{to_base, CallContext, Payout, Root},
};
use registry_primitives::{merkle_verify, registration_leaf, MerklePath};
use registry_sig::SignatureScheme;
use tracing::debug;

impl<S: SignatureScheme> Registry<S> {
    /// Enforce a delegation signed by a key committed under `root`.
    ///
    /// Only callable once the fraud-proof window has elapsed. The adjudicator's verdict is
    /// bounded by `slash + reward <= collateral`; the challenger receives `slash + reward`
    /// and the withdrawal address the rest. The record is deleted.
    #[allow(clippy::too_many_arguments)]
    pub fn slash_commitment(
        &self,
        ctx: &CallContext,
        root: &Root,
        registration_signature: &S::Signature,
        proof: &MerklePath,
        leaf_index: u64,
        signed: &SignedDelegation<S>,
        evidence: &[u8],
    ) -> Result<SlashVerdict, RegistryError> {
        let _call = self.guard()?;
        let op = self.live(root)?;

        let opens_at = op.registered_at.saturating_add(self.params().fraud_proof_window);
        if ctx.height < opens_at {
            return Err(RegistryError::WindowNotMet { opens_at });
        }

        let delegation = &signed.delegation;
        let leaf = registration_leaf(delegation.proposer_key.as_ref(), registration_signature.as_ref());
        if !merkle_verify(root, &leaf, leaf_index, proof) {
            return Err(RegistryError::NotRegisteredKey);
        }

        let adjudicator = self.adjudicator(&delegation.adjudicator)?;
        let domain = adjudicator.domain_separator();
        if domain == self.params().registration_domain {
            return Err(RegistryError::DomainCollision);
        }
        if !signed.verify(&domain) {
            return Err(RegistryError::DelegationSignatureInvalid);
        }
        if ctx.timestamp > delegation.valid_until {
            return Err(RegistryError::DelegationExpired { valid_until: delegation.valid_until });
        }

        let verdict = adjudicator.slash(delegation, evidence)?;
        if verdict.slash_amount == 0 {
            return Err(RegistryError::NoCollateralSlashed);
        }
        let taken = match verdict.total() {
            Some(t) if t <= op.collateral => t,
            _ => {
                return Err(RegistryError::AmountExceedsCollateral {
                    slash: verdict.slash_amount,
                    reward: verdict.reward_amount,
                    collateral: op.collateral,
                })
            }
        };
        let remainder = op.collateral - taken;

        self.settle_and_delete(
            root,
            &[
                Payout { to: ctx.caller, amount: to_base(taken) },
                Payout { to: op.withdrawal_address, amount: to_base(remainder) },
            ],
        )?;

        self.emit([
            RegistryEvent::OperatorSlashed {
                root: *root,
                challenger: ctx.caller,
                proposer_key: delegation.proposer_key.as_ref().to_vec(),
                adjudicator: delegation.adjudicator,
                slash_amount: verdict.slash_amount,
                reward_amount: verdict.reward_amount,
                remainder,
            },
            RegistryEvent::OperatorDeleted { root: *root },
        ]);
        debug!(
            root = %root_hex(root),
            challenger = %ctx.caller,
            adjudicator = %delegation.adjudicator,
            slash = verdict.slash_amount,
            reward = verdict.reward_amount,
            remainder,
            "commitment slashed"
        );
        Ok(verdict)
    }
}
