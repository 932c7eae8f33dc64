//! Contract for pluggable adjudicators ("slashers").
//!
//! The registry never decides why a commitment was broken; it asks the adjudicator the
//! delegation names and enforces bounds on the verdict.

use crate::delegation::Delegation;
use registry_sig::SignatureScheme;
use thiserror::Error;

/// Amounts decided by an adjudicator, minor units. Both go to the challenger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlashVerdict {
    pub slash_amount: u64,
    pub reward_amount: u64,
}

impl SlashVerdict {
    #[must_use]
    pub const fn new(slash_amount: u64, reward_amount: u64) -> Self {
        Self { slash_amount, reward_amount }
    }

    /// `slash + reward`, or `None` on overflow.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.slash_amount.checked_add(self.reward_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjudicatorError {
    #[error("evidence rejected: {0}")]
    Rejected(String),
    #[error("adjudicator failure: {0}")]
    Failed(String),
}

pub trait Adjudicator<S: SignatureScheme>: Send + Sync {
    /// Domain under which delegations naming this adjudicator are signed.
    fn domain_separator(&self) -> Vec<u8>;

    /// Judge `delegation` against `evidence`. Any error aborts the slash.
    fn slash(
        &self,
        delegation: &Delegation<S>,
        evidence: &[u8],
    ) -> Result<SlashVerdict, AdjudicatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_total_checks_overflow() {
        assert_eq!(SlashVerdict::new(3, 4).total(), Some(7));
        assert_eq!(SlashVerdict::new(u64::MAX, 1).total(), None);
    }
}
