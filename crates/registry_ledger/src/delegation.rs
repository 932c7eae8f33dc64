//! Delegations: a registered key authorizes an adjudicator (and a delegate key) to judge it.
//!
//! Canonical wire format, reconstructed byte-for-byte whenever a delegation signature is checked:
//!
//! `proposer_key || delegate_key || adjudicator(20) || BE64(valid_until) || BE32(len) || metadata`

use crate::types::Address;
use registry_primitives::{
    be_bytes,
    constants::{ADDRESS_LEN, MAX_METADATA_LEN},
};
use registry_sig::{SignatureError, SignatureScheme};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("input too short")]
    Short,
    #[error("trailing bytes after decode")]
    Trailing,
    #[error("metadata too long: {len} bytes")]
    MetadataTooLong { len: usize },
    #[error("malformed key or signature: {0}")]
    BadKey(#[from] SignatureError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delegation<S: SignatureScheme> {
    pub proposer_key: S::PublicKey,
    pub delegate_key: S::PublicKey,
    pub adjudicator: Address,
    /// Ledger timestamp after which the delegation can no longer be enforced.
    pub valid_until: u64,
    pub metadata: Vec<u8>,
}

impl<S: SignatureScheme> Delegation<S> {
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 * S::PUBLIC_KEY_LEN + ADDRESS_LEN + 8 + 4 + self.metadata.len()
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let len = self.metadata.len();
        if len > MAX_METADATA_LEN {
            return Err(CodecError::MetadataTooLong { len });
        }
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(self.proposer_key.as_ref());
        out.extend_from_slice(self.delegate_key.as_ref());
        out.extend_from_slice(&self.adjudicator.0);
        out.extend_from_slice(&be_bytes::<8>(u128::from(self.valid_until)));
        out.extend_from_slice(&be_bytes::<4>(len as u128));
        out.extend_from_slice(&self.metadata);
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut src = bytes;
        let d = read_delegation::<S>(&mut src)?;
        if !src.is_empty() {
            return Err(CodecError::Trailing);
        }
        Ok(d)
    }
}

/// Delegation plus the proposer's signature over its canonical encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedDelegation<S: SignatureScheme> {
    pub delegation: Delegation<S>,
    pub signature: S::Signature,
}

impl<S: SignatureScheme> SignedDelegation<S> {
    /// Sign under the adjudicator's domain separator.
    pub fn sign(
        delegation: Delegation<S>,
        secret: &S::SecretKey,
        domain: &[u8],
    ) -> Result<Self, CodecError> {
        let signature = S::sign(&delegation.encode()?, secret, domain);
        Ok(Self { delegation, signature })
    }

    /// True iff the proposer key signed this exact encoding under `domain`.
    #[must_use]
    pub fn verify(&self, domain: &[u8]) -> bool {
        self.delegation.encode().is_ok_and(|msg| {
            S::verify(&msg, &self.signature, &self.delegation.proposer_key, domain)
        })
    }

    /// Transport form: delegation encoding followed by the signature.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = self.delegation.encode()?;
        out.extend_from_slice(self.signature.as_ref());
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut src = bytes;
        let delegation = read_delegation::<S>(&mut src)?;
        let signature = S::signature_from_slice(read_exact(&mut src, S::SIGNATURE_LEN)?)?;
        if !src.is_empty() {
            return Err(CodecError::Trailing);
        }
        Ok(Self { delegation, signature })
    }
}

pub fn encode_delegation<S: SignatureScheme>(d: &Delegation<S>) -> Result<Vec<u8>, CodecError> {
    d.encode()
}

pub fn decode_delegation<S: SignatureScheme>(bytes: &[u8]) -> Result<Delegation<S>, CodecError> {
    Delegation::decode(bytes)
}

const fn read_exact<'a>(src: &mut &'a [u8], n: usize) -> Result<&'a [u8], CodecError> {
    if src.len() < n {
        return Err(CodecError::Short);
    }
    let (a, b) = src.split_at(n);
    *src = b;
    Ok(a)
}

fn read_u32_be(src: &mut &[u8]) -> Result<u32, CodecError> {
    let b = read_exact(src, 4)?;
    let mut a = [0u8; 4];
    a.copy_from_slice(b);
    Ok(u32::from_be_bytes(a))
}

fn read_u64_be(src: &mut &[u8]) -> Result<u64, CodecError> {
    let b = read_exact(src, 8)?;
    let mut a = [0u8; 8];
    a.copy_from_slice(b);
    Ok(u64::from_be_bytes(a))
}

fn read_delegation<S: SignatureScheme>(src: &mut &[u8]) -> Result<Delegation<S>, CodecError> {
    let proposer_key = S::public_key_from_slice(read_exact(src, S::PUBLIC_KEY_LEN)?)?;
    let delegate_key = S::public_key_from_slice(read_exact(src, S::PUBLIC_KEY_LEN)?)?;
    let mut adjudicator = Address::ZERO;
    adjudicator.0.copy_from_slice(read_exact(src, ADDRESS_LEN)?);
    let valid_until = read_u64_be(src)?;
    let len = read_u32_be(src)? as usize;
    if len > MAX_METADATA_LEN {
        return Err(CodecError::MetadataTooLong { len });
    }
    let metadata = read_exact(src, len)?.to_vec();
    Ok(Delegation { proposer_key, delegate_key, adjudicator, valid_until, metadata })
}
