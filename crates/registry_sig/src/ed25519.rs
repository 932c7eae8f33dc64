//! Ed25519 over `ed25519-dalek` (strict verification, no aggregation).

use crate::{check_len, signing_input, SignatureError, SignatureScheme};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

/// 32-byte public key (Ed25519).
pub type Pk32 = [u8; 32];

/// 64-byte signature (Ed25519 canonical encoding).
pub type Sig64 = [u8; 64];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ed25519;

impl SignatureScheme for Ed25519 {
    type SecretKey = SigningKey;
    type PublicKey = Pk32;
    type Signature = Sig64;

    const NAME: &'static str = "Ed25519";
    const PUBLIC_KEY_LEN: usize = 32;
    const SIGNATURE_LEN: usize = 64;

    fn secret_key_from_seed(seed: &[u8; 32]) -> Result<SigningKey, SignatureError> {
        Ok(SigningKey::from_bytes(seed))
    }

    fn public_key(secret: &SigningKey) -> Pk32 {
        secret.verifying_key().to_bytes()
    }

    fn sign(message: &[u8], secret: &SigningKey, domain: &[u8]) -> Sig64 {
        secret.sign(&signing_input(domain, message)).to_bytes()
    }

    fn verify(message: &[u8], signature: &Sig64, public_key: &Pk32, domain: &[u8]) -> bool {
        match VerifyingKey::from_bytes(public_key) {
            Ok(vk) => vk
                .verify_strict(&signing_input(domain, message), &Signature::from_bytes(signature))
                .is_ok(),
            Err(_) => false,
        }
    }

    /// A lone signature is its own aggregate; anything larger is unsupported.
    fn aggregate(signatures: &[Sig64]) -> Result<Sig64, SignatureError> {
        match signatures {
            [] => Err(SignatureError::EmptyAggregate),
            [one] => Ok(*one),
            _ => Err(SignatureError::AggregationUnsupported { scheme: Self::NAME }),
        }
    }

    fn aggregate_public_keys(keys: &[Pk32]) -> Result<Pk32, SignatureError> {
        match keys {
            [] => Err(SignatureError::EmptyAggregate),
            [one] => Ok(*one),
            _ => Err(SignatureError::AggregationUnsupported { scheme: Self::NAME }),
        }
    }

    fn public_key_from_slice(bytes: &[u8]) -> Result<Pk32, SignatureError> {
        check_len(Self::PUBLIC_KEY_LEN, bytes.len())?;
        let mut pk = [0u8; 32];
        pk.copy_from_slice(bytes);
        VerifyingKey::from_bytes(&pk).map_err(|_| SignatureError::MalformedPublicKey)?;
        Ok(pk)
    }

    fn signature_from_slice(bytes: &[u8]) -> Result<Sig64, SignatureError> {
        check_len(Self::SIGNATURE_LEN, bytes.len())?;
        let sig = Signature::from_slice(bytes).map_err(|_| SignatureError::MalformedSignature)?;
        Ok(sig.to_bytes())
    }
}
