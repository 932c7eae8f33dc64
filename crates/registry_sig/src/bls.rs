//! BLS12-381 (min-pk: G1 public keys, G2 signatures) over `blst`.

use crate::{check_len, signing_input, SignatureError, SignatureScheme};
use blst::min_pk::{AggregatePublicKey, AggregateSignature, PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;

/// Hash-to-curve ciphersuite tag. Protocol domains are carried in the message framing.
pub const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

pub const BLS_PUBLIC_KEY_LEN: usize = 48;
pub const BLS_SIGNATURE_LEN: usize = 96;

/// Compressed G1 public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlsPublicKey(pub [u8; BLS_PUBLIC_KEY_LEN]);

/// Compressed G2 signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlsSignature(pub [u8; BLS_SIGNATURE_LEN]);

impl AsRef<[u8]> for BlsPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for BlsSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bls12381;

fn decode_pk(pk: &BlsPublicKey) -> Result<PublicKey, SignatureError> {
    PublicKey::key_validate(&pk.0).map_err(|_| SignatureError::MalformedPublicKey)
}

fn decode_sig(sig: &BlsSignature) -> Result<Signature, SignatureError> {
    Signature::sig_validate(&sig.0, true).map_err(|_| SignatureError::MalformedSignature)
}

impl SignatureScheme for Bls12381 {
    type SecretKey = SecretKey;
    type PublicKey = BlsPublicKey;
    type Signature = BlsSignature;

    const NAME: &'static str = "BLS12-381";
    const PUBLIC_KEY_LEN: usize = BLS_PUBLIC_KEY_LEN;
    const SIGNATURE_LEN: usize = BLS_SIGNATURE_LEN;

    fn secret_key_from_seed(seed: &[u8; 32]) -> Result<SecretKey, SignatureError> {
        SecretKey::key_gen(seed, &[]).map_err(|_| SignatureError::KeyGeneration)
    }

    fn public_key(secret: &SecretKey) -> BlsPublicKey {
        BlsPublicKey(secret.sk_to_pk().to_bytes())
    }

    fn sign(message: &[u8], secret: &SecretKey, domain: &[u8]) -> BlsSignature {
        let input = signing_input(domain, message);
        BlsSignature(secret.sign(&input, BLS_DST, &[]).to_bytes())
    }

    fn verify(message: &[u8], signature: &BlsSignature, public_key: &BlsPublicKey, domain: &[u8]) -> bool {
        let (Ok(pk), Ok(sig)) = (decode_pk(public_key), decode_sig(signature)) else {
            return false;
        };
        let input = signing_input(domain, message);
        sig.verify(true, &input, BLS_DST, &[], &pk, true) == BLST_ERROR::BLST_SUCCESS
    }

    fn aggregate(signatures: &[BlsSignature]) -> Result<BlsSignature, SignatureError> {
        if signatures.is_empty() {
            return Err(SignatureError::EmptyAggregate);
        }
        let decoded = signatures
            .iter()
            .map(decode_sig)
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&Signature> = decoded.iter().collect();
        let agg = AggregateSignature::aggregate(&refs, true)
            .map_err(|_| SignatureError::AggregationFailed)?;
        Ok(BlsSignature(agg.to_signature().to_bytes()))
    }

    fn aggregate_public_keys(keys: &[BlsPublicKey]) -> Result<BlsPublicKey, SignatureError> {
        if keys.is_empty() {
            return Err(SignatureError::EmptyAggregate);
        }
        let decoded = keys.iter().map(decode_pk).collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&PublicKey> = decoded.iter().collect();
        let agg = AggregatePublicKey::aggregate(&refs, true)
            .map_err(|_| SignatureError::AggregationFailed)?;
        Ok(BlsPublicKey(agg.to_public_key().to_bytes()))
    }

    fn public_key_from_slice(bytes: &[u8]) -> Result<BlsPublicKey, SignatureError> {
        check_len(BLS_PUBLIC_KEY_LEN, bytes.len())?;
        let mut a = [0u8; BLS_PUBLIC_KEY_LEN];
        a.copy_from_slice(bytes);
        let pk = BlsPublicKey(a);
        decode_pk(&pk)?;
        Ok(pk)
    }

    fn signature_from_slice(bytes: &[u8]) -> Result<BlsSignature, SignatureError> {
        check_len(BLS_SIGNATURE_LEN, bytes.len())?;
        let mut a = [0u8; BLS_SIGNATURE_LEN];
        a.copy_from_slice(bytes);
        let sig = BlsSignature(a);
        decode_sig(&sig)?;
        Ok(sig)
    }
}
