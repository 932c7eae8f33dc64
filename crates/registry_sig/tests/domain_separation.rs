use rand_core::{OsRng, RngCore};
use registry_sig::{Bls12381, Ed25519, SignatureScheme};

const REGISTRATION: &[u8] = b"registry.registration.v1";
const ADJUDICATOR: &[u8] = b"registry.adjudicator.test";

fn random_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    seed
}

fn no_cross_domain_replay<S: SignatureScheme>() {
    let sk = S::secret_key_from_seed(&random_seed()).unwrap();
    let pk = S::public_key(&sk);
    let msg = b"withdrawal||delay";
    let sig = S::sign(msg, &sk, REGISTRATION);
    assert!(S::verify(msg, &sig, &pk, REGISTRATION), "{}", S::NAME);
    assert!(!S::verify(msg, &sig, &pk, ADJUDICATOR), "{}", S::NAME);
    assert!(!S::verify(msg, &sig, &pk, b""), "{}", S::NAME);
}

fn wrong_key_rejected<S: SignatureScheme>() {
    let sk = S::secret_key_from_seed(&random_seed()).unwrap();
    let other = S::public_key(&S::secret_key_from_seed(&random_seed()).unwrap());
    let sig = S::sign(b"m", &sk, REGISTRATION);
    assert!(!S::verify(b"m", &sig, &other, REGISTRATION), "{}", S::NAME);
}

fn slice_decoding_is_exact<S: SignatureScheme>() {
    let sk = S::secret_key_from_seed(&[9u8; 32]).unwrap();
    let pk = S::public_key(&sk);
    let sig = S::sign(b"m", &sk, REGISTRATION);
    assert_eq!(pk.as_ref().len(), S::PUBLIC_KEY_LEN);
    assert_eq!(sig.as_ref().len(), S::SIGNATURE_LEN);
    assert_eq!(S::public_key_from_slice(pk.as_ref()).unwrap(), pk);
    assert!(S::public_key_from_slice(&pk.as_ref()[1..]).is_err());
    let mut long = sig.as_ref().to_vec();
    long.push(0);
    assert!(S::signature_from_slice(&long).is_err());
}

#[test]
fn bls_domain_separation() {
    no_cross_domain_replay::<Bls12381>();
    wrong_key_rejected::<Bls12381>();
    slice_decoding_is_exact::<Bls12381>();
}

#[test]
fn ed25519_domain_separation() {
    no_cross_domain_replay::<Ed25519>();
    wrong_key_rejected::<Ed25519>();
    slice_decoding_is_exact::<Ed25519>();
}

#[test]
fn seeded_keys_are_deterministic() {
    let a = Bls12381::public_key(&Bls12381::secret_key_from_seed(&[5u8; 32]).unwrap());
    let b = Bls12381::public_key(&Bls12381::secret_key_from_seed(&[5u8; 32]).unwrap());
    assert_eq!(hex::encode(a.0), hex::encode(b.0));
}
