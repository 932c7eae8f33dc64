#![no_main]

use libfuzzer_sys::fuzz_target;
use registry_ledger::{Delegation, SignedDelegation};
use registry_sig::{Bls12381, Ed25519};

fuzz_target!(|data: &[u8]| {
    // anything the decoder accepts must re-encode to the same bytes
    if let Ok(d) = Delegation::<Ed25519>::decode(data) {
        assert_eq!(d.encode().as_deref(), Ok(data));
    }
    if let Ok(d) = Delegation::<Bls12381>::decode(data) {
        assert_eq!(d.encode().as_deref(), Ok(data));
    }
    let _ = SignedDelegation::<Ed25519>::decode(data);
});
