#![no_main]

use libfuzzer_sys::fuzz_target;
use registry_primitives::{merkle_proof, merkle_root, merkle_verify, Hash256, MerklePath};

fuzz_target!(|data: &[u8]| {
    if data.len() < 40 {
        return;
    }
    let mut root = [0u8; 32];
    root.copy_from_slice(&data[..32]);
    let mut idx = [0u8; 8];
    idx.copy_from_slice(&data[32..40]);
    let index = u64::from_le_bytes(idx);

    let chunks: Vec<Hash256> = data[40..]
        .chunks_exact(32)
        .map(|c| {
            let mut h = [0u8; 32];
            h.copy_from_slice(c);
            h
        })
        .collect();

    // arbitrary proofs must never panic
    if let Some((leaf, siblings)) = chunks.split_first() {
        let path = MerklePath { siblings: siblings.to_vec() };
        let _ = merkle_verify(&root, leaf, index, &path);
    }

    // honest proofs over the same chunks must verify
    if !chunks.is_empty() {
        let i = index % chunks.len() as u64;
        let built = merkle_root(&chunks).expect("fits");
        let proof = merkle_proof(&chunks, i).expect("in range");
        assert!(merkle_verify(&built, &chunks[i as usize], i, &proof));
    }
});
