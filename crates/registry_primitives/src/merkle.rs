//! Zero-padded binary Merkle accumulator.
//!
//! Leaves are padded with [`ZERO_HASH`] up to the next power of two (or to a caller-chosen
//! height). Padding is applied per level with the precomputed zero-subtree hash, which yields
//! the same root as materialising every padding leaf. Interior nodes are
//! `H("registry.merkle.node", left || right)`; leaves are expected to carry their own domain
//! tag so that no leaf can be mistaken for an interior node.

use crate::{constants, ct_eq_hash, h_tag, Hash256, ZERO_HASH};
use thiserror::Error;

/// Largest supported tree height (2^32 leaves).
pub const MAX_TREE_HEIGHT: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("tree height mismatch: {leaves} leaves do not fit height {height}")]
    TreeHeightMismatch { leaves: usize, height: u32 },
    #[error("leaf index {index} out of range for {leaves} leaves")]
    IndexOutOfRange { index: u64, leaves: usize },
}

/// Sibling hashes from the leaf level up to, but not including, the root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerklePath {
    pub siblings: Vec<Hash256>,
}

/// Compute the Merkle node hash from two child node hashes.
#[must_use]
pub fn merkle_node(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut cat = [0u8; 64];
    cat[..32].copy_from_slice(left);
    cat[32..].copy_from_slice(right);
    h_tag(constants::TAG_MERKLE_NODE, &[&cat])
}

/// Smallest height `h` with `leaf_count <= 2^h`; zero for a single leaf.
#[must_use]
pub const fn tree_height(leaf_count: usize) -> u32 {
    if leaf_count <= 1 {
        0
    } else {
        usize::BITS - (leaf_count - 1).leading_zeros()
    }
}

fn check_fits(leaf_count: usize, height: u32) -> Result<(), MerkleError> {
    let fits = height <= MAX_TREE_HEIGHT
        && u64::try_from(leaf_count).is_ok_and(|n| n <= (1u64 << height));
    if fits {
        Ok(())
    } else {
        Err(MerkleError::TreeHeightMismatch { leaves: leaf_count, height })
    }
}

/// zero[d] is the root of an all-padding subtree of height d.
fn zero_hashes(height: u32) -> Vec<Hash256> {
    let mut zeros = Vec::with_capacity(height as usize + 1);
    let mut z = ZERO_HASH;
    zeros.push(z);
    for _ in 0..height {
        z = merkle_node(&z, &z);
        zeros.push(z);
    }
    zeros
}

/// All tree levels, each padded to even length before pairing. `levels[height]` holds the root.
fn build_levels(leaves: &[Hash256], height: u32) -> Vec<Vec<Hash256>> {
    let zeros = zero_hashes(height);
    let mut levels: Vec<Vec<Hash256>> = Vec::with_capacity(height as usize + 1);
    let mut level: Vec<Hash256> = leaves.to_vec();
    for zero in zeros.iter().take(height as usize) {
        if level.len() % 2 == 1 {
            level.push(*zero);
        }
        let next: Vec<Hash256> = level
            .chunks_exact(2)
            .map(|pair| merkle_node(&pair[0], &pair[1]))
            .collect();
        levels.push(level);
        level = next;
    }
    levels.push(level);
    levels
}

/// Root of `leaves` padded to exactly `height`.
///
/// An empty leaf set yields [`ZERO_HASH`], the degenerate root.
pub fn merkle_root_with_height(leaves: &[Hash256], height: u32) -> Result<Hash256, MerkleError> {
    check_fits(leaves.len(), height)?;
    if leaves.is_empty() {
        return Ok(ZERO_HASH);
    }
    let levels = build_levels(leaves, height);
    Ok(levels
        .last()
        .and_then(|top| top.first().copied())
        .unwrap_or(ZERO_HASH))
}

/// Root of `leaves` padded to the smallest fitting height.
pub fn merkle_root(leaves: &[Hash256]) -> Result<Hash256, MerkleError> {
    merkle_root_with_height(leaves, tree_height(leaves.len()))
}

/// Authentication path for `leaves[index]` in the minimal-height tree.
pub fn merkle_proof(leaves: &[Hash256], index: u64) -> Result<MerklePath, MerkleError> {
    let height = tree_height(leaves.len());
    check_fits(leaves.len(), height)?;
    let Some(pos) = usize::try_from(index).ok().filter(|&i| i < leaves.len()) else {
        return Err(MerkleError::IndexOutOfRange { index, leaves: leaves.len() });
    };
    let levels = build_levels(leaves, height);
    let mut siblings = Vec::with_capacity(height as usize);
    let mut idx = pos;
    for level in levels.iter().take(height as usize) {
        siblings.push(level[idx ^ 1]);
        idx >>= 1;
    }
    Ok(MerklePath { siblings })
}

/// Recompute the root from `leaf` at `index` along `path` and compare with `root`.
///
/// The whole path is always walked. Index bits above the path length make the proof
/// invalid rather than being ignored. Malformed input only ever yields `false`.
#[must_use]
pub fn merkle_verify(root: &Hash256, leaf: &Hash256, index: u64, path: &MerklePath) -> bool {
    let in_range = match u32::try_from(path.siblings.len())
        .ok()
        .and_then(|depth| index.checked_shr(depth))
    {
        Some(rest) => rest == 0,
        None => true,
    };
    let mut acc = *leaf;
    let mut idx = index;
    for sib in &path.siblings {
        acc = if idx & 1 == 0 {
            merkle_node(&acc, sib)
        } else {
            merkle_node(sib, &acc)
        };
        idx >>= 1;
    }
    in_range & ct_eq_hash(root, &acc)
}
