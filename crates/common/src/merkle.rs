//! Whitelist membership proofs.
//!
//! The whitelist is published as the root of a binary keccak Merkle tree whose
//! leaves are `keccak256(address)`. Interior nodes hash their two children in
//! ascending byte order, so a proof is just the list of sibling hashes from the
//! leaf up to the root with no left/right markers.

use alloy_primitives::{keccak256, Address, B256};

/// Leaf hash for a whitelisted address.
pub fn leaf_hash(address: Address) -> B256 {
    keccak256(address.as_slice())
}

/// Order-independent combine of two nodes.
pub fn hash_pair(a: B256, b: B256) -> B256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_slice());
    buf[32..].copy_from_slice(hi.as_slice());
    keccak256(buf)
}

/// Folds a proof onto a leaf and returns the implied root.
pub fn process_proof(leaf: B256, proof: &[B256]) -> B256 {
    proof.iter().fold(leaf, |node, sibling| hash_pair(node, *sibling))
}

/// Returns true when `proof` shows `address` is a member of the tree rooted at `root`.
///
/// An unset root never verifies.
pub fn verify_proof(root: Option<B256>, address: Address, proof: &[B256]) -> bool {
    match root {
        Some(root) => process_proof(leaf_hash(address), proof) == root,
        None => false,
    }
}
