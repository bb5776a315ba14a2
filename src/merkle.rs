//! Merkle branch verification and tree root computation
//!
//! A merkle branch lists the sibling hashes along the path from a leaf to the
//! root; together with the leaf's index it allows the root to be recomputed
//! without the rest of the tree. AuxPoW uses the verifier twice, once against
//! the parent block's transaction tree and once against the aux chain tree.

use crate::crypto::hash256;
use crate::types::Hash;

/// Recompute the merkle root claimed by a branch.
///
/// Walks the branch from the leaf upward, combining with each sibling on the
/// side selected by the current low bit of `index`. An index of -1 is the
/// legacy "no branch" sentinel and yields the all-zero hash; an empty branch
/// returns the leaf unchanged. Bits of `index` beyond the branch length are
/// never inspected.
pub fn check_merkle_branch(leaf: Hash, branch: &[Hash], index: i32) -> Hash {
    if index == -1 {
        return [0u8; 32];
    }
    let mut hash = leaf;
    let mut index = index;
    for sibling in branch {
        let mut preimage = [0u8; 64];
        if index & 1 != 0 {
            preimage[..32].copy_from_slice(sibling);
            preimage[32..].copy_from_slice(&hash);
        } else {
            preimage[..32].copy_from_slice(&hash);
            preimage[32..].copy_from_slice(sibling);
        }
        hash = hash256(&preimage);
        index >>= 1;
    }
    hash
}

/// Compute the merkle root over a list of transaction ids.
///
/// Standard Bitcoin-style tree: each level pairs adjacent hashes, duplicating
/// the last entry of an odd-length level. A single id is its own root; an
/// empty list yields the all-zero hash.
pub fn merkle_root(txids: &[Hash]) -> Hash {
    if txids.is_empty() {
        return [0u8; 32];
    }
    let mut level: Vec<Hash> = txids.to_vec();
    while level.len() > 1 {
        let mut next = Vec::with_capacity((level.len() + 1) / 2);
        for pair in level.chunks(2) {
            let left = pair[0];
            let right = if pair.len() == 2 { pair[1] } else { pair[0] };
            let mut preimage = [0u8; 64];
            preimage[..32].copy_from_slice(&left);
            preimage[32..].copy_from_slice(&right);
            next.push(hash256(&preimage));
        }
        level = next;
    }
    level[0]
}
