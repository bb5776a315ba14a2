//! Merge-mined auxiliary proof-of-work validation
//!
//! An AuxPoW proves that a parent-chain miner committed to this chain's
//! block hash: the hash sits in an aux-chain merkle tree whose root is
//! embedded in the parent block's coinbase script, and that coinbase is in
//! turn proven into the parent block's transaction tree. The committed root
//! is either announced by the 4-byte merged-mining marker or, for old
//! proofs, placed within the first 20 bytes of the script. The tree size
//! and a nonce follow the root and pin this chain to one deterministic
//! leaf slot, so one parent coinbase cannot commit to the same chain twice.

use crate::chainparams::ConsensusParams;
use crate::constants::{MAX_CHAIN_BRANCH_LENGTH, MAX_UNMARKED_ROOT_OFFSET, MERGED_MINING_HEADER};
use crate::merkle::check_merkle_branch;
use crate::serialization::txid;
use crate::types::{AuxPow, Hash};
use thiserror::Error;

/// The ways an AuxPoW proof can fail.
///
/// Kinds are stable and externally observable; a failing proof simply
/// rejects the block, it never aborts the process.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxPowError {
    #[error("aux pow is not a generate")]
    NotAGenerate,

    #[error("aux pow parent has our chain id")]
    ParentHasOurChainId,

    #[error("aux pow chain merkle branch too long")]
    ChainBranchTooLong,

    #[error("aux pow merkle root incorrect")]
    MerkleRootIncorrect,

    #[error("aux pow missing chain merkle root in parent coinbase")]
    MissingChainMerkleRoot,

    #[error("multiple merged mining headers in coinbase")]
    MultipleMergedMiningHeaders,

    #[error("merged mining header is not just before chain merkle root")]
    HeaderNotJustBeforeRoot,

    #[error("chain merkle root must start in the first 20 bytes of the parent coinbase")]
    RootMustStartInFirst20Bytes,

    #[error("missing chain merkle tree size and nonce in parent coinbase")]
    ChainMerkleSizeMissing,

    #[error("merkle branch size does not match parent coinbase")]
    MerkleBranchSizeMismatch,

    #[error("wrong index in chain merkle branch")]
    WrongIndex,
}

/// Deterministic slot of a chain in an aux merkle tree of height `h`.
///
/// Derived from the nonce committed in the parent coinbase and our chain id.
/// All arithmetic is unsigned 32-bit wrapping; signed overflow here would be
/// a consensus break.
pub fn expected_chain_index(nonce: u32, chain_id: i32, h: u32) -> u32 {
    let mut rand = nonce;
    rand = rand.wrapping_mul(1103515245).wrapping_add(12345);
    rand = rand.wrapping_add(chain_id as u32);
    rand = rand.wrapping_mul(1103515245).wrapping_add(12345);
    rand % (1u32 << h)
}

/// Linear byte-pattern search; first occurrence of `needle` in `haystack`.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

impl AuxPow {
    /// Decide whether this proof authorizes `aux_block_hash` for the chain
    /// identified by `chain_id`.
    ///
    /// The caller separately verifies that the parent header's scrypt PoW
    /// meets the child header's target; this check only ties the hashes
    /// together.
    pub fn check(
        &self,
        aux_block_hash: &Hash,
        chain_id: i32,
        params: &ConsensusParams,
    ) -> Result<(), AuxPowError> {
        // The proved transaction must be the parent's generate (coinbase).
        if self.coinbase_index != 0 {
            return Err(AuxPowError::NotAGenerate);
        }

        if params.strict_chain_id && self.parent_block.chain_id() == chain_id {
            return Err(AuxPowError::ParentHasOurChainId);
        }

        if self.chain_branch.len() > MAX_CHAIN_BRANCH_LENGTH {
            return Err(AuxPowError::ChainBranchTooLong);
        }

        // Root of the aux chain tree, reversed into the byte order the
        // coinbase script embeds it in. This is the second of the two
        // sanctioned reversal sites.
        let root = check_merkle_branch(*aux_block_hash, &self.chain_branch, self.chain_index);
        let mut root_reversed = root;
        root_reversed.reverse();

        // The coinbase must be in the parent block's transaction tree.
        let coinbase_id = txid(&self.coinbase_tx);
        if check_merkle_branch(coinbase_id, &self.coinbase_branch, self.coinbase_index)
            != self.parent_block.merkle_root
        {
            return Err(AuxPowError::MerkleRootIncorrect);
        }

        let script: &[u8] = self
            .coinbase_tx
            .inputs
            .first()
            .map(|input| input.script_sig.as_slice())
            .unwrap_or(&[]);

        let header_pos = find_subsequence(script, &MERGED_MINING_HEADER);
        let root_pos =
            find_subsequence(script, &root_reversed).ok_or(AuxPowError::MissingChainMerkleRoot)?;

        match header_pos {
            Some(head) => {
                if find_subsequence(&script[head + 1..], &MERGED_MINING_HEADER).is_some() {
                    return Err(AuxPowError::MultipleMergedMiningHeaders);
                }
                if head + MERGED_MINING_HEADER.len() != root_pos {
                    return Err(AuxPowError::HeaderNotJustBeforeRoot);
                }
            }
            None => {
                // Backward compatibility: unmarked roots must sit at the
                // front of the script.
                if root_pos > MAX_UNMARKED_ROOT_OFFSET {
                    return Err(AuxPowError::RootMustStartInFirst20Bytes);
                }
            }
        }

        // The tree size and nonce follow the root directly.
        let tail = &script[root_pos + 32..];
        if tail.len() < 8 {
            return Err(AuxPowError::ChainMerkleSizeMissing);
        }
        let size = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
        let nonce = u32::from_le_bytes([tail[4], tail[5], tail[6], tail[7]]);

        let merkle_height = self.chain_branch.len() as u32;
        if size != 1u32 << merkle_height {
            return Err(AuxPowError::MerkleBranchSizeMismatch);
        }

        if self.chain_index as u32 != expected_chain_index(nonce, chain_id, merkle_height) {
            return Err(AuxPowError::WrongIndex);
        }

        Ok(())
    }
}

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// The expected index always addresses a leaf of the committed tree.
    #[kani::proof]
    fn kani_expected_index_in_range() {
        let nonce: u32 = kani::any();
        let chain_id: i32 = kani::any();
        let h: u32 = kani::any();
        kani::assume(h <= 30);

        let index = expected_chain_index(nonce, chain_id, h);
        assert!(index < (1u32 << h), "expected index must fit the tree");
    }
}
