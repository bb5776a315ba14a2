//! Proof-of-work admissibility
//!
//! Targets travel in the compact `bits` form; expansion follows the
//! reference semantics exactly, including the negative and overflow flags.
//! Hashes are compared as little-endian 256-bit integers. The auxpow-aware
//! entry point selects which header the scrypt hash is computed over: the
//! header itself for plain blocks, the parent header for merge-mined ones.

use crate::auxpow::AuxPowError;
use crate::chainparams::ConsensusParams;
use crate::types::{BlockHeader, Hash};
use thiserror::Error;

/// The ways a header can fail the proof-of-work rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowError {
    #[error("block does not have our chain id (got {got}, expected {expected})")]
    WrongChainId { got: i32, expected: i32 },

    #[error("no auxpow on block with auxpow version")]
    MissingAuxPow,

    #[error("auxpow on block with non-auxpow version")]
    UnexpectedAuxPow,

    #[error("legacy block past the legacy cutoff height")]
    LegacyDisallowed,

    #[error("target is negative, overflowing, zero or above the pow limit")]
    BadTarget,

    #[error("hash does not satisfy the claimed target")]
    InsufficientWork,

    #[error(transparent)]
    AuxPow(#[from] AuxPowError),
}

/// 256-bit unsigned integer for target arithmetic.
///
/// Four 64-bit words, least significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U256([u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0; 4]);
    pub const MAX: U256 = U256([u64::MAX; 4]);

    pub fn from_u64(value: u64) -> Self {
        U256([value, 0, 0, 0])
    }

    /// Interpret 32 bytes as a little-endian 256-bit integer; this is the
    /// byte order raw hashes already carry.
    pub fn from_le_bytes(bytes: &Hash) -> Self {
        let mut words = [0u64; 4];
        for (i, word) in words.iter_mut().enumerate() {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            *word = u64::from_le_bytes(buf);
        }
        U256(words)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&word| word == 0)
    }

    /// Lowest 64 bits of the value.
    pub fn low_u64(&self) -> u64 {
        self.0[0]
    }

    /// Bit length: position of the highest set bit plus one, 0 for zero.
    pub fn bits(&self) -> u32 {
        for (i, &word) in self.0.iter().enumerate().rev() {
            if word != 0 {
                return (i as u32) * 64 + (64 - word.leading_zeros());
            }
        }
        0
    }

    pub fn shl(&self, shift: u32) -> Self {
        if shift >= 256 {
            return U256::ZERO;
        }
        let mut result = U256::ZERO;
        let word_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        for i in 0..4 {
            if i + word_shift < 4 {
                result.0[i + word_shift] |= self.0[i] << bit_shift;
                if bit_shift > 0 && i + word_shift + 1 < 4 {
                    result.0[i + word_shift + 1] |= self.0[i] >> (64 - bit_shift);
                }
            }
        }
        result
    }

    pub fn shr(&self, shift: u32) -> Self {
        if shift >= 256 {
            return U256::ZERO;
        }
        let mut result = U256::ZERO;
        let word_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        for i in 0..4 {
            if i >= word_shift {
                result.0[i - word_shift] |= self.0[i] >> bit_shift;
                if bit_shift > 0 && i - word_shift >= 1 {
                    result.0[i - word_shift - 1] |= self.0[i] << (64 - bit_shift);
                }
            }
        }
        result
    }

    /// Expand a compact target.
    ///
    /// Returns the value together with the negative and overflow flags of the
    /// reference encoding; callers reject targets with either flag set.
    pub fn from_compact(bits: u32) -> (Self, bool, bool) {
        let size = (bits >> 24) as usize;
        let word = bits & 0x007f_ffff;
        let value = if size <= 3 {
            U256::from_u64((word >> (8 * (3 - size))) as u64)
        } else {
            U256::from_u64(word as u64).shl((8 * (size - 3)) as u32)
        };
        let negative = word != 0 && (bits & 0x0080_0000) != 0;
        let overflow = word != 0
            && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));
        (value, negative, overflow)
    }

    /// Compress to the compact form.
    pub fn to_compact(&self) -> u32 {
        let mut size = (self.bits() + 7) / 8;
        let mut compact = if size <= 3 {
            self.low_u64() << (8 * (3 - size))
        } else {
            self.shr(8 * (size - 3)).low_u64()
        };
        // A mantissa with the sign bit set borrows a byte from the exponent.
        if compact & 0x0080_0000 != 0 {
            compact >>= 8;
            size += 1;
        }
        (compact as u32) | (size << 24)
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        for (a, b) in self.0.iter().rev().zip(other.0.iter().rev()) {
            match a.cmp(b) {
                std::cmp::Ordering::Equal => continue,
                order => return order,
            }
        }
        std::cmp::Ordering::Equal
    }
}

/// Check a hash against a compact target.
///
/// The target must expand cleanly (not negative, not overflowing, non-zero)
/// and lie at or below the network's pow limit; the hash, read as a
/// little-endian 256-bit integer, must not exceed it.
pub fn check_proof_of_work(
    hash: &Hash,
    bits: u32,
    params: &ConsensusParams,
) -> Result<(), PowError> {
    let (target, negative, overflow) = U256::from_compact(bits);
    if negative || overflow || target.is_zero() || target > params.pow_limit {
        return Err(PowError::BadTarget);
    }
    if U256::from_le_bytes(hash) > target {
        return Err(PowError::InsufficientWork);
    }
    Ok(())
}

/// Full PoW admissibility for a header, auxpow-aware.
///
/// Non-legacy headers must carry our chain id when strict mode is on. A
/// plain header proves work with its own scrypt hash; a merge-mined header
/// proves work with the parent header's scrypt hash after its AuxPoW ties
/// the parent to this block. Either way the target is this header's `bits`.
pub fn validate_pow(header: &BlockHeader, params: &ConsensusParams) -> Result<(), PowError> {
    if !header.is_legacy()
        && params.strict_chain_id
        && header.chain_id() != params.aux_chain_id
    {
        return Err(PowError::WrongChainId {
            got: header.chain_id(),
            expected: params.aux_chain_id,
        });
    }

    match &header.auxpow {
        None => {
            if header.is_auxpow() {
                return Err(PowError::MissingAuxPow);
            }
            check_proof_of_work(&header.pow_hash(), header.bits, params)
        }
        Some(auxpow) => {
            if !header.is_auxpow() {
                return Err(PowError::UnexpectedAuxPow);
            }
            auxpow.check(&header.hash(), header.chain_id(), params)?;
            check_proof_of_work(&auxpow.parent_block.pow_hash(), header.bits, params)
        }
    }
}

/// Height-aware admissibility: also rejects legacy headers once the legacy
/// cutoff height is reached.
pub fn validate_pow_at_height(
    header: &BlockHeader,
    height: u32,
    params: &ConsensusParams,
) -> Result<(), PowError> {
    if header.is_legacy() && height >= params.disallow_legacy_blocks_height {
        return Err(PowError::LegacyDisallowed);
    }
    validate_pow(header, params)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Expanding a compact value and compressing it back is stable for
        /// well-formed, in-range targets.
        #[test]
        fn prop_compact_round_trip(exponent in 4u32..=32, mantissa in 0x008000u32..0x7fffff) {
            let bits = (exponent << 24) | mantissa;
            let (target, negative, overflow) = U256::from_compact(bits);
            prop_assume!(!negative && !overflow && !target.is_zero());
            prop_assert_eq!(target.to_compact(), bits);
        }

        /// Shifting left then right by the same amount is the identity for
        /// values that do not overflow the width.
        #[test]
        fn prop_shift_round_trip(value in any::<u64>(), shift in 0u32..192) {
            let v = U256::from_u64(value);
            prop_assert_eq!(v.shl(shift).shr(shift), v);
        }
    }
}
