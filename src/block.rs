//! Block header behaviors
//!
//! The version word carries three things at once: the base version in the
//! low byte, the auxpow flag at bit 8, and the chain id in the high 16 bits.
//! Headers predating merge mining (version 1, or version 2 with a zero chain
//! id) are the legacy shape; legacy and auxpow are mutually exclusive.

use crate::constants::{VERSION_AUXPOW, VERSION_CHAIN_ID_SHIFT};
use crate::crypto::{hash256, scrypt_1024_1_1_256};
use crate::serialization::serialize_header_preimage;
use crate::types::{hash_to_hex, Block, BlockHeader, Hash};
use std::fmt;

impl BlockHeader {
    /// Base version: the low byte of the version word.
    pub fn base_version(&self) -> i32 {
        self.version & 0xff
    }

    /// Chain id embedded in the high bits of the version word.
    pub fn chain_id(&self) -> i32 {
        self.version >> VERSION_CHAIN_ID_SHIFT
    }

    /// Whether the version flags a merge-mining appendix.
    pub fn is_auxpow(&self) -> bool {
        self.version & VERSION_AUXPOW != 0
    }

    /// Whether this is a pre-merge-mining encoding.
    pub fn is_legacy(&self) -> bool {
        self.version == 1 || (self.version == 2 && self.chain_id() == 0)
    }

    /// Compose the version word from a base version and a chain id.
    ///
    /// The base version must fit below the auxpow flag bit and the header
    /// must not already carry an appendix.
    pub fn set_base_version(&mut self, base_version: i32, chain_id: i32) {
        debug_assert!(base_version >= 1 && base_version < VERSION_AUXPOW);
        debug_assert!(!self.is_auxpow());
        self.version = base_version | (chain_id << VERSION_CHAIN_ID_SHIFT);
    }

    /// Identity hash: double SHA-256 of the 80-byte preimage.
    ///
    /// The appendix never contributes; an auxpow header and its bare copy
    /// hash identically.
    pub fn hash(&self) -> Hash {
        hash256(&serialize_header_preimage(self))
    }

    /// Proof-of-work hash: scrypt over the same 80-byte preimage.
    pub fn pow_hash(&self) -> Hash {
        scrypt_1024_1_1_256(&serialize_header_preimage(self))
    }

    /// Block time as a signed 64-bit value.
    pub fn block_time(&self) -> i64 {
        self.time as i64
    }
}

impl fmt::Display for BlockHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockHeader(hash={}, ver=0x{:08x}, prev={}, merkle={}, time={}, bits={:08x}, nonce={})",
            hash_to_hex(&self.hash()),
            self.version,
            hash_to_hex(&self.prev_block_hash),
            hash_to_hex(&self.merkle_root),
            self.time,
            self.bits,
            self.nonce,
        )
    }
}

impl Block {
    /// Hash of the block's header.
    pub fn block_hash(&self) -> Hash {
        self.header.hash()
    }

    /// The coinbase transaction, if the block has any transactions.
    pub fn coinbase(&self) -> Option<&crate::types::Transaction> {
        self.transactions.first()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({}, vtx={})", self.header, self.transactions.len())
    }
}
