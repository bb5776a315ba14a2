//! Block header, auxpow appendix and block wire formats
//!
//! The header has two serialized forms. Hash streams stop after the fixed
//! 80-byte preimage; wire and disk streams continue with the merge-mining
//! appendix whenever version bit 8 is set. The appendix order is: parent
//! coinbase tx, parent hash hint, coinbase branch, coinbase index, chain
//! branch, chain index, then the parent header's bare 80-byte preimage
//! (its own auxpow bit is never followed).

use super::transaction::{
    deserialize_transaction, read_hash, read_i32, read_u32, serialize_transaction,
};
use super::varint::{decode_varint, encode_varint};
use crate::error::{ConsensusError, Result};
use crate::types::*;
use std::borrow::Cow;

/// Error type for block parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockParseError {
    InsufficientBytes,
    InvalidTransactionCount,
    /// Header version flags an appendix that is not attached (encode side).
    MissingAuxPow,
    /// Header carries an appendix its version does not flag (encode side).
    UnexpectedAuxPow,
}

impl std::fmt::Display for BlockParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockParseError::InsufficientBytes => {
                write!(f, "Insufficient bytes to parse block")
            }
            BlockParseError::InvalidTransactionCount => write!(f, "Invalid transaction count"),
            BlockParseError::MissingAuxPow => {
                write!(f, "Auxpow version bit set but no appendix attached")
            }
            BlockParseError::UnexpectedAuxPow => {
                write!(f, "Appendix attached without the auxpow version bit")
            }
        }
    }
}

impl std::error::Error for BlockParseError {}

impl From<BlockParseError> for ConsensusError {
    fn from(err: BlockParseError) -> Self {
        ConsensusError::Serialization(Cow::Owned(err.to_string()))
    }
}

/// Serialize the fixed 80-byte header preimage.
///
/// This is the exact input to both the identity hash and the scrypt PoW
/// hash; the appendix never participates.
pub fn serialize_header_preimage(header: &BlockHeader) -> Vec<u8> {
    let mut result = Vec::with_capacity(80);
    result.extend_from_slice(&header.version.to_le_bytes());
    result.extend_from_slice(&header.prev_block_hash);
    result.extend_from_slice(&header.merkle_root);
    result.extend_from_slice(&header.time.to_le_bytes());
    result.extend_from_slice(&header.bits.to_le_bytes());
    result.extend_from_slice(&header.nonce.to_le_bytes());
    debug_assert_eq!(result.len(), 80);
    result
}

fn deserialize_header_preimage(data: &[u8], offset: &mut usize) -> Result<BlockHeader> {
    let version = read_i32(data, offset)?;
    let prev_block_hash = read_hash(data, offset)?;
    let merkle_root = read_hash(data, offset)?;
    let time = read_u32(data, offset)?;
    let bits = read_u32(data, offset)?;
    let nonce = read_u32(data, offset)?;
    Ok(BlockHeader {
        version,
        prev_block_hash,
        merkle_root,
        time,
        bits,
        nonce,
        auxpow: None,
    })
}

/// Serialize a header for the wire: preimage plus appendix when flagged.
///
/// Fails if the version bit and the attached appendix disagree; such a
/// header cannot be represented on the wire.
pub fn serialize_header(header: &BlockHeader) -> Result<Vec<u8>> {
    let mut result = serialize_header_preimage(header);
    match (header.is_auxpow(), &header.auxpow) {
        (true, Some(auxpow)) => serialize_auxpow(auxpow, &mut result),
        (false, None) => {}
        (true, None) => return Err(BlockParseError::MissingAuxPow.into()),
        (false, Some(_)) => return Err(BlockParseError::UnexpectedAuxPow.into()),
    }
    Ok(result)
}

/// Deserialize a wire header, reading the appendix when version bit 8 is set.
///
/// Returns the header and the number of bytes consumed.
pub fn deserialize_header(data: &[u8]) -> Result<(BlockHeader, usize)> {
    let mut offset = 0;
    let mut header = deserialize_header_preimage(data, &mut offset)?;
    if header.is_auxpow() {
        let auxpow = deserialize_auxpow(data, &mut offset)?;
        header.auxpow = Some(Box::new(auxpow));
    }
    Ok((header, offset))
}

fn serialize_hash_vec(hashes: &[Hash], out: &mut Vec<u8>) {
    out.extend_from_slice(&encode_varint(hashes.len() as u64));
    for hash in hashes {
        out.extend_from_slice(hash);
    }
}

fn deserialize_hash_vec(data: &[u8], offset: &mut usize) -> Result<Vec<Hash>> {
    let (count, varint_len) = decode_varint(&data[*offset..])?;
    *offset += varint_len;
    // A count that cannot fit in the remaining bytes is malformed.
    if count > (data.len() as u64) / 32 {
        return Err(BlockParseError::InsufficientBytes.into());
    }
    let mut hashes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        hashes.push(read_hash(data, offset)?);
    }
    Ok(hashes)
}

fn serialize_auxpow(auxpow: &AuxPow, out: &mut Vec<u8>) {
    out.extend_from_slice(&serialize_transaction(&auxpow.coinbase_tx));
    out.extend_from_slice(&auxpow.parent_hash);
    serialize_hash_vec(&auxpow.coinbase_branch, out);
    out.extend_from_slice(&auxpow.coinbase_index.to_le_bytes());
    serialize_hash_vec(&auxpow.chain_branch, out);
    out.extend_from_slice(&auxpow.chain_index.to_le_bytes());
    out.extend_from_slice(&serialize_header_preimage(&auxpow.parent_block));
}

fn deserialize_auxpow(data: &[u8], offset: &mut usize) -> Result<AuxPow> {
    let (coinbase_tx, consumed) = deserialize_transaction(&data[*offset..])?;
    *offset += consumed;
    let parent_hash = read_hash(data, offset)?;
    let coinbase_branch = deserialize_hash_vec(data, offset)?;
    let coinbase_index = read_i32(data, offset)?;
    let chain_branch = deserialize_hash_vec(data, offset)?;
    let chain_index = read_i32(data, offset)?;
    let parent_block = deserialize_header_preimage(data, offset)?;
    Ok(AuxPow {
        coinbase_tx,
        parent_hash,
        coinbase_branch,
        coinbase_index,
        chain_branch,
        chain_index,
        parent_block,
    })
}

/// Serialize a block: wire header, transaction count, transactions.
pub fn serialize_block(block: &Block) -> Result<Vec<u8>> {
    let mut result = serialize_header(&block.header)?;
    result.extend_from_slice(&encode_varint(block.transactions.len() as u64));
    for tx in block.transactions.iter() {
        result.extend_from_slice(&serialize_transaction(tx));
    }
    Ok(result)
}

/// Deserialize a block from wire format.
pub fn deserialize_block(data: &[u8]) -> Result<Block> {
    let (header, mut offset) = deserialize_header(data)?;

    let (tx_count, varint_len) = decode_varint(&data[offset..])?;
    offset += varint_len;
    if tx_count == 0 || tx_count > (data.len() as u64) {
        return Err(BlockParseError::InvalidTransactionCount.into());
    }

    let mut transactions = Vec::with_capacity(tx_count as usize);
    for _ in 0..tx_count {
        let (tx, consumed) = deserialize_transaction(&data[offset..])?;
        offset += consumed;
        transactions.push(tx);
    }

    Ok(Block {
        header,
        transactions: transactions.into_boxed_slice(),
    })
}
