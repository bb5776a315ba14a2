//! Transaction wire format serialization/deserialization
//!
//! Byte-exact codec for the transaction layout the merkle proofs commit to.
//! The transaction id is the double SHA-256 of exactly this encoding.

use super::varint::{decode_varint, encode_varint};
use crate::crypto::hash256;
use crate::error::{ConsensusError, Result};
use crate::types::*;
use std::borrow::Cow;

/// Error type for transaction parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionParseError {
    InsufficientBytes,
    InvalidInputCount,
    InvalidOutputCount,
}

impl std::fmt::Display for TransactionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionParseError::InsufficientBytes => {
                write!(f, "Insufficient bytes to parse transaction")
            }
            TransactionParseError::InvalidInputCount => write!(f, "Invalid input count"),
            TransactionParseError::InvalidOutputCount => write!(f, "Invalid output count"),
        }
    }
}

impl std::error::Error for TransactionParseError {}

impl From<TransactionParseError> for ConsensusError {
    fn from(err: TransactionParseError) -> Self {
        ConsensusError::Serialization(Cow::Owned(err.to_string()))
    }
}

// Sanity bound on declared counts; real counts are limited far lower by block
// size rules.
const MAX_VEC_COUNT: u64 = 1_000_000;

/// Serialize a transaction to wire format
///
/// Format:
/// - Version (4 bytes, little-endian, signed)
/// - Input count (CompactSize)
/// - For each input: prevout hash (32), prevout index (4), script length
///   (CompactSize), script bytes, sequence (4)
/// - Output count (CompactSize)
/// - For each output: value (8, signed), script length (CompactSize),
///   script bytes
/// - Lock time (4 bytes, little-endian)
pub fn serialize_transaction(tx: &Transaction) -> Vec<u8> {
    let estimated = 8
        + tx.inputs.iter().map(|i| 41 + i.script_sig.len()).sum::<usize>()
        + tx.outputs.iter().map(|o| 9 + o.script_pubkey.len()).sum::<usize>();
    let mut result = Vec::with_capacity(estimated);

    result.extend_from_slice(&tx.version.to_le_bytes());

    result.extend_from_slice(&encode_varint(tx.inputs.len() as u64));
    for input in &tx.inputs {
        result.extend_from_slice(&input.prevout.hash);
        result.extend_from_slice(&input.prevout.index.to_le_bytes());
        result.extend_from_slice(&encode_varint(input.script_sig.len() as u64));
        result.extend_from_slice(&input.script_sig);
        result.extend_from_slice(&input.sequence.to_le_bytes());
    }

    result.extend_from_slice(&encode_varint(tx.outputs.len() as u64));
    for output in &tx.outputs {
        result.extend_from_slice(&output.value.to_le_bytes());
        result.extend_from_slice(&encode_varint(output.script_pubkey.len() as u64));
        result.extend_from_slice(&output.script_pubkey);
    }

    result.extend_from_slice(&tx.lock_time.to_le_bytes());

    result
}

/// Deserialize a transaction from wire format
///
/// Returns the transaction and the number of bytes consumed, so callers can
/// continue decoding an enclosing stream.
pub fn deserialize_transaction(data: &[u8]) -> Result<(Transaction, usize)> {
    let mut offset = 0;

    let version = read_i32(data, &mut offset)?;

    let (input_count, varint_len) = decode_varint(&data[offset..])?;
    offset += varint_len;
    if input_count > MAX_VEC_COUNT {
        return Err(TransactionParseError::InvalidInputCount.into());
    }

    let mut inputs = Vec::with_capacity(input_count.min(1024) as usize);
    for _ in 0..input_count {
        let hash = read_hash(data, &mut offset)?;
        let index = read_u32(data, &mut offset)?;
        let script_sig = read_vec(data, &mut offset)?;
        let sequence = read_u32(data, &mut offset)?;
        inputs.push(TransactionInput {
            prevout: OutPoint { hash, index },
            script_sig,
            sequence,
        });
    }

    let (output_count, varint_len) = decode_varint(&data[offset..])?;
    offset += varint_len;
    if output_count > MAX_VEC_COUNT {
        return Err(TransactionParseError::InvalidOutputCount.into());
    }

    let mut outputs = Vec::with_capacity(output_count.min(1024) as usize);
    for _ in 0..output_count {
        let value = read_i64(data, &mut offset)?;
        let script_pubkey = read_vec(data, &mut offset)?;
        outputs.push(TransactionOutput {
            value,
            script_pubkey,
        });
    }

    let lock_time = read_u32(data, &mut offset)?;

    Ok((
        Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        },
        offset,
    ))
}

/// Transaction id: double SHA-256 of the wire encoding
pub fn txid(tx: &Transaction) -> Hash {
    hash256(&serialize_transaction(tx))
}

pub(super) fn read_i32(data: &[u8], offset: &mut usize) -> Result<i32> {
    let bytes = take(data, offset, 4)?;
    Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(super) fn read_u32(data: &[u8], offset: &mut usize) -> Result<u32> {
    let bytes = take(data, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(super) fn read_i64(data: &[u8], offset: &mut usize) -> Result<i64> {
    let bytes = take(data, offset, 8)?;
    Ok(i64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]))
}

pub(super) fn read_hash(data: &[u8], offset: &mut usize) -> Result<Hash> {
    let bytes = take(data, offset, 32)?;
    let mut hash = [0u8; 32];
    hash.copy_from_slice(bytes);
    Ok(hash)
}

fn read_vec(data: &[u8], offset: &mut usize) -> Result<Vec<u8>> {
    let (len, varint_len) = decode_varint(&data[*offset..])?;
    *offset += varint_len;
    Ok(take(data, offset, len as usize)?.to_vec())
}

fn take<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or(TransactionParseError::InsufficientBytes)?;
    let slice = &data[*offset..end];
    *offset = end;
    Ok(slice)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_input() -> impl Strategy<Value = TransactionInput> {
        (
            any::<[u8; 32]>(),
            any::<u32>(),
            proptest::collection::vec(any::<u8>(), 0..64),
            any::<u32>(),
        )
            .prop_map(|(hash, index, script_sig, sequence)| TransactionInput {
                prevout: OutPoint { hash, index },
                script_sig,
                sequence,
            })
    }

    fn arb_output() -> impl Strategy<Value = TransactionOutput> {
        (any::<i64>(), proptest::collection::vec(any::<u8>(), 0..64))
            .prop_map(|(value, script_pubkey)| TransactionOutput {
                value,
                script_pubkey,
            })
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            version in any::<i32>(),
            inputs in proptest::collection::vec(arb_input(), 0..4),
            outputs in proptest::collection::vec(arb_output(), 0..4),
            lock_time in any::<u32>()
        ) {
            let tx = Transaction { version, inputs, outputs, lock_time };
            let serialized = serialize_transaction(&tx);
            let (deserialized, consumed) = deserialize_transaction(&serialized).unwrap();
            prop_assert_eq!(deserialized, tx);
            prop_assert_eq!(consumed, serialized.len());
        }
    }
}
