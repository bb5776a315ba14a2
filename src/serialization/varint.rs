//! CompactSize encoding/decoding
//!
//! Variable-length integer prefix used throughout the wire format for
//! sequence lengths. Uses 1-9 bytes depending on the value:
//! - If value < 0xfd: single byte
//! - If value <= 0xffff: 0xfd prefix + 2 bytes (little-endian)
//! - If value <= 0xffffffff: 0xfe prefix + 4 bytes (little-endian)
//! - Otherwise: 0xff prefix + 8 bytes (little-endian)
//!
//! Decoding enforces canonical form: a value encoded with a wider prefix
//! than necessary is rejected.

use crate::error::{ConsensusError, Result};
use std::borrow::Cow;

/// Error type for CompactSize encoding/decoding failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarIntError {
    /// Insufficient bytes to decode the value
    InsufficientBytes,
    /// Non-canonical encoding (wider prefix than the value requires)
    InvalidEncoding,
}

impl std::fmt::Display for VarIntError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarIntError::InsufficientBytes => write!(f, "Insufficient bytes to decode CompactSize"),
            VarIntError::InvalidEncoding => write!(f, "Non-canonical CompactSize encoding"),
        }
    }
}

impl std::error::Error for VarIntError {}

impl From<VarIntError> for ConsensusError {
    fn from(err: VarIntError) -> Self {
        ConsensusError::Serialization(Cow::Owned(err.to_string()))
    }
}

/// Encode a u64 value as a CompactSize
pub fn encode_varint(value: u64) -> Vec<u8> {
    if value < 0xfd {
        vec![value as u8]
    } else if value <= 0xffff {
        let mut result = vec![0xfd];
        result.extend_from_slice(&(value as u16).to_le_bytes());
        result
    } else if value <= 0xffff_ffff {
        let mut result = vec![0xfe];
        result.extend_from_slice(&(value as u32).to_le_bytes());
        result
    } else {
        let mut result = vec![0xff];
        result.extend_from_slice(&value.to_le_bytes());
        result
    }
}

/// Decode a CompactSize from bytes
///
/// Returns the decoded value and the number of bytes consumed.
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize)> {
    let first_byte = *data.first().ok_or(VarIntError::InsufficientBytes)?;

    match first_byte {
        b if b < 0xfd => Ok((b as u64, 1)),

        0xfd => {
            if data.len() < 3 {
                return Err(VarIntError::InsufficientBytes.into());
            }
            let value = u16::from_le_bytes([data[1], data[2]]) as u64;
            if value < 0xfd {
                return Err(VarIntError::InvalidEncoding.into());
            }
            Ok((value, 3))
        }

        0xfe => {
            if data.len() < 5 {
                return Err(VarIntError::InsufficientBytes.into());
            }
            let value = u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as u64;
            if value <= 0xffff {
                return Err(VarIntError::InvalidEncoding.into());
            }
            Ok((value, 5))
        }

        _ => {
            if data.len() < 9 {
                return Err(VarIntError::InsufficientBytes.into());
            }
            let value = u64::from_le_bytes([
                data[1], data[2], data[3], data[4], data[5], data[6], data[7], data[8],
            ]);
            if value <= 0xffff_ffff {
                return Err(VarIntError::InvalidEncoding.into());
            }
            Ok((value, 9))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_small() {
        assert_eq!(encode_varint(0), vec![0]);
        assert_eq!(encode_varint(252), vec![252]);
    }

    #[test]
    fn test_encode_boundaries() {
        assert_eq!(encode_varint(253), vec![0xfd, 253, 0]);
        assert_eq!(encode_varint(0xffff), vec![0xfd, 255, 255]);
        assert_eq!(encode_varint(0x10000), vec![0xfe, 0, 0, 1, 0]);
        assert_eq!(encode_varint(0xffff_ffff), vec![0xfe, 255, 255, 255, 255]);
        assert_eq!(
            encode_varint(0x1_0000_0000),
            vec![0xff, 0, 0, 0, 0, 1, 0, 0, 0]
        );
    }

    #[test]
    fn test_decode_small() {
        assert_eq!(decode_varint(&[0]).unwrap(), (0, 1));
        assert_eq!(decode_varint(&[252]).unwrap(), (252, 1));
    }

    #[test]
    fn test_decode_boundaries() {
        assert_eq!(decode_varint(&[0xfd, 253, 0]).unwrap(), (253, 3));
        assert_eq!(decode_varint(&[0xfd, 255, 255]).unwrap(), (0xffff, 3));
        assert_eq!(decode_varint(&[0xfe, 0, 0, 1, 0]).unwrap(), (0x10000, 5));
        assert_eq!(
            decode_varint(&[0xff, 0, 0, 0, 0, 1, 0, 0, 0]).unwrap(),
            (0x1_0000_0000, 9)
        );
    }

    #[test]
    fn test_decode_insufficient_bytes() {
        assert!(decode_varint(&[]).is_err());
        assert!(decode_varint(&[0xfd]).is_err());
        assert!(decode_varint(&[0xfd, 0]).is_err());
        assert!(decode_varint(&[0xfe, 0, 0, 0]).is_err());
        assert!(decode_varint(&[0xff, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_decode_non_canonical() {
        // 252 must use the single-byte form.
        assert!(decode_varint(&[0xfd, 252, 0]).is_err());
        // 0xffff must use the 0xfd form.
        assert!(decode_varint(&[0xfe, 255, 255, 0, 0]).is_err());
        // 0xffffffff must use the 0xfe form.
        assert!(decode_varint(&[0xff, 255, 255, 255, 255, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_round_trip_boundary_values() {
        for value in [
            0u64,
            252,
            253,
            0xffff,
            0x10000,
            0xffff_ffff,
            0x1_0000_0000,
            u64::MAX,
        ] {
            let encoded = encode_varint(value);
            let (decoded, consumed) = decode_varint(&encoded).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, encoded.len());
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_round_trip(value in any::<u64>()) {
            let encoded = encode_varint(value);
            let (decoded, consumed) = decode_varint(&encoded).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert_eq!(consumed, encoded.len());
        }
    }
}

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// decode(encode(v)) = v, and the whole encoding is consumed.
    #[kani::proof]
    fn kani_varint_round_trip() {
        let value: u64 = kani::any();
        let encoded = encode_varint(value);
        let decoded = decode_varint(&encoded);
        assert!(decoded.is_ok(), "canonical encodings must decode");
        let (decoded, consumed) = decoded.unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, encoded.len());
    }
}
