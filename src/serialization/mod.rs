//! Wire format serialization/deserialization
//!
//! Consensus-critical byte-exact codecs; any deviation from the reference
//! layout forks the network. All multi-byte integers are little-endian and
//! variable-length sequences carry a CompactSize prefix.

pub mod block;
pub mod transaction;
pub mod varint;

pub use block::{
    deserialize_block, deserialize_header, serialize_block, serialize_header,
    serialize_header_preimage,
};
pub use transaction::{deserialize_transaction, serialize_transaction, txid};
pub use varint::{decode_varint, encode_varint, VarIntError};
