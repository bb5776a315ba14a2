//! Core data types for consensus validation

use serde::{Deserialize, Serialize};

/// Hash type: 256-bit hash, stored in raw (little-endian) byte order
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Render a hash in the conventional reversed (big-endian visual) hex form.
///
/// This is one of exactly two places where hash bytes are reversed; the other
/// is the chain merkle root embedded into the parent coinbase script
/// (see `auxpow`). Everywhere else hashes are opaque 32-byte values.
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut bytes = *hash;
    bytes.reverse();
    hex::encode(bytes)
}

/// Parse a hash from the conventional reversed hex form.
pub fn hash_from_hex(s: &str) -> Result<Hash, hex::FromHexError> {
    let bytes = hex::decode(s)?;
    if bytes.len() != 32 {
        return Err(hex::FromHexError::InvalidStringLength);
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes);
    hash.reverse();
    Ok(hash)
}

/// The network a parameter set describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "main"),
            Network::Testnet => write!(f, "test"),
            Network::Regtest => write!(f, "regtest"),
        }
    }
}

/// Reference to an output of a previous transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl OutPoint {
    /// The null outpoint used by coinbase inputs.
    pub fn null() -> Self {
        OutPoint {
            hash: [0u8; 32],
            index: u32::MAX,
        }
    }
}

/// Transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    pub sequence: u32,
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: i64,
    pub script_pubkey: ByteString,
}

/// Transaction
///
/// AuxPoW only ever inspects the first input's `script_sig` of a parent-chain
/// coinbase; scripts are carried as opaque byte sequences throughout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

/// Block header: the fixed 80-byte hashing preimage plus the optional
/// merge-mining appendix.
///
/// The appendix is a value carried alongside the preimage fields; its
/// presence on the wire is governed by bit 8 of `version` and it never
/// contributes to the header hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block_hash: Hash,
    pub merkle_root: Hash,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub auxpow: Option<Box<AuxPow>>,
}

/// Merge-mined auxiliary proof of work.
///
/// Ties this chain's block hash to a parent-chain coinbase through two merkle
/// proofs: `coinbase_branch` places `coinbase_tx` in the parent block's
/// transaction tree, and `chain_branch` places our block hash in an aux-chain
/// tree whose root is committed inside the parent coinbase script. The real
/// PoW is computed on `parent_block`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxPow {
    /// The parent chain's coinbase transaction.
    pub coinbase_tx: Transaction,
    /// Historical parent block hash hint; serialized but not re-validated.
    pub parent_hash: Hash,
    /// Merkle branch connecting `coinbase_tx` to the parent merkle root.
    pub coinbase_branch: Vec<Hash>,
    pub coinbase_index: i32,
    /// Merkle branch connecting the aux block hash to the committed root.
    pub chain_branch: Vec<Hash>,
    /// Index of the aux block hash in the aux chain merkle tree.
    pub chain_index: i32,
    /// Parent block header (on which the real PoW is done). Carried as a
    /// plain 80-byte value; its own auxpow bit is never followed.
    pub parent_block: BlockHeader,
}

/// Block: header plus transaction list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Box<[Transaction]>,
}
