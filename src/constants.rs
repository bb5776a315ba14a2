//! Chain-wide consensus constants

/// Smallest currency unit per coin
pub const COIN: i64 = 100_000_000;

/// Version bit flagging the presence of a merge-mining appendix
pub const VERSION_AUXPOW: i32 = 1 << 8;

/// Bit position of the chain id inside the block version
pub const VERSION_CHAIN_ID_SHIFT: u32 = 16;

/// Marker preceding the chain merkle root in a merged-mining coinbase script
pub const MERGED_MINING_HEADER: [u8; 4] = [0xfa, 0xbe, b'm', b'm'];

/// Maximum number of levels in the aux chain merkle branch.
///
/// Bounds the aux tree at 2^30 leaves; the committed tree size is encoded as
/// `1 << len` in a u32, so the bound also keeps that shift in range.
pub const MAX_CHAIN_BRANCH_LENGTH: usize = 30;

/// A chain merkle root without a merged-mining header must start within this
/// many bytes of the parent coinbase script (backward compatibility rule).
pub const MAX_UNMARKED_ROOT_OFFSET: usize = 20;
