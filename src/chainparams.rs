//! Per-network consensus parameters, genesis construction and the
//! process-wide parameter registry
//!
//! Three hard-coded parameter sets describe mainnet, testnet and regtest.
//! `select` installs one of them at process start; `params` reads the active
//! set and treats a read before any `select` as a programming error. Tests
//! that need several networks at once construct parameter values directly
//! and pass them as arguments instead of going through the registry.

use crate::constants::COIN;
use crate::merkle::merkle_root;
use crate::pow::U256;
use crate::serialization::txid;
use crate::types::{
    hash_from_hex, Block, BlockHeader, Hash, Network, OutPoint, Transaction, TransactionInput,
    TransactionOutput,
};
use std::sync::{Arc, RwLock};

/// Parameters that influence chain consensus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusParams {
    /// Expected hash of the fixed genesis block
    pub genesis_hash: Hash,
    /// Block count per subsidy halving era
    pub subsidy_halving_interval: u32,
    /// Height at which BIP34 becomes active, and the hash of that block
    pub bip34_height: u32,
    pub bip34_hash: Hash,
    /// Height at which BIP65 becomes active
    pub bip65_height: u32,
    /// Height at which BIP66 becomes active
    pub bip66_height: u32,
    pub csv_height: u32,
    pub witness_height: u32,
    pub coinbase_maturity_begin: u32,
    pub coinbase_maturity_240_height: u32,
    /// Maximum target (lowest difficulty)
    pub pow_limit: U256,
    pub allow_min_difficulty_blocks: bool,
    /// Target block interval in seconds
    pub pow_target_spacing: u32,
    /// Retarget timespan before the 60-second era, in seconds
    pub pow_target_timespan_begin: u32,
    pub pow_target_timespan_60_height: u32,
    pub min_chain_work: Hash,
    pub default_assume_valid: Hash,
    /// This chain's merge-mining id
    pub aux_chain_id: i32,
    /// Reject legacy encodings and same-id parents in AuxPoW
    pub strict_chain_id: bool,
    pub digishield_height: u32,
    pub simplified_rewards_height: u32,
    /// Height past which legacy (pre-merge-mining) blocks are rejected
    pub disallow_legacy_blocks_height: u32,
}

impl ConsensusParams {
    /// Retarget timespan in effect at `height`, in seconds.
    pub fn pow_target_timespan(&self, height: u32) -> u32 {
        if height >= self.pow_target_timespan_60_height {
            60
        } else {
            self.pow_target_timespan_begin
        }
    }

    /// Blocks per difficulty adjustment interval at `height`.
    pub fn difficulty_adjustment_interval(&self, height: u32) -> u32 {
        self.pow_target_timespan(height) / self.pow_target_spacing
    }

    /// Coinbase maturity in effect at `height`.
    pub fn coinbase_maturity(&self, height: u32) -> u32 {
        if height >= self.coinbase_maturity_240_height {
            240
        } else {
            self.coinbase_maturity_begin
        }
    }

    /// Main network parameters.
    pub fn main() -> Self {
        ConsensusParams {
            genesis_hash: uint256s("1a91e3dace36e2be3bf030a65679fe821aa1d6ef92e7c9902eb318182c355691"),
            subsidy_halving_interval: 100_000,
            bip34_height: 1_034_383,
            bip34_hash: uint256s("80d1364201e5df97e696c03bdd24dc885e8617b9de51e453c10a4f629b1e797a"),
            // First v4 block after the last v3 block
            bip65_height: 3_464_751,
            // 1900 blocks past the last v2 block
            bip66_height: 1_034_383,
            csv_height: 0,
            witness_height: 0,
            coinbase_maturity_begin: 30,
            coinbase_maturity_240_height: 145_000,
            pow_limit: U256::MAX.shr(20),
            allow_min_difficulty_blocks: false,
            pow_target_spacing: 60,
            // Pre-digishield: 4 hours
            pow_target_timespan_begin: 4 * 60 * 60,
            pow_target_timespan_60_height: 145_000,
            min_chain_work: uint256s("0000000000000000000000000000000000000000000002f090e3e57191fd0703"),
            default_assume_valid: uint256s("195a83b091fb3ee7ecb56f2e63d01709293f57f971ccf373d93890c8dc1033db"),
            aux_chain_id: 0x0062,
            strict_chain_id: true,
            digishield_height: 145_000,
            simplified_rewards_height: 145_000,
            disallow_legacy_blocks_height: 371_337,
        }
    }

    /// Test network (v3) parameters.
    pub fn testnet() -> Self {
        ConsensusParams {
            genesis_hash: uint256s("bb0a78264637406b6360aad926284d544d7049f45189db5664f3c4d07350559e"),
            subsidy_halving_interval: 100_000,
            bip34_height: 708_658,
            bip34_hash: uint256s("21b8b97dcdb94caa67c7f8f6dbf22e61e0cfe0e46e1fff3528b22864659e9b38"),
            bip65_height: 1_854_705,
            bip66_height: 708_658,
            csv_height: 0,
            witness_height: 0,
            coinbase_maturity_begin: 30,
            coinbase_maturity_240_height: 145_000,
            pow_limit: U256::MAX.shr(20),
            allow_min_difficulty_blocks: true,
            pow_target_spacing: 60,
            pow_target_timespan_begin: 4 * 60 * 60,
            pow_target_timespan_60_height: 145_000,
            min_chain_work: uint256s("00000000000000000000000000000000000000000000000000001030d1382ade"),
            default_assume_valid: uint256s("6943eaeaba98dc7d09f7e73398daccb4abcabb18b66c8c875e52b07638d93951"),
            aux_chain_id: 0x0062,
            strict_chain_id: false,
            digishield_height: 145_000,
            simplified_rewards_height: 145_000,
            disallow_legacy_blocks_height: 158_100,
        }
    }

    /// Regression test parameters.
    pub fn regtest() -> Self {
        ConsensusParams {
            genesis_hash: uint256s("3d2160a3b5dc4a9d62e7e66a295f70313ac808440ef7400d6c0772171ce973a5"),
            subsidy_halving_interval: 150,
            // BIP34 never activates on regtest so v1 blocks stay valid in tests
            bip34_height: 100_000_000,
            bip34_hash: [0u8; 32],
            bip65_height: 1251,
            bip66_height: 1251,
            csv_height: 0,
            witness_height: 0,
            coinbase_maturity_begin: 60,
            coinbase_maturity_240_height: 100_000,
            pow_limit: U256::MAX.shr(1),
            allow_min_difficulty_blocks: true,
            pow_target_spacing: 1,
            pow_target_timespan_begin: 1,
            pow_target_timespan_60_height: 100_000,
            min_chain_work: [0u8; 32],
            default_assume_valid: [0u8; 32],
            aux_chain_id: 0x0062,
            strict_chain_id: true,
            digishield_height: 10,
            simplified_rewards_height: 0,
            disallow_legacy_blocks_height: 20,
        }
    }

    /// The parameter set for a network.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::main(),
            Network::Testnet => Self::testnet(),
            Network::Regtest => Self::regtest(),
        }
    }
}

/// Parse a hard-coded hash literal written in the conventional reversed hex
/// form. Only used for the compile-time constants above.
fn uint256s(hex: &str) -> Hash {
    hash_from_hex(hex).expect("hard-coded hash literal is valid hex")
}

const GENESIS_TIMESTAMP: &[u8] = b"Nintondo";

const GENESIS_OUTPUT_PUBKEY: &str = "040184710fa689ad5023690c80f3a49c8f13f8d45b8c857fbcbc8bc4a8e4d3eb4b10f4d4604fa08dce601aaf0f470216fe1b51850b4acf21b179c45070ac7b03a9";

/// Build a genesis block from its network-specific knobs.
///
/// The coinbase input script pushes the original target (0x1d00ffff as a
/// script number), the number 4, and the timestamp literal; the single
/// output pays `reward` to a bare pubkey with OP_CHECKSIG.
fn create_genesis_block(time: u32, nonce: u32, bits: u32, version: i32, reward: i64) -> Block {
    let mut script_sig = Vec::with_capacity(17);
    script_sig.push(0x04);
    script_sig.extend_from_slice(&486_604_799u32.to_le_bytes());
    script_sig.extend_from_slice(&[0x01, 0x04]);
    script_sig.push(GENESIS_TIMESTAMP.len() as u8);
    script_sig.extend_from_slice(GENESIS_TIMESTAMP);

    let pubkey = hex::decode(GENESIS_OUTPUT_PUBKEY).expect("hard-coded pubkey literal is valid hex");
    let mut script_pubkey = Vec::with_capacity(pubkey.len() + 2);
    script_pubkey.push(pubkey.len() as u8);
    script_pubkey.extend_from_slice(&pubkey);
    script_pubkey.push(0xac); // OP_CHECKSIG

    let coinbase = Transaction {
        version: 1,
        inputs: vec![TransactionInput {
            prevout: OutPoint::null(),
            script_sig,
            sequence: u32::MAX,
        }],
        outputs: vec![TransactionOutput {
            value: reward,
            script_pubkey,
        }],
        lock_time: 0,
    };

    let header = BlockHeader {
        version,
        prev_block_hash: [0u8; 32],
        merkle_root: merkle_root(&[txid(&coinbase)]),
        time,
        bits,
        nonce,
        auxpow: None,
    };

    Block {
        header,
        transactions: vec![coinbase].into_boxed_slice(),
    }
}

/// The genesis block of a network.
pub fn genesis_block(network: Network) -> Block {
    match network {
        Network::Mainnet => create_genesis_block(1_386_325_540, 99_943, 0x1e0ffff0, 1, 88 * COIN),
        Network::Testnet => create_genesis_block(1_391_503_289, 997_879, 0x1e0ffff0, 1, 88 * COIN),
        Network::Regtest => create_genesis_block(1_296_688_602, 2, 0x207fffff, 1, 88 * COIN),
    }
}

static CHAIN_PARAMS: RwLock<Option<Arc<ConsensusParams>>> = RwLock::new(None);

/// Install the parameter set for `network` as the process-wide active set.
///
/// Called once during initialization; a later call replaces the active set.
pub fn select(network: Network) {
    let mut guard = CHAIN_PARAMS
        .write()
        .expect("chain parameter registry poisoned");
    *guard = Some(Arc::new(ConsensusParams::for_network(network)));
}

/// The active parameter set.
///
/// # Panics
///
/// Panics if called before [`select`]; reading parameters before a network
/// is chosen is a programming error.
pub fn params() -> Arc<ConsensusParams> {
    CHAIN_PARAMS
        .read()
        .expect("chain parameter registry poisoned")
        .as_ref()
        .expect("chain parameters requested before select()")
        .clone()
}
