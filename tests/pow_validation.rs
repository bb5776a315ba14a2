//! Proof-of-Work Admissibility Tests
//!
//! End-to-end checks of the auxpow-aware PoW entry point: version-bit and
//! appendix consistency, chain-id strictness, the legacy cutoff, and real
//! scrypt hashes of a merge-mined parent against the child's target. The
//! merge-mined vectors use the regtest-size target so the parent nonces
//! below are known to pass (2) and fail (0).

use doge_consensus::auxpow::AuxPowError;
use doge_consensus::chainparams::ConsensusParams;
use doge_consensus::constants::MERGED_MINING_HEADER;
use doge_consensus::pow::{validate_pow, validate_pow_at_height, PowError};
use doge_consensus::serialization::txid;
use doge_consensus::types::{
    AuxPow, BlockHeader, OutPoint, Transaction, TransactionInput, TransactionOutput,
};

const OUR_CHAIN_ID: i32 = 0x0062;

/// Child header claiming a merge-mined proof at the regtest-size target.
fn child_header() -> BlockHeader {
    BlockHeader {
        version: (OUR_CHAIN_ID << 16) | 0x100 | 4,
        prev_block_hash: [3; 32],
        merkle_root: [4; 32],
        time: 1_386_325_540,
        bits: 0x207fffff,
        nonce: 7,
        auxpow: None,
    }
}

/// Attach a one-leaf aux proof to the child; the parent's nonce decides
/// whether its scrypt hash meets the child's target.
fn merge_mined_header(parent_nonce: u32) -> BlockHeader {
    let mut child = child_header();

    let mut root_reversed = child.hash();
    root_reversed.reverse();
    let mut script = vec![0x11; 20];
    script.extend_from_slice(&MERGED_MINING_HEADER);
    script.extend_from_slice(&root_reversed);
    script.extend_from_slice(&1u32.to_le_bytes());
    script.extend_from_slice(&7u32.to_le_bytes());

    let coinbase = Transaction {
        version: 1,
        inputs: vec![TransactionInput {
            prevout: OutPoint::null(),
            script_sig: script,
            sequence: u32::MAX,
        }],
        outputs: vec![TransactionOutput {
            value: 0,
            script_pubkey: vec![],
        }],
        lock_time: 0,
    };

    let parent = BlockHeader {
        version: 2,
        prev_block_hash: [5; 32],
        merkle_root: txid(&coinbase),
        time: 1_386_325_600,
        bits: 0x207fffff,
        nonce: parent_nonce,
        auxpow: None,
    };

    child.auxpow = Some(Box::new(AuxPow {
        coinbase_tx: coinbase,
        parent_hash: [0; 32],
        coinbase_branch: vec![],
        coinbase_index: 0,
        chain_branch: vec![],
        chain_index: 0,
        parent_block: parent,
    }));
    child
}

#[test]
fn test_merge_mined_header_accepted() {
    let params = ConsensusParams::regtest();
    let header = merge_mined_header(2);
    assert_eq!(validate_pow(&header, &params), Ok(()));
}

#[test]
fn test_merge_mined_header_parent_work_insufficient() {
    let params = ConsensusParams::regtest();
    let header = merge_mined_header(0);
    assert_eq!(validate_pow(&header, &params), Err(PowError::InsufficientWork));
}

#[test]
fn test_auxpow_bit_without_appendix_rejected() {
    let params = ConsensusParams::regtest();
    let header = child_header();
    assert_eq!(validate_pow(&header, &params), Err(PowError::MissingAuxPow));
}

#[test]
fn test_appendix_without_auxpow_bit_rejected() {
    let params = ConsensusParams::regtest();
    let mut header = merge_mined_header(2);
    header.version &= !0x100;
    assert_eq!(validate_pow(&header, &params), Err(PowError::UnexpectedAuxPow));
}

#[test]
fn test_foreign_chain_id_rejected_when_strict() {
    let params = ConsensusParams::regtest();
    let mut header = merge_mined_header(2);
    // Foreign chain id in a non-legacy header.
    header.version = (0x0041 << 16) | 0x100 | 4;
    assert_eq!(
        validate_pow(&header, &params),
        Err(PowError::WrongChainId {
            got: 0x0041,
            expected: OUR_CHAIN_ID,
        })
    );
}

#[test]
fn test_auxpow_failure_propagates() {
    let params = ConsensusParams::regtest();
    let mut header = merge_mined_header(2);
    if let Some(auxpow) = header.auxpow.as_mut() {
        auxpow.coinbase_index = 3;
    }
    assert_eq!(
        validate_pow(&header, &params),
        Err(PowError::AuxPow(AuxPowError::NotAGenerate))
    );
}

#[test]
fn test_legacy_header_allowed_before_cutoff() {
    let params = ConsensusParams::regtest();
    // Legacy headers skip the chain-id rule; give it a trivially satisfied
    // target via the genesis knobs.
    let genesis = doge_consensus::chainparams::genesis_block(doge_consensus::types::Network::Regtest);
    assert_eq!(validate_pow_at_height(&genesis.header, 0, &params), Ok(()));
}

#[test]
fn test_legacy_header_rejected_at_cutoff() {
    let params = ConsensusParams::regtest();
    let genesis = doge_consensus::chainparams::genesis_block(doge_consensus::types::Network::Regtest);
    // Regtest disallows legacy blocks from height 20.
    assert_eq!(
        validate_pow_at_height(&genesis.header, 20, &params),
        Err(PowError::LegacyDisallowed)
    );
    assert_eq!(validate_pow_at_height(&genesis.header, 19, &params), Ok(()));
}

#[test]
fn test_target_above_pow_limit_rejected() {
    // The regtest-size target is far above the mainnet limit.
    let params = ConsensusParams::main();
    let mut header = merge_mined_header(2);
    header.version = (OUR_CHAIN_ID << 16) | 4;
    header.auxpow = None;
    assert_eq!(validate_pow(&header, &params), Err(PowError::BadTarget));
}
