//! Genesis Block Verification Tests
//!
//! Rebuild each network's genesis block from its literal parameters and
//! verify the resulting hashes against the chain's fixed expectations.
//! Genesis construction exercises the transaction codec, the merkle root
//! and the header hash in one shot; a single wrong byte anywhere shows up
//! here.

use doge_consensus::chainparams::{genesis_block, ConsensusParams};
use doge_consensus::pow::validate_pow;
use doge_consensus::types::{hash_from_hex, hash_to_hex, Network};

#[test]
fn test_mainnet_genesis_hash() {
    let genesis = genesis_block(Network::Mainnet);
    assert_eq!(
        hash_to_hex(&genesis.block_hash()),
        "1a91e3dace36e2be3bf030a65679fe821aa1d6ef92e7c9902eb318182c355691"
    );
    assert_eq!(
        hash_to_hex(&genesis.header.merkle_root),
        "5b2a3f53f605d62c53e62932dac6925e3d74afa5a4b459745c36d42d0ed26a69"
    );
}

#[test]
fn test_testnet_genesis_hash() {
    let genesis = genesis_block(Network::Testnet);
    assert_eq!(
        hash_to_hex(&genesis.block_hash()),
        "bb0a78264637406b6360aad926284d544d7049f45189db5664f3c4d07350559e"
    );
}

#[test]
fn test_regtest_genesis_hash() {
    let genesis = genesis_block(Network::Regtest);
    assert_eq!(
        hash_to_hex(&genesis.block_hash()),
        "3d2160a3b5dc4a9d62e7e66a295f70313ac808440ef7400d6c0772171ce973a5"
    );
}

#[test]
fn test_all_networks_share_the_genesis_merkle_root() {
    // Same coinbase everywhere; only the header knobs differ.
    let root = genesis_block(Network::Mainnet).header.merkle_root;
    assert_eq!(genesis_block(Network::Testnet).header.merkle_root, root);
    assert_eq!(genesis_block(Network::Regtest).header.merkle_root, root);
}

#[test]
fn test_params_reference_their_genesis() {
    for network in [Network::Mainnet, Network::Testnet, Network::Regtest] {
        let params = ConsensusParams::for_network(network);
        assert_eq!(
            params.genesis_hash,
            genesis_block(network).block_hash(),
            "{network}"
        );
    }
}

#[test]
fn test_genesis_header_fields() {
    let genesis = genesis_block(Network::Mainnet);
    assert_eq!(genesis.header.version, 1);
    assert!(genesis.header.is_legacy());
    assert!(!genesis.header.is_auxpow());
    assert_eq!(genesis.header.time, 1_386_325_540);
    assert_eq!(genesis.header.bits, 0x1e0ffff0);
    assert_eq!(genesis.header.nonce, 99_943);
    assert_eq!(genesis.header.prev_block_hash, [0u8; 32]);
    assert_eq!(genesis.transactions.len(), 1);
}

#[test]
fn test_genesis_satisfies_its_own_pow() {
    let params = ConsensusParams::main();
    let genesis = genesis_block(Network::Mainnet);
    assert!(validate_pow(&genesis.header, &params).is_ok());

    let params = ConsensusParams::regtest();
    let genesis = genesis_block(Network::Regtest);
    assert!(validate_pow(&genesis.header, &params).is_ok());
}

#[test]
fn test_hash_literals_parse_to_stored_byte_order() {
    let expected = hash_from_hex("1a91e3dace36e2be3bf030a65679fe821aa1d6ef92e7c9902eb318182c355691")
        .unwrap();
    assert_eq!(genesis_block(Network::Mainnet).block_hash(), expected);
}
