//! # doge-consensus
//!
//! Consensus primitives for a Dogecoin-family merge-mined proof-of-work
//! chain: the block header model with its AuxPoW appendix, the byte-exact
//! wire codecs, the AuxPoW validator, and the per-network consensus
//! parameters.
//!
//! ## Design principles
//!
//! 1. **Pure functions**: every check is deterministic and side-effect-free
//!    given its inputs and the active parameters; validators may run in
//!    parallel on distinct headers.
//! 2. **Byte-exact encodings**: the wire codecs are consensus-critical;
//!    any deviation forks the network.
//! 3. **Opaque hashes**: hashes are plain 32-byte values everywhere; bytes
//!    are reversed only for display and for the root embedded in the parent
//!    coinbase script.
//!
//! ## Usage
//!
//! ```rust
//! use doge_consensus::chainparams::ConsensusParams;
//! use doge_consensus::pow::validate_pow;
//! use doge_consensus::chainparams::genesis_block;
//! use doge_consensus::types::Network;
//!
//! let params = ConsensusParams::regtest();
//! let genesis = genesis_block(Network::Regtest);
//! assert!(validate_pow(&genesis.header, &params).is_ok());
//! ```

pub mod auxpow;
pub mod block;
pub mod chainparams;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod merkle;
pub mod pow;
pub mod serialization;
pub mod types;

pub use auxpow::AuxPowError;
pub use chainparams::{genesis_block, params, select, ConsensusParams};
pub use error::{ConsensusError, Result};
pub use pow::{check_proof_of_work, validate_pow, validate_pow_at_height, PowError};
pub use types::{AuxPow, Block, BlockHeader, Hash, Network, Transaction};
