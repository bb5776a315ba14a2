//! Cryptographic hash primitives
//!
//! Two hashes carry the whole consensus surface: double SHA-256 for block and
//! transaction identity, and scrypt (N=1024, r=1, p=1) over the 80-byte
//! header preimage for proof of work.

use crate::types::Hash;
use scrypt::Params as ScryptParams;
use sha2::{Digest, Sha256};

/// Single SHA-256 hash
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut result = [0u8; 32];
    result.copy_from_slice(&digest);
    result
}

/// Double SHA-256 hash (the chain's identity hash)
///
/// Output is the raw digest; callers never reverse it except at the two
/// documented display/script-embedding sites.
pub fn hash256(data: &[u8]) -> Hash {
    let first = sha256(data);
    sha256(&first)
}

/// Scrypt proof-of-work hash: N=1024, r=1, p=1, 32-byte output.
///
/// The input doubles as the salt, matching the scrypt_1024_1_1_256 primitive
/// used by scrypt-based chains. Input is the exact 80-byte header preimage.
pub fn scrypt_1024_1_1_256(data: &[u8]) -> Hash {
    // log2(1024) = 10
    let params = ScryptParams::new(10, 1, 1, 32).expect("fixed scrypt parameters are valid");
    let mut output = [0u8; 32];
    scrypt::scrypt(data, data, &params, &mut output)
        .expect("32-byte scrypt output length is valid");
    output
}
