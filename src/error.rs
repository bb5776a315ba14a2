//! Error types for consensus validation

use std::borrow::Cow;
use thiserror::Error;

use crate::auxpow::AuxPowError;
use crate::pow::PowError;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ConsensusError {
    #[error("Serialization error: {0}")]
    Serialization(Cow<'static, str>),

    #[error("Proof of work validation failed: {0}")]
    Pow(#[from] PowError),

    #[error("AuxPoW validation failed: {0}")]
    AuxPow(#[from] AuxPowError),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
