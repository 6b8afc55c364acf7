//! Error types for Costamp

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid digest length: expected {expected}, got {actual}")]
    InvalidDigestLength { expected: usize, actual: usize },

    #[error("Invalid group scalar encoding")]
    InvalidScalar,

    #[error("Invalid group element encoding")]
    InvalidElement,

    #[error("Unknown cryptographic suite: {0}")]
    UnknownSuite(String),

    #[error("Hex encoding error: {0}")]
    HexEncoding(#[from] hex::FromHexError),
}

/// Failure modes of decoding a portable signature back into its in-memory
/// form. Decoding stops at the first failing field; the variant names the
/// field so callers can report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed field `{0}`")]
    Malformed(&'static str),

    #[error("Invalid cryptographic value in field `{0}`")]
    InvalidCryptoField(&'static str),

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// Failure modes of requesting a stamp from the timestamping authority.
///
/// Only `Unavailable` is retryable; `Protocol` means the authority sent
/// something this implementation cannot accept, and `Misconfigured` means
/// the local process must not attempt stamping at all.
#[derive(Error, Debug)]
pub enum StampError {
    #[error("Authority unavailable: {0}")]
    Unavailable(String),

    #[error("Authority protocol violation: {0}")]
    Protocol(String),

    #[error("Misconfigured: {0}")]
    Misconfigured(String),
}

impl StampError {
    /// Whether the orchestrating caller may reasonably retry the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StampError::Unavailable(_))
    }
}
