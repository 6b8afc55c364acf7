//! Cryptographic suite selection
//!
//! A suite names the hash function and algebraic group used consistently
//! for file digests, Merkle combination, and the collective Schnorr
//! signature. Signer and verifier must agree on the suite; a mismatch is a
//! verification failure, never a silent fallback.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::primitives::{GroupElement, GroupScalar};

/// A named (hash function, group) bundle.
///
/// The single supported suite hashes with BLAKE3 (32-byte digests) and
/// works in the ristretto255 group (32-byte canonical encodings for both
/// scalars and elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Ristretto255Blake3,
}

impl Suite {
    /// The wire identifier of this suite.
    pub const fn id(self) -> &'static str {
        match self {
            Suite::Ristretto255Blake3 => "ristretto255-blake3",
        }
    }

    /// Resolve a suite from its wire identifier.
    pub fn from_id(id: &str) -> Result<Self> {
        match id {
            "ristretto255-blake3" => Ok(Suite::Ristretto255Blake3),
            other => Err(Error::UnknownSuite(other.to_string())),
        }
    }

    /// Length in bytes of this suite's digests.
    pub const fn digest_len(self) -> usize {
        match self {
            Suite::Ristretto255Blake3 => 32,
        }
    }

    /// A fresh incremental hasher for this suite.
    pub fn hasher(self) -> blake3::Hasher {
        match self {
            Suite::Ristretto255Blake3 => blake3::Hasher::new(),
        }
    }

    /// Hash an arbitrary message into a scalar of the suite's group.
    pub fn hash_to_scalar(self, message: &[u8]) -> GroupScalar {
        let mut hasher = self.hasher();
        hasher.update(message);
        GroupScalar::from_bytes_mod_order(*hasher.finalize().as_bytes())
    }

    /// Decode a scalar from its canonical suite serialization.
    pub fn decode_scalar(self, bytes: &[u8]) -> Result<GroupScalar> {
        GroupScalar::from_slice(bytes)
    }

    /// Decode a group element from its canonical suite serialization.
    pub fn decode_element(self, bytes: &[u8]) -> Result<GroupElement> {
        GroupElement::from_slice(bytes)
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Suite {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Suite::from_id(s)
    }
}
