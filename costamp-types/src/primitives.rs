//! Primitive cryptographic types

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;

use crate::error::{Error, Result};

/// A cryptographic digest (hash output), 32 bytes for every supported suite.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    pub const LEN: usize = 32;

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != Self::LEN {
            return Err(Error::InvalidDigestLength {
                expected: Self::LEN,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A scalar in the suite's group, e.g. a Schnorr challenge or response.
///
/// Only canonical 32-byte little-endian encodings are accepted when
/// decoding; equality is equality of the canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GroupScalar(Scalar);

impl GroupScalar {
    pub const LEN: usize = 32;

    pub fn from_scalar(scalar: Scalar) -> Self {
        Self(scalar)
    }

    /// Decode a canonical scalar encoding. Non-canonical encodings (values
    /// at or above the group order) are rejected.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Result<Self> {
        Option::<Scalar>::from(Scalar::from_canonical_bytes(bytes))
            .map(Self)
            .ok_or(Error::InvalidScalar)
    }

    /// Interpret 32 bytes as an integer and reduce modulo the group order.
    pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Self {
        Self(Scalar::from_bytes_mod_order(bytes))
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| Error::InvalidScalar)?;
        Self::from_canonical_bytes(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = BASE64.decode(s).map_err(|_| Error::InvalidScalar)?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for GroupScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupScalar({}...)", hex::encode(&self.to_bytes()[..8]))
    }
}

/// An element of the suite's group, e.g. an aggregate commitment or an
/// aggregate public key.
///
/// Decoding accepts only valid canonical compressed encodings; equality is
/// equality of the compressed encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GroupElement(RistrettoPoint);

impl GroupElement {
    pub const LEN: usize = 32;

    pub fn from_point(point: RistrettoPoint) -> Self {
        Self(point)
    }

    /// Decode a compressed group element. Invalid encodings are rejected.
    pub fn from_compressed_bytes(bytes: [u8; 32]) -> Result<Self> {
        CompressedRistretto(bytes)
            .decompress()
            .map(Self)
            .ok_or(Error::InvalidElement)
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| Error::InvalidElement)?;
        Self::from_compressed_bytes(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }

    pub fn as_point(&self) -> &RistrettoPoint {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = BASE64.decode(s).map_err(|_| Error::InvalidElement)?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupElement({}...)", hex::encode(&self.to_bytes()[..8]))
    }
}

impl fmt::Display for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}
