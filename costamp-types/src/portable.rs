//! Portable wire encoding of timestamp signatures
//!
//! The signature artifact must survive transport through a JSON document
//! and stay legible to non-native consumers (a browser client), so every
//! binary field is carried as standard padded base64 and the timestamp as
//! a decimal string. Encoding is total; decoding is partial and surfaces
//! the first field that fails instead of substituting defaults.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::primitives::Digest;
use crate::signature::TimestampSignature;
use crate::suite::Suite;

/// JSON-safe form of a [`TimestampSignature`], plus the original filename
/// as display metadata. The filename never participates in hashing or
/// verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableSignature {
    pub suite: String,
    pub filename: String,
    /// Decimal string form of the authority's signed 64-bit timestamp.
    pub timestamp: String,
    /// Base64 sibling hashes, order preserved exactly.
    pub proof: Vec<String>,
    #[serde(rename = "merkleRoot")]
    pub merkle_root: String,
    pub challenge: String,
    pub response: String,
    #[serde(rename = "aggCommit")]
    pub agg_commit: String,
    #[serde(rename = "aggPublic")]
    pub agg_public: String,
}

/// Top-level envelope of a successful signing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEnvelope {
    pub data: PortableSignature,
}

/// Top-level envelope of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

/// Response body of a verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEnvelope {
    #[serde(rename = "validSignature")]
    pub valid_signature: bool,
}

/// Converter between [`TimestampSignature`] and [`PortableSignature`].
///
/// Bound to the process-wide suite: crypto fields are decoded with the
/// local suite's canonical serialization. A foreign `suite` string in the
/// artifact is not a decode error; it surfaces later as an ordinary
/// verification failure.
#[derive(Debug, Clone, Copy)]
pub struct ProofCodec {
    suite: Suite,
}

impl ProofCodec {
    pub fn new(suite: Suite) -> Self {
        Self { suite }
    }

    /// Encode a signature for transport. Never fails for a well-formed
    /// signature; `filename` is carried as metadata only.
    pub fn encode(&self, sig: &TimestampSignature, filename: &str) -> PortableSignature {
        PortableSignature {
            suite: sig.suite_id.clone(),
            filename: filename.to_string(),
            timestamp: sig.timestamp.to_string(),
            proof: sig
                .proof
                .iter()
                .map(|step| BASE64.encode(step.as_bytes()))
                .collect(),
            merkle_root: BASE64.encode(sig.merkle_root.as_bytes()),
            challenge: sig.challenge.to_base64(),
            response: sig.response.to_base64(),
            agg_commit: sig.agg_commit.to_base64(),
            agg_public: sig.agg_public.to_base64(),
        }
    }

    /// Reconstruct the in-memory signature, rejecting the first malformed
    /// field. Fields are checked in wire order: timestamp, proof steps,
    /// merkleRoot, challenge, response, aggCommit, aggPublic.
    pub fn decode(&self, portable: &PortableSignature) -> Result<TimestampSignature, DecodeError> {
        let timestamp: i64 = portable
            .timestamp
            .parse()
            .map_err(|_| DecodeError::InvalidTimestamp(portable.timestamp.clone()))?;

        let mut proof = Vec::with_capacity(portable.proof.len());
        for step in &portable.proof {
            proof.push(self.decode_digest(step, "proof")?);
        }

        let merkle_root = self.decode_digest(&portable.merkle_root, "merkleRoot")?;

        let challenge = self
            .suite
            .decode_scalar(&self.decode_base64(&portable.challenge, "challenge")?)
            .map_err(|_| DecodeError::InvalidCryptoField("challenge"))?;

        let response = self
            .suite
            .decode_scalar(&self.decode_base64(&portable.response, "response")?)
            .map_err(|_| DecodeError::InvalidCryptoField("response"))?;

        let agg_commit = self
            .suite
            .decode_element(&self.decode_base64(&portable.agg_commit, "aggCommit")?)
            .map_err(|_| DecodeError::InvalidCryptoField("aggCommit"))?;

        let agg_public = self
            .suite
            .decode_element(&self.decode_base64(&portable.agg_public, "aggPublic")?)
            .map_err(|_| DecodeError::InvalidCryptoField("aggPublic"))?;

        Ok(TimestampSignature {
            suite_id: portable.suite.clone(),
            timestamp,
            merkle_root,
            proof,
            challenge,
            response,
            agg_commit,
            agg_public,
        })
    }

    /// Strict standard base64 with required canonical padding.
    fn decode_base64(&self, s: &str, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        BASE64.decode(s).map_err(|_| DecodeError::Malformed(field))
    }

    fn decode_digest(&self, s: &str, field: &'static str) -> Result<Digest, DecodeError> {
        let bytes = self.decode_base64(s, field)?;
        if bytes.len() != self.suite.digest_len() {
            return Err(DecodeError::Malformed(field));
        }
        Digest::from_slice(&bytes).map_err(|_| DecodeError::Malformed(field))
    }
}
