//! The collectively signed timestamp artifact

use crate::primitives::{Digest, GroupElement, GroupScalar};

/// Ordered sibling-hash path from a leaf digest up to the round's Merkle
/// root. The order is significant and must survive encoding unchanged.
pub type MerkleProof = Vec<Digest>;

/// A collectively signed timestamp binding a digest to a point in time.
///
/// Produced by the timestamping authority for one aggregation round;
/// read-only once constructed. The Schnorr fields (`challenge`, `response`,
/// `agg_commit`, `agg_public`) are the flattened result of the authority's
/// collective signing round over the tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampSignature {
    /// Identifier of the suite the authority signed under.
    pub suite_id: String,
    /// Opaque time marker assigned by the authority. Not validated against
    /// wall clock by verifiers.
    pub timestamp: i64,
    /// Root of the aggregation round's Merkle tree.
    pub merkle_root: Digest,
    /// Inclusion proof from the stamped digest to `merkle_root`.
    pub proof: MerkleProof,
    /// Schnorr challenge of the collective signature.
    pub challenge: GroupScalar,
    /// Schnorr response of the collective signature.
    pub response: GroupScalar,
    /// Aggregate commitment of the signing round.
    pub agg_commit: GroupElement,
    /// Aggregate public key the signature verifies under. Must equal the
    /// verifier's pinned key for verification to be meaningful.
    pub agg_public: GroupElement,
}

/// Domain separation prefix for the collectively signed message.
pub const SIGN_MESSAGE_PREFIX: &[u8] = b"COSTAMP-v1:";

/// Build the message the authority's collective signature commits to.
///
/// Message format: `"COSTAMP-v1:" || merkle_root || timestamp_be`. The
/// binding to the round root (rather than an individual leaf digest) and
/// the inclusion of the timestamp are fixed constants of the protocol.
pub fn build_sign_message(merkle_root: &Digest, timestamp: i64) -> Vec<u8> {
    let mut msg = Vec::with_capacity(SIGN_MESSAGE_PREFIX.len() + Digest::LEN + 8);
    msg.extend_from_slice(SIGN_MESSAGE_PREFIX);
    msg.extend_from_slice(merkle_root.as_bytes());
    msg.extend_from_slice(&timestamp.to_be_bytes());
    msg
}
