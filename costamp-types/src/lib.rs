//! Core types and wire formats for Costamp
//!
//! This crate defines the cryptographic suite abstraction, the primitive
//! value types (digests, group scalars and elements), the collectively
//! signed timestamp artifact, and its portable JSON-safe encoding.

pub mod error;
pub mod portable;
pub mod primitives;
pub mod signature;
pub mod suite;

pub use error::{DecodeError, Error, Result, StampError};
pub use portable::{ErrorEnvelope, PortableSignature, ProofCodec, SignatureEnvelope, VerifyEnvelope};
pub use primitives::{Digest, GroupElement, GroupScalar};
pub use signature::{build_sign_message, MerkleProof, TimestampSignature};
pub use suite::Suite;
