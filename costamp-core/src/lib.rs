//! Core cryptographic functionality for Costamp
//!
//! This crate provides:
//! - Constant-memory streaming digests of arbitrarily large inputs
//! - Merkle proof recombination and round-tree construction
//! - Collective Schnorr signing and verification primitives
//! - The four-step timestamp signature verifier

pub mod hasher;
pub mod merkle;
pub mod schnorr;
pub mod verify;

pub use hasher::{DigestAccumulator, StreamHasher};
pub use merkle::{compute_root, RoundTree, RoundTreeBuilder};
pub use schnorr::{CollectiveParts, SigningMember};
pub use verify::SignatureVerifier;
