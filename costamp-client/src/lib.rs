//! Costamp client library
//!
//! Process configuration, the gRPC transport to the timestamping
//! authority, and the [`TimestampClient`] call contract. An in-process
//! software authority for tests lives behind the `test-util` feature.

pub mod client;
pub mod config;
pub mod grpc;

#[cfg(feature = "test-util")]
pub mod testutil;

pub use client::TimestampClient;
pub use config::StampConfig;
