//! Client for requesting stamps from the timestamping authority
//!
//! One call, one attempt: the client performs no internal retries and
//! imposes no internal timeout. Whether "this digest was never stamped"
//! and "this digest was stamped but the response was lost" need to be
//! distinguished is a consistency question only the orchestrating caller
//! can answer, so retry and timeout policy live there.

use std::sync::Arc;

use tracing::debug;

use costamp_types::{Digest, GroupElement, StampError, TimestampSignature};

use crate::config::StampConfig;
use crate::grpc::GrpcAuthority;

/// Client for the external timestamping authority.
pub struct TimestampClient {
    config: Arc<StampConfig>,
}

impl TimestampClient {
    pub fn new(config: Arc<StampConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    /// Resolve which authority endpoint to contact. An explicit non-empty
    /// hint is used verbatim; otherwise the first configured endpoint.
    fn select_endpoint<'a>(&'a self, server_hint: Option<&'a str>) -> Result<&'a str, StampError> {
        match server_hint {
            Some(hint) if !hint.is_empty() => Ok(hint),
            _ => self
                .config
                .servers
                .first()
                .map(String::as_str)
                .ok_or_else(|| StampError::Misconfigured("no authority servers configured".into())),
        }
    }

    /// Request a timestamp signature for `digest`.
    ///
    /// May block on network I/O for as long as the authority takes;
    /// callers wanting a bound should wrap this in their own timeout.
    pub async fn request_stamp(
        &self,
        digest: &Digest,
        server_hint: Option<&str>,
    ) -> Result<TimestampSignature, StampError> {
        let endpoint = self.select_endpoint(server_hint)?;
        debug!(endpoint, digest = %digest, "requesting stamp");

        let mut authority = GrpcAuthority::connect(endpoint).await?;
        authority.stamp(self.config.suite, digest).await
    }

    /// Fetch the authority's aggregate public key (e.g. to compare with
    /// the locally pinned one).
    pub async fn aggregate_key(
        &self,
        server_hint: Option<&str>,
    ) -> Result<GroupElement, StampError> {
        let endpoint = self.select_endpoint(server_hint)?;

        let mut authority = GrpcAuthority::connect(endpoint).await?;
        authority.aggregate_key(self.config.suite).await
    }
}
