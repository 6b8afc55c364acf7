//! gRPC transport to the timestamping authority
//!
//! Only the call contract is part of this system; the authority's internal
//! aggregation protocol is not. Transport failures map to
//! `StampError::Unavailable` (retryable by the caller), structurally
//! invalid responses to `StampError::Protocol` (not retryable).

use tonic::transport::Channel;
use tonic::{Code, Status};

use costamp_types::{Digest, GroupElement, StampError, Suite, TimestampSignature};

// Include the generated protobuf code
pub mod proto {
    tonic::include_proto!("costamp");
}

use proto::authority_client::AuthorityClient;
use proto::{AggregateKeyRequest, StampRequest};

/// Protocol version this client speaks.
pub const PROTOCOL_VERSION: u32 = 1;

/// gRPC client for one authority endpoint.
pub struct GrpcAuthority {
    client: AuthorityClient<Channel>,
}

impl GrpcAuthority {
    /// Connect to an authority endpoint.
    pub async fn connect(endpoint: &str) -> Result<Self, StampError> {
        let client = AuthorityClient::connect(endpoint.to_string())
            .await
            .map_err(|e| StampError::Unavailable(format!("failed to connect: {}", e)))?;

        Ok(Self { client })
    }

    /// Submit a digest for timestamping and decode the authority's
    /// response into the in-memory artifact, validated against `suite`.
    pub async fn stamp(
        &mut self,
        suite: Suite,
        digest: &Digest,
    ) -> Result<TimestampSignature, StampError> {
        let request = StampRequest {
            version: PROTOCOL_VERSION,
            digest: digest.as_bytes().to_vec(),
        };

        let response = self
            .client
            .stamp(request)
            .await
            .map_err(status_to_error)?
            .into_inner();

        if response.version != PROTOCOL_VERSION {
            return Err(StampError::Protocol(format!(
                "unsupported response version {}",
                response.version
            )));
        }

        let signature = response
            .signature
            .ok_or_else(|| StampError::Protocol("missing signature in response".into()))?;

        proto_to_signature(suite, signature)
    }

    /// Fetch the authority's aggregate public key.
    pub async fn aggregate_key(&mut self, suite: Suite) -> Result<GroupElement, StampError> {
        let response = self
            .client
            .aggregate_key(AggregateKeyRequest {})
            .await
            .map_err(status_to_error)?
            .into_inner();

        if response.suite != suite.id() {
            return Err(StampError::Protocol(format!(
                "authority speaks suite {:?}, expected {:?}",
                response.suite,
                suite.id()
            )));
        }

        suite
            .decode_element(&response.agg_public)
            .map_err(|_| StampError::Protocol("invalid aggregate public key".into()))
    }
}

/// Map an RPC status onto the stamp error taxonomy. Transient transport
/// conditions are retryable; everything else is a protocol violation.
fn status_to_error(status: Status) -> StampError {
    match status.code() {
        Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
            StampError::Unavailable(status.message().to_string())
        }
        _ => StampError::Protocol(format!("{}: {}", status.code(), status.message())),
    }
}

/// Decode the authority's wire signature, rejecting anything that is not
/// canonical for the configured suite.
fn proto_to_signature(
    suite: Suite,
    sig: proto::TimestampSignature,
) -> Result<TimestampSignature, StampError> {
    if sig.suite != suite.id() {
        return Err(StampError::Protocol(format!(
            "authority signed under suite {:?}, expected {:?}",
            sig.suite,
            suite.id()
        )));
    }

    let merkle_root = Digest::from_slice(&sig.merkle_root)
        .map_err(|_| StampError::Protocol("invalid merkle root length".into()))?;

    let proof = sig
        .proof
        .iter()
        .map(|step| Digest::from_slice(step))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| StampError::Protocol("invalid proof step length".into()))?;

    let challenge = suite
        .decode_scalar(&sig.challenge)
        .map_err(|_| StampError::Protocol("invalid challenge scalar".into()))?;

    let response = suite
        .decode_scalar(&sig.response)
        .map_err(|_| StampError::Protocol("invalid response scalar".into()))?;

    let agg_commit = suite
        .decode_element(&sig.agg_commit)
        .map_err(|_| StampError::Protocol("invalid aggregate commitment".into()))?;

    let agg_public = suite
        .decode_element(&sig.agg_public)
        .map_err(|_| StampError::Protocol("invalid aggregate public key".into()))?;

    Ok(TimestampSignature {
        suite_id: sig.suite,
        timestamp: sig.timestamp,
        merkle_root,
        proof,
        challenge,
        response,
        agg_commit,
        agg_public,
    })
}

/// Encode an in-memory signature for the authority wire (used by the
/// in-process test authority).
#[cfg(feature = "test-util")]
pub(crate) fn signature_to_proto(sig: &TimestampSignature) -> proto::TimestampSignature {
    proto::TimestampSignature {
        suite: sig.suite_id.clone(),
        timestamp: sig.timestamp,
        merkle_root: sig.merkle_root.as_bytes().to_vec(),
        proof: sig.proof.iter().map(|d| d.as_bytes().to_vec()).collect(),
        challenge: sig.challenge.to_bytes().to_vec(),
        response: sig.response.to_bytes().to_vec(),
        agg_commit: sig.agg_commit.to_bytes().to_vec(),
        agg_public: sig.agg_public.to_bytes().to_vec(),
    }
}
