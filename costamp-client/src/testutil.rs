//! Test utilities for running an in-process software authority.
//!
//! Enabled via the `test-util` feature flag. The software authority keeps
//! a single keypair as the degenerate aggregate, pads each request with
//! random filler leaves so proofs have real depth, and collectively signs
//! each round root.

use std::net::SocketAddr;
use std::sync::Arc;

use rand::RngCore;
use tokio::sync::oneshot;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

use costamp_core::{RoundTreeBuilder, SigningMember};
use costamp_types::{build_sign_message, Digest, GroupElement, Suite, TimestampSignature};

use crate::config::StampConfig;
use crate::grpc::proto::authority_server::{Authority, AuthorityServer};
use crate::grpc::proto::{
    AggregateKeyRequest, AggregateKeyResponse, StampRequest, StampResponse,
};
use crate::grpc::{signature_to_proto, PROTOCOL_VERSION};

/// An in-process authority bound to a random localhost port.
pub struct TestAuthority {
    addr: SocketAddr,
    agg_public: GroupElement,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestAuthority {
    /// Start a test authority padding every round with three filler leaves.
    pub async fn start() -> Self {
        Self::start_with_filler(3).await
    }

    /// Start a test authority with a chosen number of filler leaves per
    /// round (zero yields empty proofs: the digest is the root).
    pub async fn start_with_filler(filler_leaves: usize) -> Self {
        let member = SigningMember::generate(&mut rand::thread_rng());
        let agg_public = *member.public();

        let service = AuthorityService {
            suite: Suite::Ristretto255Blake3,
            member: Arc::new(member),
            filler_leaves,
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("Failed to get local address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let incoming = tokio_stream::wrappers::TcpListenerStream::new(listener);

        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthorityServer::new(service))
                .serve_with_incoming_shutdown(incoming, async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Test authority failed");
        });

        // Give the server a moment to start accepting connections
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        Self {
            addr,
            agg_public,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Endpoint URL suitable for client connection.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The authority's aggregate public key.
    pub fn agg_public(&self) -> &GroupElement {
        &self.agg_public
    }

    /// A ready-made client configuration pinning this authority's key.
    pub fn config(&self) -> StampConfig {
        StampConfig {
            suite: Suite::Ristretto255Blake3,
            agg_public: self.agg_public,
            servers: vec![self.url()],
        }
    }

    /// Shut down the test authority.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestAuthority {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct AuthorityService {
    suite: Suite,
    member: Arc<SigningMember>,
    filler_leaves: usize,
}

impl AuthorityService {
    /// Run one aggregation round for a single submitted digest.
    fn stamp_round(&self, digest: Digest) -> TimestampSignature {
        let mut rng = rand::thread_rng();

        let mut builder = RoundTreeBuilder::new(self.suite);
        builder.add_leaf(digest);
        for _ in 0..self.filler_leaves {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            builder.add_leaf(Digest::new(bytes));
        }
        let tree = builder.build();

        // Leaf 0 is the submitted digest.
        let proof = tree.path(0).expect("leaf 0 exists");

        let timestamp = chrono::Utc::now().timestamp();
        let message = build_sign_message(tree.root(), timestamp);
        let parts = self.member.sign(self.suite, &message, &mut rng);

        TimestampSignature {
            suite_id: self.suite.id().to_string(),
            timestamp,
            merkle_root: *tree.root(),
            proof,
            challenge: parts.challenge,
            response: parts.response,
            agg_commit: parts.agg_commit,
            agg_public: *self.member.public(),
        }
    }
}

#[tonic::async_trait]
impl Authority for AuthorityService {
    async fn stamp(
        &self,
        request: Request<StampRequest>,
    ) -> Result<Response<StampResponse>, Status> {
        let req = request.into_inner();

        if req.version != PROTOCOL_VERSION {
            return Err(Status::invalid_argument(format!(
                "Unsupported protocol version: {}, expected {}",
                req.version, PROTOCOL_VERSION
            )));
        }

        let digest = Digest::from_slice(&req.digest)
            .map_err(|e| Status::invalid_argument(format!("Invalid digest: {}", e)))?;

        let signature = self.stamp_round(digest);

        Ok(Response::new(StampResponse {
            version: PROTOCOL_VERSION,
            signature: Some(signature_to_proto(&signature)),
        }))
    }

    async fn aggregate_key(
        &self,
        _request: Request<AggregateKeyRequest>,
    ) -> Result<Response<AggregateKeyResponse>, Status> {
        Ok(Response::new(AggregateKeyResponse {
            suite: self.suite.id().to_string(),
            agg_public: self.member.public().to_bytes().to_vec(),
        }))
    }
}
