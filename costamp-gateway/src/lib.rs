//! Costamp HTTP gateway
//!
//! Bridges browser uploads to the timestamping authority: one endpoint
//! accepts a single file and returns a portable signature envelope, one
//! accepts a file plus its signature document and returns a boolean
//! verdict. All crypto work happens in `costamp-core`; this crate is
//! plumbing.

pub mod config;
pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use costamp_client::{StampConfig, TimestampClient};
use costamp_core::{SignatureVerifier, StreamHasher};
use costamp_types::ProofCodec;

pub use config::{GatewayConfig, GatewayConfigFile};

/// Immutable per-process state shared by all request handlers.
pub struct AppState {
    pub stamp: Arc<StampConfig>,
    pub hasher: StreamHasher,
    pub codec: ProofCodec,
    pub verifier: SignatureVerifier,
    pub client: TimestampClient,
    pub static_dir: PathBuf,
    pub stamp_timeout: Duration,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> Self {
        let stamp = Arc::new(config.stamp.clone());
        Self {
            hasher: StreamHasher::new(stamp.suite),
            codec: ProofCodec::new(stamp.suite),
            verifier: SignatureVerifier::new(stamp.suite, stamp.agg_public),
            client: TimestampClient::new(stamp.clone()),
            static_dir: config.static_dir.clone(),
            stamp_timeout: config.stamp_timeout,
            stamp,
        }
    }
}

/// Build the gateway router.
pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let static_dir = state.static_dir.clone();

    Router::new()
        .route("/start", get(handlers::landing))
        .route("/sign", get(handlers::sign_form).post(handlers::sign))
        .route("/verify", get(handlers::verify_form).post(handlers::verify))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
