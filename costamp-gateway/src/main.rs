//! Costamp gateway entry point

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use costamp_gateway::{build_router, AppState, GatewayConfig, GatewayConfigFile};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("gateway.toml")
    };

    if !config_path.exists() {
        eprintln!("Configuration file not found: {}", config_path.display());
        eprintln!("Creating default configuration...");
        GatewayConfigFile::default().to_file(&config_path)?;
        eprintln!("Default configuration saved to {}", config_path.display());
        eprintln!("Please set the authority's aggregate public key before starting.");
        std::process::exit(1);
    }

    // A gateway without a valid aggregate key must not serve; the load
    // fails hard here.
    let config = GatewayConfig::from_file(&config_path)?;

    let state = Arc::new(AppState::new(&config));
    let router = build_router(state, config.max_upload_bytes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Gateway listening on {}", addr);
    info!("Pinned aggregate key: {}", config.stamp.agg_public);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down gateway");
        })
        .await?;

    Ok(())
}
