//! Costamp CLI client

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use costamp_client::{StampConfig, TimestampClient};
use costamp_core::{SignatureVerifier, StreamHasher};
use costamp_types::{ProofCodec, SignatureEnvelope};

#[derive(Parser)]
#[command(name = "costamp")]
#[command(about = "Collective-signature timestamp client", long_about = None)]
struct Cli {
    /// Configuration file (suite, aggregate key, authority servers)
    #[arg(short, long, default_value = "costamp.toml")]
    config: PathBuf,

    /// Authority endpoint hint; empty picks one from the configuration
    #[arg(short, long)]
    server: Option<String>,

    /// Timeout in seconds applied around stamping calls
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timestamp a file and write the signature document next to it
    Stamp {
        /// File to timestamp
        file: PathBuf,

        /// Output path for the signature document (defaults to <file>.sig)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Verify a file against a signature document
    Verify {
        /// The file whose content is being checked
        file: PathBuf,

        /// The signature document produced by `stamp`
        signature: PathBuf,
    },

    /// Fetch the authority's aggregate public key
    AggregateKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = Arc::new(
        StampConfig::from_file(&cli.config)
            .with_context(|| format!("loading configuration from {}", cli.config.display()))?,
    );

    let hasher = StreamHasher::new(config.suite);
    let client = TimestampClient::new(config.clone());
    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Stamp { file, out } => {
            let mut reader = File::open(&file)
                .with_context(|| format!("opening {}", file.display()))?;
            let digest = hasher
                .hash(&mut reader)
                .with_context(|| format!("hashing {}", file.display()))?;

            // The client itself never times out; the bound is ours.
            let signature = tokio::time::timeout(
                timeout,
                client.request_stamp(&digest, cli.server.as_deref()),
            )
            .await
            .map_err(|_| anyhow!("stamping timed out after {:?}", timeout))??;

            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let codec = ProofCodec::new(config.suite);
            let envelope = SignatureEnvelope {
                data: codec.encode(&signature, &filename),
            };

            let out = out.unwrap_or_else(|| {
                let mut path = file.clone().into_os_string();
                path.push(".sig");
                PathBuf::from(path)
            });
            std::fs::write(&out, serde_json::to_string_pretty(&envelope)?)
                .with_context(|| format!("writing {}", out.display()))?;

            println!("Timestamp created successfully");
            println!("Digest:    {}", digest);
            println!("Timestamp: {}", signature.timestamp);
            println!("Signature: {}", out.display());
        }

        Commands::Verify { file, signature } => {
            let mut reader = File::open(&file)
                .with_context(|| format!("opening {}", file.display()))?;
            let digest = hasher
                .hash(&mut reader)
                .with_context(|| format!("hashing {}", file.display()))?;

            let json = std::fs::read_to_string(&signature)
                .with_context(|| format!("reading {}", signature.display()))?;
            let envelope: SignatureEnvelope =
                serde_json::from_str(&json).context("parsing signature document")?;

            let codec = ProofCodec::new(config.suite);
            let sig = codec
                .decode(&envelope.data)
                .context("decoding signature document")?;

            let verifier = SignatureVerifier::new(config.suite, config.agg_public);
            if verifier.verify(&digest, &sig) {
                println!("Signature is valid");
                println!("Digest:    {}", digest);
                println!("Timestamp: {}", sig.timestamp);
            } else {
                println!("Signature is INVALID");
                std::process::exit(1);
            }
        }

        Commands::AggregateKey => {
            let key = tokio::time::timeout(
                timeout,
                client.aggregate_key(cli.server.as_deref()),
            )
            .await
            .map_err(|_| anyhow!("request timed out after {:?}", timeout))??;

            println!("Authority aggregate key: {}", key.to_base64());
            if key == config.agg_public {
                println!("Matches the locally pinned key");
            } else {
                println!("WARNING: does not match the locally pinned key");
            }
        }
    }

    Ok(())
}
