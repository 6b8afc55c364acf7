//! Gateway configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use costamp_client::config::StampConfigFile;
use costamp_client::StampConfig;
use costamp_types::StampError;

/// On-disk form of the gateway configuration (TOML).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfigFile {
    pub server: ServerSection,

    /// Shared stamping configuration: suite, aggregate key, authorities.
    pub stamp: StampConfigFile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Directory with the landing page, upload forms, and assets
    pub static_dir: PathBuf,

    /// Upload size cap in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Caller-side timeout around each stamping call, in seconds
    #[serde(default = "default_stamp_timeout_secs")]
    pub stamp_timeout_secs: u64,
}

fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_stamp_timeout_secs() -> u64 {
    30
}

impl Default for GatewayConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSection {
                host: "127.0.0.1".to_string(),
                port: 8080,
                static_dir: PathBuf::from("static"),
                max_upload_bytes: default_max_upload_bytes(),
                stamp_timeout_secs: default_stamp_timeout_secs(),
            },
            stamp: StampConfigFile {
                suite: "ristretto255-blake3".to_string(),
                agg_public: String::new(),
                servers: vec!["http://127.0.0.1:2011".to_string()],
            },
        }
    }
}

impl GatewayConfigFile {
    pub fn to_file(&self, path: &Path) -> Result<(), StampError> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| StampError::Misconfigured(e.to_string()))?;
        std::fs::write(path, contents)
            .map_err(|e| StampError::Misconfigured(format!("cannot write config: {}", e)))?;
        Ok(())
    }
}

/// Validated, immutable gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub stamp_timeout: Duration,
    pub stamp: StampConfig,
}

impl GatewayConfig {
    /// Load and validate a TOML configuration file. A missing or invalid
    /// aggregate key makes this fail; the gateway must not serve without
    /// one.
    pub fn from_file(path: &Path) -> Result<Self, StampError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StampError::Misconfigured(format!(
                "cannot read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let file: GatewayConfigFile = toml::from_str(&contents)
            .map_err(|e| StampError::Misconfigured(format!("invalid configuration: {}", e)))?;

        Ok(Self {
            host: file.server.host,
            port: file.server.port,
            static_dir: file.server.static_dir,
            max_upload_bytes: file.server.max_upload_bytes,
            stamp_timeout: Duration::from_secs(file.server.stamp_timeout_secs),
            stamp: StampConfig::from_parts(file.stamp)?,
        })
    }
}
