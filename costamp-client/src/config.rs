//! Process-wide stamping configuration
//!
//! Loaded once at startup and passed by reference into every component
//! that needs it: the suite for hashing, the pinned aggregate public key
//! for verification, the authority endpoints for stamping. A process must
//! not serve requests without a valid aggregate key, so every load failure
//! here is `StampError::Misconfigured`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use costamp_types::{GroupElement, StampError, Suite};

/// On-disk form of the configuration (TOML).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampConfigFile {
    /// Suite identifier, e.g. "ristretto255-blake3".
    pub suite: String,

    /// Base64 compressed encoding of the authority's aggregate public key.
    pub agg_public: String,

    /// Authority endpoints, e.g. "http://127.0.0.1:2011". At least one.
    pub servers: Vec<String>,
}

/// Validated, immutable process configuration.
#[derive(Debug, Clone)]
pub struct StampConfig {
    pub suite: Suite,
    pub agg_public: GroupElement,
    pub servers: Vec<String>,
}

impl StampConfig {
    /// Load and validate a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, StampError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StampError::Misconfigured(format!(
                "cannot read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let file: StampConfigFile = toml::from_str(&contents)
            .map_err(|e| StampError::Misconfigured(format!("invalid configuration: {}", e)))?;

        Self::from_parts(file)
    }

    /// Validate the raw file form into the immutable runtime form.
    pub fn from_parts(file: StampConfigFile) -> Result<Self, StampError> {
        let suite = Suite::from_id(&file.suite)
            .map_err(|e| StampError::Misconfigured(e.to_string()))?;

        let agg_public = GroupElement::from_base64(&file.agg_public).map_err(|_| {
            StampError::Misconfigured("aggregate public key is not a valid group element".into())
        })?;

        if file.servers.is_empty() {
            return Err(StampError::Misconfigured(
                "no authority servers configured".into(),
            ));
        }

        Ok(Self {
            suite,
            agg_public,
            servers: file.servers,
        })
    }

    /// Write the file form of this configuration (used to scaffold a
    /// default config on first run).
    pub fn to_file(&self, path: &Path) -> Result<(), StampError> {
        let file = StampConfigFile {
            suite: self.suite.id().to_string(),
            agg_public: self.agg_public.to_base64(),
            servers: self.servers.clone(),
        };
        let contents = toml::to_string_pretty(&file)
            .map_err(|e| StampError::Misconfigured(e.to_string()))?;
        std::fs::write(path, contents)
            .map_err(|e| StampError::Misconfigured(format!("cannot write config: {}", e)))?;
        Ok(())
    }
}
