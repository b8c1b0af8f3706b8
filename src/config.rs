//! Engine configuration
//!
//! Read from a TOML file with three optional tables:
//!
//! ```toml
//! [archetype]
//! burst_std_dev = 18.0
//!
//! [simulation]
//! daily_drift = 1.5
//!
//! [coach]
//! enabled = true
//! endpoint = "http://localhost:11434"
//! model = "llama3.2"
//! timeout_secs = 8
//! ```
//!
//! Every key has a default; a missing or broken file yields the defaults.

use crate::archetype::ArchetypeThresholds;
use crate::error::ComputeError;
use crate::simulation::SimulationParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "COGLOAD_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "cogload.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub archetype: ArchetypeThresholds,
    pub simulation: SimulationParams,
    pub coach: CoachConfig,
}

/// Settings for the generated coaching override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Off unless explicitly enabled
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout_secs: 8,
        }
    }
}

impl CoachConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl EngineConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ComputeError> {
        toml::from_str(content).map_err(|e| ComputeError::ConfigError(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or cannot be read or parsed
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Self::default();
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// Load from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// `$COGLOAD_CONFIG`, or `cogload.toml` in the working directory
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
