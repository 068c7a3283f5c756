//! Reverser configuration.
//!
//! Settings are read from a JSON file named by the `LANEREV_CONFIG`
//! environment variable. Every field has a default, so an empty object (or
//! no file at all) is a valid configuration.

use crate::reverser::RemainderPolicy;
use crate::species::Species;
use anyhow::Context;
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the path of the JSON config file.
pub const CONFIG_ENV_VAR: &str = "LANEREV_CONFIG";

/// Process-wide configuration, loaded from `LANEREV_CONFIG` on first use.
pub static CONFIG: Lazy<ReverserConfig> = Lazy::new(ReverserConfig::from_env);

/// Configuration for a [`VectorReverser`](crate::VectorReverser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReverserConfig {
    /// Handling of the elements that do not fill a whole block.
    pub remainder: RemainderPolicy,
    /// Backend to force. `None` picks the widest one the CPU supports.
    pub species: Option<Species>,
}

impl ReverserConfig {
    /// Parses a config from JSON text.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Failed to parse reverser config JSON")
    }

    /// Loads a config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Loads the file named by `LANEREV_CONFIG`, or defaults when the
    /// variable is unset or the file is unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            debug!("{} not set, using default config", CONFIG_ENV_VAR);
            return Self::default();
        };
        Self::load(&path).unwrap_or_else(|e| {
            warn!("{:#}. Falling back to default config.", e);
            Self::default()
        })
    }
}
