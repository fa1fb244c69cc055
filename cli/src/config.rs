//! Configuration for the `dmensions` binary.
//!
//! Read from an optional TOML file. Every section and key may be omitted.
//!
//! ```toml
//! [embedding]
//! base_url = "http://localhost:11434"
//! model = "nomic-embed-text"
//!
//! [store]
//! data_dir = "/home/me/.dmensions"
//! seed_vocabulary = true
//!
//! [projection]
//! iterations = 500
//! learning_rate = 20.0
//! seed = 42
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use dmensions_embeddings::OllamaConfig;
use dmensions_projection::TsneConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmensionsConfig {
    /// Embedding provider settings.
    pub embedding: OllamaConfig,

    /// Concept store settings.
    pub store: StoreConfig,

    /// Projection hyperparameters.
    pub projection: TsneConfig,
}

/// Configuration for the concept store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the store document. Defaults to `~/.dmensions`.
    pub data_dir: Option<PathBuf>,

    /// Seed a freshly created store with the starter vocabulary.
    pub seed_vocabulary: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_vocabulary: true,
        }
    }
}

impl StoreConfig {
    /// The configured data directory, or `~/.dmensions`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_default()
                .join(".dmensions")
        })
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join("dmensions")
        .join("config.toml")
}

impl DmensionsConfig {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        if !explicit && !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
