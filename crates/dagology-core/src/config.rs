//! Analysis settings loaded from `dagology.toml`.
//!
//! ```toml
//! [embedding]
//! dimension = 3
//! signature = "lorentzian"
//! landmarks = true
//! landmark_count = 40
//! landmark_selection = "max-min"
//!
//! [separation]
//! method = "two-link"
//!
//! [myrheim_meyer]
//! chain_length = 3
//!
//! [de_sitter]
//! max_iterations = 1000
//!
//! [cache]
//! directory = "/tmp/dagology"
//! lock_timeout_secs = 5
//! ```
//!
//! Every field is optional; a missing file yields [`AnalysisConfig::default`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::FileCache;
use crate::dimension::DeSitterConfig;
use crate::error::{DagologyError, Result};
use crate::mds::{LandmarkSelection, Signature};
use crate::separation::SpacelikeMethod;

const PROJECT_CONFIG_FILE: &str = "dagology.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub separation: SeparationConfig,
    #[serde(default)]
    pub myrheim_meyer: MyrheimMeyerConfig,
    #[serde(default)]
    pub de_sitter: DeSitterConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    #[serde(default)]
    pub signature: Signature,
    /// Use landmark MDS instead of the exact decomposition.
    #[serde(default)]
    pub landmarks: bool,
    /// Landmark count; `None` picks `max(2D, D+1, 10)`.
    #[serde(default)]
    pub landmark_count: Option<usize>,
    #[serde(default)]
    pub landmark_selection: LandmarkSelection,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            signature: Signature::default(),
            landmarks: false,
            landmark_count: None,
            landmark_selection: LandmarkSelection::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparationConfig {
    #[serde(default)]
    pub method: SpacelikeMethod,
    /// Cap for spacelike distances; `None` uses the longest-path diameter.
    #[serde(default)]
    pub dmax: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyrheimMeyerConfig {
    #[serde(default = "default_chain_length")]
    pub chain_length: usize,
}

impl Default for MyrheimMeyerConfig {
    fn default() -> Self {
        Self {
            chain_length: default_chain_length(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Lookup-table directory; `None` uses the user cache directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// How long a writer waits for another process's table lock.
    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,
}

const fn default_lock_timeout_secs() -> u64 {
    5
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            directory: None,
            lock_timeout_secs: default_lock_timeout_secs(),
        }
    }
}

impl CacheConfig {
    /// Resolved lookup-table directory, if any is available.
    #[must_use]
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("dagology")))
    }

    /// File cache for the resolved directory, or `None` when disabled.
    #[must_use]
    pub fn file_cache(&self) -> Option<FileCache> {
        if !self.enabled {
            return None;
        }
        let timeout = Duration::from_secs(self.lock_timeout_secs);
        self.resolved_directory()
            .map(|dir| FileCache::new(dir).with_lock_timeout(timeout))
    }
}

impl AnalysisConfig {
    /// Parse a config file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DagologyError::Config`] when the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DagologyError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = toml::from_str::<Self>(&content)
            .map_err(|e| DagologyError::Config(format!("failed to parse {}: {e}", path.display())))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load the first config found: `explicit`, then `./dagology.toml`,
    /// then `<user config dir>/dagology/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`DagologyError::Config`] when `explicit` does not exist or a
    /// discovered file fails to parse.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(DagologyError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            return Self::load(path);
        }
        let candidates = [
            Some(PathBuf::from(PROJECT_CONFIG_FILE)),
            dirs::config_dir().map(|dir| dir.join("dagology/config.toml")),
        ];
        for path in candidates.into_iter().flatten() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_dimension() -> usize {
    2
}

const fn default_chain_length() -> usize {
    2
}
