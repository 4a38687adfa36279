//! Hashing configuration: user-facing units and validation.
//!
//! [`HashConfig`] is what callers and the config file express: window
//! offsets in IEC mebibytes and an optional algorithm choice that may be
//! a name or a bare boolean (a boolean, like an absent key, selects the
//! default primitive). [`HashConfig::resolve`] validates the request and
//! converts it once into the byte-denominated
//! [`HashWindow`](crate::window::HashWindow) plus a concrete
//! [`DigestAlgorithm`]; nothing below this layer sees mebibytes.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::digest::{DigestAlgorithm, UnsupportedAlgorithmError};
use crate::window::HashWindow;

/// One IEC mebibyte in bytes.
pub const MIB: u64 = 1024 * 1024;

/// Default window length, mebibytes.
pub const DEFAULT_SIZE_MIB: u64 = 25;

/// Default window start offset, mebibytes.
pub const DEFAULT_START_MIB: u64 = 50;

/// Default number of parallel I/O workers.
pub const DEFAULT_THREADS: usize = 4;

/// Algorithm selection as it appears in configuration: either a digest
/// name, or a bare boolean meaning "use the default primitive".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlgorithmChoice {
    /// Boolean form; either value selects the default algorithm.
    Enabled(bool),
    /// A digest primitive by name.
    Named(String),
}

/// Invalid hashing configuration, rejected before any file I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Window length must be positive.
    #[error("window size must be greater than zero")]
    ZeroSize,

    /// A window cannot end before it starts.
    #[error("window stop ({stop} MiB) is before start ({start} MiB)")]
    StopBeforeStart {
        /// Requested start offset, mebibytes.
        start: u64,
        /// Requested stop offset, mebibytes.
        stop: u64,
    },

    /// The requested algorithm is not in the registry.
    #[error(transparent)]
    Algorithm(#[from] UnsupportedAlgorithmError),
}

/// User-facing hashing configuration.
///
/// Window fields are denominated in IEC mebibytes and converted to bytes
/// exactly once, in [`HashConfig::resolve`]. Loaded from the platform
/// config file when present; CLI flags override individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Digest primitive choice; absent or boolean selects the default.
    pub algorithm: Option<AlgorithmChoice>,
    /// Window length in mebibytes, used when `stop` is absent.
    pub size: u64,
    /// Window start offset in mebibytes.
    pub start: u64,
    /// Optional absolute stop offset in mebibytes, overriding `size`.
    pub stop: Option<u64>,
    /// Parallel I/O workers for batch runs.
    pub threads: usize,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithm: None,
            size: DEFAULT_SIZE_MIB,
            start: DEFAULT_START_MIB,
            stop: None,
            threads: DEFAULT_THREADS,
        }
    }
}

impl HashConfig {
    /// Select a digest primitive by name.
    #[must_use]
    pub fn with_algorithm(mut self, name: impl Into<String>) -> Self {
        self.algorithm = Some(AlgorithmChoice::Named(name.into()));
        self
    }

    /// Set the window length in mebibytes.
    #[must_use]
    pub fn with_size(mut self, mib: u64) -> Self {
        self.size = mib;
        self
    }

    /// Set the window start offset in mebibytes.
    #[must_use]
    pub fn with_start(mut self, mib: u64) -> Self {
        self.start = mib;
        self
    }

    /// Set the absolute stop offset in mebibytes.
    #[must_use]
    pub fn with_stop(mut self, mib: u64) -> Self {
        self.stop = Some(mib);
        self
    }

    /// Set the number of parallel I/O workers.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// The digest primitive this configuration selects.
    ///
    /// # Errors
    ///
    /// Fails when a named algorithm is not in the registry.
    pub fn algorithm(&self) -> Result<DigestAlgorithm, UnsupportedAlgorithmError> {
        match &self.algorithm {
            Some(AlgorithmChoice::Named(name)) => name.parse(),
            Some(AlgorithmChoice::Enabled(_)) | None => Ok(DigestAlgorithm::default_algorithm()),
        }
    }

    /// Validate and convert into the byte-level window plus algorithm.
    ///
    /// Mebibyte fields are multiplied by 2^20 here and nowhere else.
    ///
    /// # Errors
    ///
    /// Rejects a zero window size, a stop offset before the start offset,
    /// and unknown algorithm names, all before any file is touched.
    pub fn resolve(&self) -> Result<(DigestAlgorithm, HashWindow), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if let Some(stop) = self.stop {
            if stop < self.start {
                return Err(ConfigError::StopBeforeStart {
                    start: self.start,
                    stop,
                });
            }
        }
        let algorithm = self.algorithm()?;

        let mut window = HashWindow::new(
            self.start.saturating_mul(MIB),
            self.size.saturating_mul(MIB),
        );
        if let Some(stop) = self.stop {
            window = window.with_stop(stop.saturating_mul(MIB));
        }
        Ok((algorithm, window))
    }

    /// Load the configuration from the default platform-specific path.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "fileprint")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}
