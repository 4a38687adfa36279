//! Persisted fingerprint manifests.
//!
//! The fingerprint engine returns per-file values and keeps no state; the
//! manifest is the caller-side store that carries those values between
//! runs. It is a versioned JSON document mapping canonical file paths to
//! [`Fingerprint`]s; keys come from [`Manifest::canonical_key`] so one
//! file cannot appear under two spellings. Loading is tolerant: a
//! missing, unreadable or old-version manifest starts fresh and
//! everything simply gets recomputed, while saving failures are real
//! errors.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// Format version; bump when the fingerprint record shape changes.
pub const MANIFEST_VERSION: u32 = 1;

/// A persisted map from file path to fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Format version of this document.
    pub version: u32,
    /// When the manifest was last written.
    pub generated: DateTime<Utc>,
    /// Fingerprints keyed by canonical path, ordered for stable output.
    entries: BTreeMap<PathBuf, Fingerprint>,
}

impl Manifest {
    /// Create an empty manifest at the current version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: MANIFEST_VERSION,
            generated: Utc::now(),
            entries: BTreeMap::new(),
        }
    }

    /// Load a manifest, starting fresh when that is not possible.
    ///
    /// A missing file is the normal first run. Unparseable content or a
    /// version mismatch logs a warning and also starts fresh: the cost is
    /// one full recompute, never an aborted run.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No manifest at {}, starting fresh", path.display());
            return Self::new();
        }
        match Self::load(path) {
            Ok(manifest) => {
                log::debug!(
                    "Loaded {} fingerprint(s) from {}",
                    manifest.len(),
                    path.display()
                );
                manifest
            }
            Err(e) => {
                log::warn!("Ignoring unusable manifest {}: {:#}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Load and validate a manifest file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid JSON, or carries
    /// an unsupported format version.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;
        if manifest.version != MANIFEST_VERSION {
            anyhow::bail!(
                "Unsupported manifest version: {} (current is {})",
                manifest.version,
                MANIFEST_VERSION
            );
        }
        Ok(manifest)
    }

    /// Write the manifest as pretty-printed JSON, refreshing `generated`.
    ///
    /// # Errors
    ///
    /// Fails when the parent directory cannot be created or the file
    /// cannot be written.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.generated = Utc::now();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create manifest directory: {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
        Ok(())
    }

    /// Canonical form of a user-supplied path, as used for entry keys.
    ///
    /// Symlinks and relative components are resolved so the same file
    /// cannot take two entries under different spellings. A path whose
    /// final component no longer exists resolves through its parent
    /// directory, keeping deleted files addressable for verification.
    ///
    /// # Errors
    ///
    /// Fails when neither the path nor its parent directory can be
    /// resolved.
    pub fn canonical_key(path: &Path) -> io::Result<PathBuf> {
        match fs::canonicalize(path) {
            Ok(canonical) => Ok(canonical),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let name = match path.file_name() {
                    Some(name) => name,
                    None => return Err(e),
                };
                let parent = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent,
                    _ => Path::new("."),
                };
                Ok(fs::canonicalize(parent)?.join(name))
            }
            Err(e) => Err(e),
        }
    }

    /// Stored fingerprint for a path, if any.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&Fingerprint> {
        self.entries.get(path)
    }

    /// Insert or replace the fingerprint for a path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, fingerprint: Fingerprint) {
        self.entries.insert(path.into(), fingerprint);
    }

    /// Iterate entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = (&Path, &Fingerprint)> {
        self.entries.iter().map(|(path, fp)| (path.as_path(), fp))
    }

    /// Number of stored fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no fingerprints are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}
