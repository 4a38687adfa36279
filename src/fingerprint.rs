//! Fingerprint records and the reuse-or-recompute engine.
//!
//! # Overview
//!
//! A [`Fingerprint`] is the per-file record this crate exists to produce:
//! the digest of a configured byte window plus the metadata needed to
//! prove it still applies (algorithm, file size, mtime, requested window).
//! [`Fingerprinter`] owns the decision logic: given a file and the
//! previously stored fingerprint, it either returns the stored value
//! untouched (zero data reads) or recomputes from a fresh window read.
//!
//! The engine never aggregates records across files. Each fingerprint is
//! owned by the caller alongside its file record; batch storage lives in
//! [`crate::manifest`].
//!
//! # Example
//!
//! ```no_run
//! use fileprint::digest::DigestAlgorithm;
//! use fileprint::fingerprint::Fingerprinter;
//! use fileprint::source::LocalFile;
//! use fileprint::window::HashWindow;
//!
//! let engine = Fingerprinter::new(DigestAlgorithm::Blake2b512, HashWindow::new(50, 25));
//! let outcome = engine.process(&LocalFile::new("big.iso"), None)?;
//! println!("{}", outcome.fingerprint().digest);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::digest::DigestAlgorithm;
use crate::source::{FileSource, LocalFile};
use crate::window::HashWindow;

/// The cached identity summary of one file under one hashing configuration.
///
/// `window_start`, `window_stop` and `window_size` record the *requested*
/// window, not the byte range the read resolved to. Validity checks
/// compare stored intent against current intent; the concrete range is
/// recomputed on every hash so it tracks file growth and shrinkage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Digest primitive that produced `digest`.
    pub algorithm: DigestAlgorithm,
    /// Lowercase hex digest of the window bytes.
    pub digest: String,
    /// File mtime when hashed, whole seconds since the Unix epoch.
    pub modified: i64,
    /// File size in bytes when hashed.
    pub size: u64,
    /// Requested window start offset in bytes.
    pub window_start: u64,
    /// Requested absolute stop offset in bytes, if one was set.
    pub window_stop: Option<u64>,
    /// Requested window length in bytes.
    pub window_size: u64,
}

/// Result of a [`Fingerprinter::process`] call: whether the stored
/// fingerprint was reused or a fresh one computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FingerprintOutcome {
    /// The existing fingerprint was still valid and is returned unchanged.
    Reused(Fingerprint),
    /// A new fingerprint was computed from a window read.
    Computed(Fingerprint),
}

impl FingerprintOutcome {
    /// The fingerprint, whichever way it was obtained.
    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            Self::Reused(fp) | Self::Computed(fp) => fp,
        }
    }

    /// Consume the outcome, yielding the fingerprint.
    #[must_use]
    pub fn into_fingerprint(self) -> Fingerprint {
        match self {
            Self::Reused(fp) | Self::Computed(fp) => fp,
        }
    }

    /// True when the stored fingerprint was reused without hashing.
    #[must_use]
    pub fn was_reused(&self) -> bool {
        matches!(self, Self::Reused(_))
    }
}

/// Per-file failures while fingerprinting.
///
/// One file's error never affects another file's processing or its stored
/// fingerprint.
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    /// File does not exist (or disappeared between listing and hashing).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Read access to the file was denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O failure while reading metadata or the window.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl FingerprintError {
    /// Classify an I/O failure for `path` into the matching variant.
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Decides fingerprint reuse versus recompute and performs the hashing.
///
/// Holds only the requested configuration; all file state is read through
/// [`FileSource`], so one engine serves any number of files, including
/// from parallel workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprinter {
    algorithm: DigestAlgorithm,
    window: HashWindow,
}

impl Fingerprinter {
    /// Create an engine for one algorithm and window configuration.
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm, window: HashWindow) -> Self {
        Self { algorithm, window }
    }

    /// The digest primitive in use.
    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The requested window.
    #[must_use]
    pub fn window(&self) -> HashWindow {
        self.window
    }

    /// Whether `existing` still describes `source` under the current
    /// configuration.
    ///
    /// True only when every stored field matches: same algorithm, same
    /// requested window, and unchanged file size and mtime. Any single
    /// mismatch reports stale; a fingerprint computed under different
    /// parameters is never treated as current.
    ///
    /// # Errors
    ///
    /// Fails when the size or mtime query fails.
    pub fn is_current<S: FileSource>(
        &self,
        existing: &Fingerprint,
        source: &S,
    ) -> io::Result<bool> {
        let size = source.size()?;
        let modified = source.modified_secs()?;
        Ok(self.matches(existing, size, modified))
    }

    fn matches(&self, existing: &Fingerprint, size: u64, modified: i64) -> bool {
        existing.algorithm == self.algorithm
            && existing.size == size
            && existing.modified == modified
            && existing.window_start == self.window.start
            && existing.window_stop == self.window.stop
            && existing.window_size == self.window.size
    }

    /// Return a still-valid stored fingerprint, or compute a fresh one.
    ///
    /// Reuse performs metadata queries only, zero `read_at` calls. A
    /// recompute resolves the window against the current size, reads that
    /// range once, and hashes it with a single digest instance. The new
    /// fingerprint is constructed only after the read and digest succeed,
    /// so a failed recompute leaves the caller's stored value untouched.
    ///
    /// # Errors
    ///
    /// Propagates metadata and read failures for this file; other files
    /// are unaffected.
    pub fn process<S: FileSource>(
        &self,
        source: &S,
        existing: Option<&Fingerprint>,
    ) -> io::Result<FingerprintOutcome> {
        let size = source.size()?;
        let modified = source.modified_secs()?;

        if let Some(existing) = existing {
            if self.matches(existing, size, modified) {
                log::debug!("fingerprint current, skipping hash");
                return Ok(FingerprintOutcome::Reused(existing.clone()));
            }
        }

        let range = self.window.resolve(size);
        let bytes = source.read_at(range.offset, range.length)?;
        log::trace!(
            "hashing {} bytes at offset {} with {}",
            bytes.len(),
            range.offset,
            self.algorithm
        );

        let mut hasher = self.algorithm.hasher();
        hasher.update(&bytes);
        let digest = hasher.finalize_hex();

        Ok(FingerprintOutcome::Computed(Fingerprint {
            algorithm: self.algorithm,
            digest,
            modified,
            size,
            window_start: self.window.start,
            window_stop: self.window.stop,
            window_size: self.window.size,
        }))
    }

    /// [`process`](Self::process) for a filesystem path, with I/O errors
    /// classified and tagged with the path.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::NotFound`] or
    /// [`FingerprintError::PermissionDenied`] for those conditions, and
    /// [`FingerprintError::Io`] for everything else.
    pub fn process_path(
        &self,
        path: &Path,
        existing: Option<&Fingerprint>,
    ) -> Result<FingerprintOutcome, FingerprintError> {
        self.process(&LocalFile::new(path), existing)
            .map_err(|e| FingerprintError::from_io(path, e))
    }
}
