//! File access seam for fingerprinting.
//!
//! [`FileSource`] is the narrow capability the fingerprint engine needs
//! from a file: its current size, its current modification time, and a
//! bounded positional read. [`LocalFile`] implements it over `std::fs`;
//! tests substitute in-memory sources.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Capabilities the fingerprint engine requires from a file.
///
/// `read_at` returns fewer bytes than requested when the range extends
/// past end-of-file; truncation alone is never an error.
pub trait FileSource {
    /// Current file size in bytes.
    fn size(&self) -> io::Result<u64>;

    /// Current modification time as whole seconds since the Unix epoch.
    fn modified_secs(&self) -> io::Result<i64>;

    /// Read up to `length` bytes starting at `offset`.
    fn read_at(&self, offset: u64, length: u64) -> io::Result<Vec<u8>>;
}

/// A file on the local filesystem, addressed by path.
///
/// Metadata is queried fresh on every call and the file is opened per
/// read, so a `LocalFile` holds no descriptor between operations and is
/// safe to hand to parallel workers.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    /// Wrap a filesystem path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The wrapped path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for LocalFile {
    fn size(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    fn modified_secs(&self) -> io::Result<i64> {
        let modified = std::fs::metadata(&self.path)?.modified()?;
        // Pre-epoch mtimes collapse to 0, matching the scanner tools this
        // record format interoperates with.
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0))
    }

    fn read_at(&self, offset: u64, length: u64) -> io::Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut buffer = Vec::new();
        file.take(length).read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}
