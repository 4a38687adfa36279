//! Digest primitive registry.
//!
//! Hashing is delegated to named digest primitives behind a uniform
//! update/finalize interface. [`DigestAlgorithm`] is the by-name registry;
//! [`WindowHasher`] is the streaming hasher it hands out, one instance per
//! fingerprint computation. The default algorithm is a preference probe
//! over the registry: the 512-bit BLAKE2 variant when available, otherwise
//! the legacy MD5 fallback.

use std::fmt;
use std::str::FromStr;

use blake2::{Blake2b512, Blake2s256};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

/// Requested digest name is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported digest algorithm '{name}', expected one of: md5, sha1, sha256, sha512, blake2b512, blake2s256, blake3")]
pub struct UnsupportedAlgorithmError {
    /// The name that failed to resolve.
    pub name: String,
}

/// The digest primitives this crate can instantiate, keyed by name.
///
/// Names are lowercase; `blake2b` and `blake2s` are accepted as aliases
/// for their sized variants, matching the common convention that the
/// unsized BLAKE2 name means the full-width digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Blake2b512,
    Blake2s256,
    Blake3,
}

impl DigestAlgorithm {
    /// Every registered algorithm, in display order.
    pub const ALL: [Self; 7] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha512,
        Self::Blake2b512,
        Self::Blake2s256,
        Self::Blake3,
    ];

    /// Preference order probed by [`DigestAlgorithm::default_algorithm`].
    const PREFERRED: [&'static str; 2] = ["blake2b512", "md5"];

    /// Canonical lowercase name, as stored in fingerprints.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake2b512 => "blake2b512",
            Self::Blake2s256 => "blake2s256",
            Self::Blake3 => "blake3",
        }
    }

    /// Length of the hex digest this algorithm produces.
    #[must_use]
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 | Self::Blake2s256 | Self::Blake3 => 64,
            Self::Sha512 | Self::Blake2b512 => 128,
        }
    }

    /// The default primitive: the first name in the preference list that
    /// the registry resolves. Falls back to MD5 if the probe comes up
    /// empty.
    #[must_use]
    pub fn default_algorithm() -> Self {
        Self::PREFERRED
            .iter()
            .find_map(|name| name.parse().ok())
            .unwrap_or(Self::Md5)
    }

    /// Create a fresh hasher for a single computation.
    #[must_use]
    pub fn hasher(&self) -> WindowHasher {
        match self {
            Self::Md5 => WindowHasher::Md5(Md5::new()),
            Self::Sha1 => WindowHasher::Sha1(Sha1::new()),
            Self::Sha256 => WindowHasher::Sha256(Sha256::new()),
            Self::Sha512 => WindowHasher::Sha512(Sha512::new()),
            Self::Blake2b512 => WindowHasher::Blake2b512(Box::new(Blake2b512::new())),
            Self::Blake2s256 => WindowHasher::Blake2s256(Blake2s256::new()),
            Self::Blake3 => WindowHasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    /// Hash a byte slice in one step and return the lowercase hex digest.
    #[must_use]
    pub fn hex_digest(&self, bytes: &[u8]) -> String {
        let mut hasher = self.hasher();
        hasher.update(bytes);
        hasher.finalize_hex()
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = UnsupportedAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "blake2b" | "blake2b512" => Ok(Self::Blake2b512),
            "blake2s" | "blake2s256" => Ok(Self::Blake2s256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(UnsupportedAlgorithmError {
                name: s.to_string(),
            }),
        }
    }
}

/// A streaming hasher for one window computation.
///
/// Feed the window bytes with [`WindowHasher::update`], then consume the
/// hasher with [`WindowHasher::finalize_hex`]. There is no reset; a new
/// computation gets a new hasher from [`DigestAlgorithm::hasher`].
pub enum WindowHasher {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    Blake2b512(Box<Blake2b512>),
    Blake2s256(Blake2s256),
    Blake3(Box<blake3::Hasher>),
}

impl WindowHasher {
    /// The algorithm this hasher was created for.
    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        match self {
            Self::Md5(_) => DigestAlgorithm::Md5,
            Self::Sha1(_) => DigestAlgorithm::Sha1,
            Self::Sha256(_) => DigestAlgorithm::Sha256,
            Self::Sha512(_) => DigestAlgorithm::Sha512,
            Self::Blake2b512(_) => DigestAlgorithm::Blake2b512,
            Self::Blake2s256(_) => DigestAlgorithm::Blake2s256,
            Self::Blake3(_) => DigestAlgorithm::Blake3,
        }
    }

    /// Absorb more input bytes.
    pub fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Md5(h) => h.update(bytes),
            Self::Sha1(h) => h.update(bytes),
            Self::Sha256(h) => h.update(bytes),
            Self::Sha512(h) => h.update(bytes),
            Self::Blake2b512(h) => h.update(bytes),
            Self::Blake2s256(h) => h.update(bytes),
            Self::Blake3(h) => {
                h.update(bytes);
            }
        }
    }

    /// Finish the computation and return the lowercase hex digest.
    #[must_use]
    pub fn finalize_hex(self) -> String {
        match self {
            Self::Md5(h) => hex::encode(h.finalize()),
            Self::Sha1(h) => hex::encode(h.finalize()),
            Self::Sha256(h) => hex::encode(h.finalize()),
            Self::Sha512(h) => hex::encode(h.finalize()),
            Self::Blake2b512(h) => hex::encode(h.finalize()),
            Self::Blake2s256(h) => hex::encode(h.finalize()),
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

impl fmt::Debug for WindowHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WindowHasher").field(&self.algorithm()).finish()
    }
}
