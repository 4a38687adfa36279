//! fileprint - Windowed File Fingerprinting
//!
//! A cross-platform Rust library and CLI for fingerprinting large files by
//! hashing a configurable window of their contents instead of the whole
//! file, with change-aware reuse of stored fingerprints: a file whose size,
//! mtime and window configuration are all unchanged is never re-read.
//!
//! # Example
//!
//! ```rust,no_run
//! use fileprint::{Fingerprinter, HashConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let (algorithm, window) = HashConfig::default().resolve()?;
//! let fingerprinter = Fingerprinter::new(algorithm, window);
//!
//! let outcome = fingerprinter.process_path("/data/big.iso".as_ref(), None)?;
//! println!("{}", outcome.fingerprint().digest);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod run;
pub mod signal;
pub mod source;
pub mod window;

pub use config::HashConfig;
pub use digest::DigestAlgorithm;
pub use error::ExitCode;
pub use fingerprint::{Fingerprint, FingerprintOutcome, Fingerprinter};
pub use manifest::Manifest;
pub use run::run_app;
pub use source::{FileSource, LocalFile};
pub use window::{HashWindow, ReadRange};
