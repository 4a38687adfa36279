//! Command-line interface definitions for fileprint.
//!
//! This module defines all CLI arguments, subcommands, and options using the
//! clap derive API. The CLI follows standard conventions with global options
//! (verbosity) and subcommands for different operations.
//!
//! # Example
//!
//! ```bash
//! # Fingerprint files with the default window
//! fileprint hash /data/a.iso /data/b.iso
//!
//! # Keep fingerprints in a manifest so unchanged files are not re-read
//! fileprint hash --manifest prints.json /data/*.iso
//!
//! # Verify a manifest without recomputing digests
//! fileprint check prints.json
//!
//! # JSON output for scripting
//! fileprint hash --format json /data/big.iso
//!
//! # Verbose mode for debugging
//! fileprint -v hash /data/big.iso
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::ReportFormat;

/// Windowed file fingerprinting with change-aware caching.
///
/// fileprint hashes a configurable window of each file instead of its full
/// contents, and reuses stored fingerprints when a file's size, mtime and
/// window configuration are all unchanged.
#[derive(Debug, Parser)]
#[command(name = "fileprint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The report format of the selected subcommand, if it renders one.
    ///
    /// Used by `main` to decide whether errors should be emitted as JSON.
    #[must_use]
    pub fn report_format(&self) -> Option<ReportFormat> {
        match &self.command {
            Commands::Hash(args) => Some(args.format),
            Commands::Check(args) => Some(args.format),
            Commands::Algorithms => None,
        }
    }
}

/// Available subcommands for fileprint.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fingerprint files by hashing a window of their contents
    Hash(HashArgs),
    /// Verify manifest entries against the current filesystem
    Check(CheckArgs),
    /// List supported digest algorithms
    Algorithms,
}

/// Arguments for the hash subcommand.
#[derive(Debug, Args)]
pub struct HashArgs {
    /// Files to fingerprint
    #[arg(value_name = "FILE", required = true)]
    pub paths: Vec<PathBuf>,

    /// Digest algorithm (see `fileprint algorithms` for the list)
    #[arg(short, long, value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Window size in MiB
    #[arg(long, value_name = "MIB")]
    pub size: Option<u64>,

    /// Window start offset in MiB
    #[arg(long, value_name = "MIB")]
    pub start: Option<u64>,

    /// Window stop offset in MiB (takes precedence over --size)
    #[arg(long, value_name = "MIB")]
    pub stop: Option<u64>,

    /// Manifest file for storing and reusing fingerprints
    #[arg(short, long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Recompute fingerprints even when a stored one is still current
    #[arg(long)]
    pub rehash: bool,

    /// Number of worker threads (default: 4)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the check subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Manifest file to verify
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Restrict verification to these paths (default: every entry)
    #[arg(value_name = "FILE")]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}
