//! Application orchestration for the fileprint CLI.
//!
//! `run_app` wires the pieces together: configuration resolution, the
//! manifest, the parallel fingerprint workers, and report rendering.
//! Each subcommand maps to one function here so the binary stays a thin
//! shell and integration tests can drive the application through the
//! library API.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use bytesize::ByteSize;
use rayon::prelude::*;

use crate::cli::{CheckArgs, Cli, Commands, HashArgs};
use crate::config::HashConfig;
use crate::digest::DigestAlgorithm;
use crate::error::ExitCode;
use crate::fingerprint::{Fingerprint, FingerprintError, FingerprintOutcome, Fingerprinter};
use crate::logging::init_logging;
use crate::manifest::Manifest;
use crate::output::{
    CheckReport, CheckSummary, ErrorReport, FileReport, FileStatus, HashReport, RunSummary,
    StatusReport,
};
use crate::signal::install_handler;
use crate::source::LocalFile;
use crate::window::HashWindow;

/// Run the application for parsed CLI arguments and return the exit code.
///
/// # Errors
///
/// Returns an error for setup failures (bad configuration, unreadable
/// manifest). Per-file failures do not error; they are reported and
/// reflected in the exit code.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);
    log::debug!("fileprint v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Hash(args) => run_hash(&args),
        Commands::Check(args) => run_check(&args),
        Commands::Algorithms => Ok(run_algorithms()),
    }
}

/// Fingerprint the requested files, reusing manifest entries where current.
fn run_hash(args: &HashArgs) -> anyhow::Result<ExitCode> {
    let mut config = HashConfig::load();
    if let Some(name) = &args.algorithm {
        config = config.with_algorithm(name.clone());
    }
    if let Some(size) = args.size {
        config = config.with_size(size);
    }
    if let Some(start) = args.start {
        config = config.with_start(start);
    }
    if let Some(stop) = args.stop {
        config = config.with_stop(stop);
    }
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    let (algorithm, window) = config.resolve()?;
    let fingerprinter = Fingerprinter::new(algorithm, window);
    log::debug!(
        "using {} over window start={} size={} stop={:?}",
        algorithm,
        window.start,
        window.size,
        window.stop
    );

    let mut manifest = match &args.manifest {
        Some(path) => Manifest::load_or_default(path),
        None => Manifest::new(),
    };

    let handler = install_handler()?;

    let total = args.paths.len();
    let mut errors = Vec::new();

    // Resolve each path to its canonical manifest key and snapshot the
    // stored fingerprint up front, so the workers only need their own
    // job and one file cannot take two entries under different
    // spellings.
    let mut jobs: Vec<(PathBuf, Option<Fingerprint>)> = Vec::with_capacity(total);
    for path in &args.paths {
        match Manifest::canonical_key(path) {
            Ok(canonical) => {
                let existing = if args.rehash {
                    None
                } else {
                    manifest.get(&canonical).cloned()
                };
                jobs.push((canonical, existing));
            }
            Err(e) => {
                let error = FingerprintError::from_io(path, e);
                log::warn!("Failed to fingerprint {}: {}", path.display(), error);
                errors.push(ErrorReport {
                    path: path.display().to_string(),
                    error: error.to_string(),
                });
            }
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .unwrap_or_else(|_| {
            log::warn!(
                "Failed to create custom thread pool, using global pool with {} threads",
                rayon::current_num_threads()
            );
            rayon::ThreadPoolBuilder::new().build().unwrap()
        });

    log::info!("Fingerprinting {} files", jobs.len());
    let started = Instant::now();

    let worker = handler.clone();
    let results: Vec<(PathBuf, Option<Result<FingerprintOutcome, FingerprintError>>)> = pool
        .install(|| {
            jobs.into_par_iter()
                .map(|(path, existing)| {
                    if worker.is_shutdown_requested() {
                        log::debug!("Shutdown requested, skipping {}", path.display());
                        return (path, None);
                    }

                    let result = fingerprinter.process_path(&path, existing.as_ref());
                    if let Err(e) = &result {
                        log::warn!("Failed to fingerprint {}: {}", path.display(), e);
                    }
                    (path, Some(result))
                })
                .collect()
        });

    let elapsed = started.elapsed();

    let mut files = Vec::new();
    let mut computed = 0usize;
    let mut reused = 0usize;
    let mut bytes_hashed = 0u64;

    for (path, result) in results {
        match result {
            // Skipped after the interrupt; neither hashed nor failed.
            None => {}
            Some(Ok(outcome)) => {
                if outcome.was_reused() {
                    reused += 1;
                } else {
                    computed += 1;
                    bytes_hashed =
                        bytes_hashed.saturating_add(window_bytes_read(outcome.fingerprint()));
                }
                files.push(FileReport::new(path.display().to_string(), &outcome));
                manifest.insert(path, outcome.into_fingerprint());
            }
            Some(Err(e)) => {
                errors.push(ErrorReport {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    // Persist whatever was processed, including partial results after an
    // interrupt.
    if let Some(path) = &args.manifest {
        manifest.save(path)?;
    }

    let failed = errors.len();
    let interrupted = handler.is_shutdown_requested();
    let exit_code = if interrupted {
        ExitCode::Interrupted
    } else if failed == 0 {
        ExitCode::Success
    } else {
        ExitCode::PartialFailure
    };

    log::info!(
        "Fingerprinted {} files in {:?}: {} computed, {} reused, {} failed, {} hashed",
        total,
        elapsed,
        computed,
        reused,
        failed,
        ByteSize::b(bytes_hashed)
    );

    let report = HashReport {
        files,
        errors,
        summary: RunSummary {
            total,
            computed,
            reused,
            failed,
            bytes_hashed,
            duration_ms: elapsed.as_millis() as u64,
            interrupted,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        },
    };

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    report.write_to(&mut lock, args.format, args.pretty)?;

    Ok(exit_code)
}

/// Verify manifest entries against the current filesystem state.
///
/// Each entry is checked with the algorithm and window it was recorded
/// under, so `check` never needs the current configuration and never
/// reads file contents.
fn run_check(args: &CheckArgs) -> anyhow::Result<ExitCode> {
    let manifest = Manifest::load(&args.manifest)?;

    let targets: Vec<(PathBuf, Fingerprint)> = if args.paths.is_empty() {
        manifest
            .entries()
            .map(|(path, fingerprint)| (path.to_path_buf(), fingerprint.clone()))
            .collect()
    } else {
        let mut targets = Vec::with_capacity(args.paths.len());
        for path in &args.paths {
            // Entries are keyed canonically; resolve the spelling first.
            let key = Manifest::canonical_key(path).unwrap_or_else(|e| {
                log::debug!("Cannot canonicalize {}: {}", path.display(), e);
                path.clone()
            });
            match manifest.get(&key) {
                Some(fingerprint) => targets.push((key, fingerprint.clone())),
                None => bail!("No manifest entry for {}", path.display()),
            }
        }
        targets
    };

    let mut files = Vec::with_capacity(targets.len());
    let mut unchanged = 0usize;
    let mut stale = 0usize;
    let mut missing = 0usize;

    for (path, stored) in targets {
        let window = HashWindow {
            start: stored.window_start,
            size: stored.window_size,
            stop: stored.window_stop,
        };
        let fingerprinter = Fingerprinter::new(stored.algorithm, window);

        let status = match fingerprinter.is_current(&stored, &LocalFile::new(&path)) {
            Ok(true) => {
                unchanged += 1;
                FileStatus::Unchanged
            }
            Ok(false) => {
                stale += 1;
                FileStatus::Stale
            }
            Err(e) => {
                log::debug!("Cannot stat {}: {}", path.display(), e);
                missing += 1;
                FileStatus::Missing
            }
        };
        files.push(StatusReport {
            path: path.display().to_string(),
            status,
        });
    }

    let exit_code = if stale + missing > 0 {
        ExitCode::ChangesDetected
    } else {
        ExitCode::Success
    };

    log::info!(
        "Checked {} entries: {} unchanged, {} stale, {} missing",
        files.len(),
        unchanged,
        stale,
        missing
    );

    let report = CheckReport {
        files,
        summary: CheckSummary {
            unchanged,
            stale,
            missing,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        },
    };

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    report.write_to(&mut lock, args.format, args.pretty)?;

    Ok(exit_code)
}

/// Print the digest registry, marking the preferred default.
fn run_algorithms() -> ExitCode {
    let default = DigestAlgorithm::default_algorithm();
    for algorithm in DigestAlgorithm::ALL {
        if algorithm == default {
            println!("{} (default)", algorithm);
        } else {
            println!("{}", algorithm);
        }
    }
    ExitCode::Success
}

/// Bytes actually read for a computed fingerprint, after EOF truncation.
fn window_bytes_read(fingerprint: &Fingerprint) -> u64 {
    let window = HashWindow {
        start: fingerprint.window_start,
        size: fingerprint.window_size,
        stop: fingerprint.window_stop,
    };
    let range = window.resolve(fingerprint.size);
    range
        .length
        .min(fingerprint.size.saturating_sub(range.offset))
}
