//! Report rendering for batch runs.
//!
//! Two formats: text lines in the checksum-tool convention, and a JSON
//! report for scripting and automation.
//!
//! # JSON Schema (`hash`)
//!
//! ```json
//! {
//!   "files": [
//!     {
//!       "path": "/data/big.iso",
//!       "algorithm": "blake2b512",
//!       "digest": "9f86d081...",
//!       "modified": 1700000000,
//!       "size": 123456789,
//!       "window_start": 52428800,
//!       "window_stop": null,
//!       "window_size": 26214400,
//!       "reused": false
//!     }
//!   ],
//!   "errors": [
//!     { "path": "/data/gone.iso", "error": "File not found: /data/gone.iso" }
//!   ],
//!   "summary": {
//!     "total": 2,
//!     "computed": 1,
//!     "reused": 0,
//!     "failed": 1,
//!     "bytes_hashed": 26214400,
//!     "duration_ms": 84,
//!     "interrupted": false,
//!     "exit_code": 3,
//!     "exit_code_name": "FP003"
//!   }
//! }
//! ```

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::fingerprint::{Fingerprint, FingerprintOutcome};

/// Output format selector for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// One line per file, digest first.
    Text,
    /// A single JSON document.
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Errors that can occur while rendering a report.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error while writing report: {0}")]
    Io(#[from] std::io::Error),
}

/// One successfully fingerprinted file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Canonical path of the fingerprinted file.
    pub path: String,
    /// The fingerprint record, flattened into the file object.
    #[serde(flatten)]
    pub fingerprint: Fingerprint,
    /// Whether the stored fingerprint was reused without hashing.
    pub reused: bool,
}

impl FileReport {
    /// Build a report row from a processing outcome.
    #[must_use]
    pub fn new(path: impl Into<String>, outcome: &FingerprintOutcome) -> Self {
        Self {
            path: path.into(),
            fingerprint: outcome.fingerprint().clone(),
            reused: outcome.was_reused(),
        }
    }
}

/// One file that could not be fingerprinted.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Path of the file that failed.
    pub path: String,
    /// Rendered error message.
    pub error: String,
}

/// Batch counters for the `hash` summary block.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Files requested.
    pub total: usize,
    /// Fingerprints computed from a window read.
    pub computed: usize,
    /// Fingerprints reused without hashing.
    pub reused: usize,
    /// Files that failed.
    pub failed: usize,
    /// Window bytes actually read and hashed.
    pub bytes_hashed: u64,
    /// Wall-clock duration of the batch in milliseconds.
    pub duration_ms: u64,
    /// Whether the batch was interrupted.
    pub interrupted: bool,
    /// The exit code number.
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g. "FP000").
    pub exit_code_name: String,
}

/// Complete report for a `hash` run.
#[derive(Debug, Clone, Serialize)]
pub struct HashReport {
    /// Successfully fingerprinted files, in input order.
    pub files: Vec<FileReport>,
    /// Per-file failures.
    pub errors: Vec<ErrorReport>,
    /// Batch counters.
    pub summary: RunSummary,
}

impl HashReport {
    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report in the requested format.
    ///
    /// Text mode prints `<digest>  <path>` per successful file; failures
    /// are reported through the log and the exit code. JSON mode writes
    /// the whole document including the errors array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        format: ReportFormat,
        pretty: bool,
    ) -> Result<(), OutputError> {
        match format {
            ReportFormat::Text => {
                for file in &self.files {
                    writeln!(writer, "{}  {}", file.fingerprint.digest, file.path)?;
                }
            }
            ReportFormat::Json => {
                let json = if pretty {
                    self.to_json_pretty()?
                } else {
                    self.to_json()?
                };
                writer.write_all(json.as_bytes())?;
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

/// Verification status of one manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Size, mtime and configuration all match the stored fingerprint.
    Unchanged,
    /// The file exists but no longer matches its fingerprint.
    Stale,
    /// The file is gone or unreadable.
    Missing,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unchanged => "unchanged",
            Self::Stale => "stale",
            Self::Missing => "missing",
        })
    }
}

/// One verified manifest entry.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Path as stored in the manifest.
    pub path: String,
    /// Verification result.
    pub status: FileStatus,
}

/// Counters for the `check` summary block.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    /// Entries whose fingerprint is still current.
    pub unchanged: usize,
    /// Entries needing a recompute.
    pub stale: usize,
    /// Entries whose file is gone or unreadable.
    pub missing: usize,
    /// The exit code number.
    pub exit_code: i32,
    /// The machine-readable exit code name.
    pub exit_code_name: String,
}

/// Complete report for a `check` run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Verified entries, in manifest order.
    pub files: Vec<StatusReport>,
    /// Batch counters.
    pub summary: CheckSummary,
}

impl CheckReport {
    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report in the requested format.
    ///
    /// Text mode prints `<path>: <status>` per entry.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        format: ReportFormat,
        pretty: bool,
    ) -> Result<(), OutputError> {
        match format {
            ReportFormat::Text => {
                for file in &self.files {
                    writeln!(writer, "{}: {}", file.path, file.status)?;
                }
            }
            ReportFormat::Json => {
                let json = if pretty {
                    self.to_json_pretty()?
                } else {
                    self.to_json()?
                };
                writer.write_all(json.as_bytes())?;
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestAlgorithm;
    use crate::error::ExitCode;

    fn sample_fingerprint() -> Fingerprint {
        Fingerprint {
            algorithm: DigestAlgorithm::Sha256,
            digest: "cafe".to_string(),
            modified: 1_600_000_000,
            size: 42,
            window_start: 0,
            window_stop: None,
            window_size: 1024,
        }
    }

    fn sample_report() -> HashReport {
        HashReport {
            files: vec![FileReport {
                path: "/data/a.bin".to_string(),
                fingerprint: sample_fingerprint(),
                reused: false,
            }],
            errors: vec![ErrorReport {
                path: "/data/gone.bin".to_string(),
                error: "File not found: /data/gone.bin".to_string(),
            }],
            summary: RunSummary {
                total: 2,
                computed: 1,
                reused: 0,
                failed: 1,
                bytes_hashed: 42,
                duration_ms: 7,
                interrupted: false,
                exit_code: ExitCode::PartialFailure.as_i32(),
                exit_code_name: ExitCode::PartialFailure.code_prefix().to_string(),
            },
        }
    }

    #[test]
    fn text_mode_prints_digest_then_path() {
        let mut buffer = Vec::new();
        sample_report()
            .write_to(&mut buffer, ReportFormat::Text, false)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "cafe  /data/a.bin\n");
    }

    #[test]
    fn json_mode_flattens_the_fingerprint() {
        let json = sample_report().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let file = &parsed["files"][0];
        assert_eq!(file["path"], "/data/a.bin");
        // Flattened record: digest and window fields sit on the file
        // object itself.
        assert_eq!(file["digest"], "cafe");
        assert_eq!(file["algorithm"], "sha256");
        assert_eq!(file["window_size"], 1024);
        assert_eq!(file["reused"], false);

        assert_eq!(parsed["errors"][0]["path"], "/data/gone.bin");
        assert_eq!(parsed["summary"]["exit_code"], 3);
        assert_eq!(parsed["summary"]["exit_code_name"], "FP003");
    }

    #[test]
    fn pretty_json_has_newlines() {
        let mut buffer = Vec::new();
        sample_report()
            .write_to(&mut buffer, ReportFormat::Json, true)
            .unwrap();
        let written = String::from_utf8(buffer).unwrap();
        assert!(written.contains('\n'));
        assert!(written.starts_with('{'));
    }

    #[test]
    fn check_report_text_lines() {
        let report = CheckReport {
            files: vec![
                StatusReport {
                    path: "/data/a.bin".to_string(),
                    status: FileStatus::Unchanged,
                },
                StatusReport {
                    path: "/data/b.bin".to_string(),
                    status: FileStatus::Stale,
                },
                StatusReport {
                    path: "/data/c.bin".to_string(),
                    status: FileStatus::Missing,
                },
            ],
            summary: CheckSummary {
                unchanged: 1,
                stale: 1,
                missing: 1,
                exit_code: ExitCode::ChangesDetected.as_i32(),
                exit_code_name: ExitCode::ChangesDetected.code_prefix().to_string(),
            },
        };

        let mut buffer = Vec::new();
        report
            .write_to(&mut buffer, ReportFormat::Text, false)
            .unwrap();
        let written = String::from_utf8(buffer).unwrap();
        assert_eq!(
            written,
            "/data/a.bin: unchanged\n/data/b.bin: stale\n/data/c.bin: missing\n"
        );
    }

    #[test]
    fn check_report_json_statuses_are_lowercase() {
        let report = CheckReport {
            files: vec![StatusReport {
                path: "/data/a.bin".to_string(),
                status: FileStatus::Missing,
            }],
            summary: CheckSummary {
                unchanged: 0,
                stale: 0,
                missing: 1,
                exit_code: 2,
                exit_code_name: "FP002".to_string(),
            },
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(parsed["files"][0]["status"], "missing");
    }

    #[test]
    fn empty_report_writes_nothing_in_text_mode() {
        let report = HashReport {
            files: Vec::new(),
            errors: Vec::new(),
            summary: RunSummary {
                total: 0,
                computed: 0,
                reused: 0,
                failed: 0,
                bytes_hashed: 0,
                duration_ms: 0,
                interrupted: false,
                exit_code: 0,
                exit_code_name: "FP000".to_string(),
            },
        };
        let mut buffer = Vec::new();
        report
            .write_to(&mut buffer, ReportFormat::Text, false)
            .unwrap();
        assert!(buffer.is_empty());
    }
}
