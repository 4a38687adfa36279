//! Structured error handling and exit codes.

use serde::Serialize;

/// Process exit codes.
///
/// - 0: success, nothing failed and nothing changed
/// - 1: general error (bad configuration, unusable manifest path)
/// - 2: `check` found stale or missing entries
/// - 3: some files failed while others were fingerprinted
/// - 130: interrupted by the user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Everything requested was done.
    Success = 0,
    /// An unexpected error aborted the run.
    GeneralError = 1,
    /// Verification found files that changed or disappeared.
    ChangesDetected = 2,
    /// The batch finished but some files could not be fingerprinted.
    PartialFailure = 3,
    /// The run was interrupted by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FP000",
            Self::GeneralError => "FP001",
            Self::ChangesDetected => "FP002",
            Self::PartialFailure => "FP003",
            Self::Interrupted => "FP130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "FP001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
