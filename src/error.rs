//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the urlrecon application.
///
/// - 0: Success (comparison completed)
/// - 1: General error (unexpected failure)
/// - 2: Empty input (one of the lists contained no items)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the comparison completed.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Empty input: nothing to compare in at least one list.
    EmptyInput = 2,
    /// Interrupted: the comparison was cancelled (Ctrl+C).
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
            Self::Success => "UR000",
            Self::GeneralError => "UR001",
            Self::EmptyInput => "UR002",
            Self::Interrupted => "UR130",
        }
    }
}

/// Structured error information for `--json-errors` output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "UR001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the comparison was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

/// Pick the exit code for an application error.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if err
        .downcast_ref::<crate::recon::ReconcileError>()
        .is_some_and(|e| matches!(e, crate::recon::ReconcileError::Interrupted { .. }))
    {
        ExitCode::Interrupted
    } else {
        ExitCode::GeneralError
    }
}
