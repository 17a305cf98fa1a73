//! Shared CLI error type, exit codes and JSON response shapes.

use crate::error::CompileError;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was loaded but is invalid (or has warnings in strict mode)
    Validation = 1,
    /// Input could not be read or output could not be written
    Io = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code to terminate with
    pub exit_code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Invalid input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// File system failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::Io,
            message: message.into(),
        }
    }

    /// Failure loading an input file: unreadable files are I/O errors,
    /// files that do not parse are invalid input.
    pub fn load(what: &str, path: &Path, err: &CompileError) -> Self {
        let message = format!("Failed to load {what} {}: {err}", path.display());
        match err {
            CompileError::Io(_) => Self::io(message),
            _ => Self::validation(message),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// One finding in `validate --json` output.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationMessage {
    /// "error" or "warning"
    pub severity: String,
    /// Warning kind (snake_case) for compile warnings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Where the problem was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Human-readable message
    pub message: String,
}

/// `validate --json` output.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    /// True when the document compiles
    pub valid: bool,
    /// Errors and warnings in order
    pub errors: Vec<ValidationMessage>,
    /// Number of Kconfig symbols that would be set
    pub kconfig_settings: usize,
}
