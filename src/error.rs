//! Fatal compile errors.

use std::io;

use thiserror::Error;

/// Convenient result type for the compiler.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors that abort a compile run.
///
/// Everything else (bad bindings, unresolved combo layers, unmapped Kconfig
/// parameters) is recovered locally and reported as a warning.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A mandatory input is absent or has the wrong shape.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// An input file could not be parsed.
    #[error("Failed to parse {what}: {message}")]
    Parse {
        /// Which input failed
        what: String,
        /// Parser message
        message: String,
    },

    /// I/O failure while reading inputs.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CompileError {
    /// Shorthand for [`CompileError::MalformedInput`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}
