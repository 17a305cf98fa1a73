//! CLI command handlers for LazyZMK.
//!
//! This module provides headless, scriptable access to the keymap compiler
//! for automation, testing, and CI integration.

pub mod common;
pub mod generate;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use generate::GenerateArgs;
pub use validate::ValidateArgs;
