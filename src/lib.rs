//! LazyZMK library
//!
//! This library compiles keyboard layout documents into ZMK firmware sources:
//! devicetree keymap fragments (layers, hold-taps, macros, combos, input
//! listeners) and Kconfig settings.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod firmware;
pub mod keycode_db;
pub mod models;
pub mod parser;

pub use error::{CompileError, Result};
pub use firmware::{CompiledKeymap, FirmwareGenerator};
