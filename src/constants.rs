//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and output file conventions.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "LazyZMK";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "lazyzmk";

/// Extension of the generated devicetree keymap.
pub const KEYMAP_EXTENSION: &str = "keymap";

/// Extension of the generated Kconfig fragment.
pub const KCONFIG_EXTENSION: &str = "conf";
