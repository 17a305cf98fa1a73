//! Keymap compilation.
//!
//! This module turns a keymap document into ZMK devicetree fragments and a
//! Kconfig block: binding formatting, the per-run behavior registry, section
//! generators, the grid layout engine and template rendering.

pub mod behaviors;
pub mod formatter;
pub mod generator;
pub mod grid;
pub mod kconfig;
pub mod layers;
pub mod registry;
pub mod report;
pub mod sections;
pub mod template;
pub mod validator;

// Re-export firmware types
pub use formatter::{BindingFormatter, FormatError};
pub use generator::{CompiledKeymap, FirmwareGenerator};
pub use kconfig::{KconfigGenerator, KconfigOutput};
pub use layers::LayerSymbols;
pub use registry::{BehaviorOrigin, BehaviorRegistry, Registration};
pub use report::{CompileReport, CompileWarning, WarningKind};
pub use template::{PlaceholderRenderer, TemplateRenderer, DEFAULT_KEYMAP_TEMPLATE};
pub use validator::{FirmwareValidator, ValidationReport};
