//! Warnings collected during a compile run.
//!
//! Every recoverable problem is logged through `tracing` and recorded here so
//! callers can print or inspect it after generation.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Kinds of recoverable compile problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Binding id is not built-in, a custom reference, or raw
    UnknownBehavior,
    /// Wrong parameter count or type for a recognized behavior
    InvalidParameterShape,
    /// Combo layer filter entry, key position or hold-tap child that cannot be resolved
    UnresolvedReference,
    /// Kconfig parameter without a mapping entry
    ConfigMappingMiss,
    /// Behavior re-registered with a different arity
    RegistryConflict,
    /// Entry dropped for another reason (duplicate, bad value, unsupported arity)
    SkippedEntry,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBehavior => write!(f, "Unknown Behavior"),
            Self::InvalidParameterShape => write!(f, "Invalid Parameter Shape"),
            Self::UnresolvedReference => write!(f, "Unresolved Reference"),
            Self::ConfigMappingMiss => write!(f, "Config Mapping Miss"),
            Self::RegistryConflict => write!(f, "Registry Conflict"),
            Self::SkippedEntry => write!(f, "Skipped Entry"),
        }
    }
}

/// One recoverable problem with the section it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileWarning {
    /// Problem kind
    pub kind: WarningKind,
    /// Where it happened (e.g. "layer Base", "combo esc")
    pub context: String,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.kind, self.message)
    }
}

/// Warnings collected over one compile run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    /// Recorded warnings in emission order
    pub warnings: Vec<CompileWarning>,
}

impl CompileReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Records a warning and logs it.
    pub fn warn(&mut self, kind: WarningKind, context: impl Into<String>, message: impl Into<String>) {
        let warning = CompileWarning {
            kind,
            context: context.into(),
            message: message.into(),
        };
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of warnings of the given kind.
    #[must_use]
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    /// Formats the report for terminal output.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();
        if !self.warnings.is_empty() {
            message.push_str(&format!("⚠️  {} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }
        message
    }
}
