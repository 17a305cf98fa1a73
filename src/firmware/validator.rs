//! Structural validation before generation.
//!
//! Errors here are fatal for the compile run: later stages index into the
//! layout table and layer list without further checks. Warnings describe
//! input that still compiles but will not render the way it reads.

use crate::models::{KeySlot, KeymapDocument, LayoutTable};
use std::collections::HashSet;
use std::fmt;

/// Validation result with errors and warnings.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems that prevent generation
    pub errors: Vec<ValidationError>,
    /// Non-blocking findings
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if there are no errors (warnings are allowed).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.errors.is_empty() {
            message.push_str(&format!("❌ {} validation errors:\n", self.errors.len()));
            for (idx, error) in self.errors.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, error));
            }
        }

        if !self.warnings.is_empty() {
            message.push_str(&format!("\n⚠️  {} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Type of validation error
    pub kind: ValidationErrorKind,
    /// Layout row where the error occurred
    pub row: Option<usize>,
    /// Human-readable error message
    pub message: String,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            row: None,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Sets the layout row context.
    #[must_use]
    pub const fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Sets a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = self.row {
            write!(f, "[Row {row}] {}: {}", self.kind, self.message)?;
        } else {
            write!(f, "{}: {}", self.kind, self.message)?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n    → {suggestion}")?;
        }

        Ok(())
    }
}

/// Types of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Layout table declares zero keys
    NoKeys,
    /// Layout table has no rows
    EmptyGrid,
    /// Layout row references a key index past `totalKeys`
    KeyOutOfBounds,
    /// Document has no layer data
    MissingLayers,
    /// More layer names than layers
    MismatchedLayerCount,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoKeys => write!(f, "No Keys"),
            Self::EmptyGrid => write!(f, "Empty Grid"),
            Self::KeyOutOfBounds => write!(f, "Key Out of Bounds"),
            Self::MissingLayers => write!(f, "Missing Layers"),
            Self::MismatchedLayerCount => write!(f, "Mismatched Layer Count"),
        }
    }
}

/// Validation warning (non-blocking).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Warning message
    pub message: String,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Checks a document and layout table before generation.
pub struct FirmwareValidator<'a> {
    document: &'a KeymapDocument,
    table: &'a LayoutTable,
}

impl<'a> FirmwareValidator<'a> {
    /// Creates a new validator.
    #[must_use]
    pub const fn new(document: &'a KeymapDocument, table: &'a LayoutTable) -> Self {
        Self { document, table }
    }

    /// Validates the layout table and the document's layer structure.
    ///
    /// Checks:
    /// - `totalKeys` is positive and the grid has rows
    /// - every grid index is below `totalKeys`
    /// - every key index is placed exactly once
    /// - there is layer data, and no more names than layers
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_table(&mut report);
        self.validate_layers(&mut report);
        report
    }

    fn validate_table(&self, report: &mut ValidationReport) {
        let table = self.table;

        if table.total_keys == 0 {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::NoKeys,
                    format!("Layout '{}' declares 0 keys", table.keyboard_name),
                )
                .with_suggestion("Set totalKeys to the number of keys on the keyboard"),
            );
        }
        if table.rows.iter().all(Vec::is_empty) {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::EmptyGrid,
                    format!("Layout '{}' has no grid rows", table.keyboard_name),
                )
                .with_suggestion("Add rows of key indices, -1 for gaps"),
            );
            return;
        }

        let mut placed = HashSet::new();
        for (row_idx, row) in table.rows.iter().enumerate() {
            for slot in row {
                let KeySlot::Key(idx) = *slot else {
                    continue;
                };
                if idx >= table.total_keys {
                    report.add_error(
                        ValidationError::new(
                            ValidationErrorKind::KeyOutOfBounds,
                            format!(
                                "Key index {idx} is outside 0..{}",
                                table.total_keys
                            ),
                        )
                        .with_row(row_idx),
                    );
                } else if !placed.insert(idx) {
                    report.add_warning(ValidationWarning::new(format!(
                        "Key {idx} appears more than once in the grid (row {row_idx})"
                    )));
                }
            }
        }

        if table.total_keys > 0 && report.is_valid() {
            let unplaced: Vec<usize> = (0..table.total_keys)
                .filter(|idx| !placed.contains(idx))
                .collect();
            if !unplaced.is_empty() {
                report.add_warning(ValidationWarning::new(format!(
                    "Keys {unplaced:?} are not placed in the grid and will not be rendered"
                )));
            }
        }
    }

    fn validate_layers(&self, report: &mut ValidationReport) {
        let document = self.document;

        if document.layers.is_empty() {
            report.add_error(
                ValidationError::new(ValidationErrorKind::MissingLayers, "Document has no layers")
                    .with_suggestion("Add at least one layer of bindings"),
            );
            return;
        }
        if document.layer_names.len() > document.layers.len() {
            report.add_error(ValidationError::new(
                ValidationErrorKind::MismatchedLayerCount,
                format!(
                    "{} layer names but only {} layers",
                    document.layer_names.len(),
                    document.layers.len()
                ),
            ));
        }
        if document.layer_names.len() < document.layers.len() {
            report.add_warning(ValidationWarning::new(format!(
                "{} layers have no name and will be named by index",
                document.layers.len() - document.layer_names.len()
            )));
        }
    }
}
