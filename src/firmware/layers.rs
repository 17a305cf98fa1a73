//! Layer names, their preprocessor symbols, and the `#define` block.

use crate::firmware::report::{CompileReport, WarningKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Matches characters that cannot appear in a C identifier.
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("static regex"));

/// Prefix of every layer define.
pub const LAYER_DEFINE_PREFIX: &str = "LAYER_";

/// Turns a layer name into an identifier fragment.
///
/// Non-word characters become `_` and a leading digit gets a `_` prefix.
///
/// # Examples
///
/// ```
/// use lazyzmk::firmware::layers::sanitize_symbol;
///
/// assert_eq!(sanitize_symbol("Mouse Keys"), "Mouse_Keys");
/// assert_eq!(sanitize_symbol("3D-Nav"), "_3D_Nav");
/// ```
#[must_use]
pub fn sanitize_symbol(name: &str) -> String {
    let replaced = NON_WORD.replace_all(name, "_");
    if replaced.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{replaced}")
    } else {
        replaced.into_owned()
    }
}

/// Layer names with their unique, stable define symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSymbols {
    names: Vec<String>,
    symbols: Vec<String>,
}

impl LayerSymbols {
    /// Builds symbols for the given names in index order.
    ///
    /// Two names that sanitize to the same symbol keep the first one; later
    /// ones get a `_<index>` suffix and a warning.
    pub fn build(names: &[String], report: &mut CompileReport) -> Self {
        let mut seen = HashSet::new();
        let mut symbols = Vec::with_capacity(names.len());

        for (idx, name) in names.iter().enumerate() {
            let mut symbol = sanitize_symbol(name);
            if symbol.is_empty() {
                symbol = format!("_{idx}");
            }
            if !seen.insert(symbol.clone()) {
                let unique = format!("{symbol}_{idx}");
                report.warn(
                    WarningKind::SkippedEntry,
                    format!("layer {name}"),
                    format!("symbol '{symbol}' already used, using '{unique}'"),
                );
                seen.insert(unique.clone());
                symbol = unique;
            }
            symbols.push(symbol);
        }

        Self {
            names: names.to_vec(),
            symbols,
        }
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if there are no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Layer name at an index.
    #[must_use]
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    /// Identifier fragment for the layer at an index (without `LAYER_`).
    #[must_use]
    pub fn symbol(&self, idx: usize) -> Option<&str> {
        self.symbols.get(idx).map(String::as_str)
    }

    /// Index of a layer by exact name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Full `LAYER_*` define for a layer name, if the name is declared.
    #[must_use]
    pub fn define_for(&self, name: &str) -> Option<String> {
        let idx = self.index_of(name)?;
        Some(format!("{LAYER_DEFINE_PREFIX}{}", self.symbols[idx]))
    }

    /// Renders one `#define LAYER_<sym> <index>` line per layer.
    #[must_use]
    pub fn generate_defines(&self) -> String {
        self.symbols
            .iter()
            .enumerate()
            .map(|(idx, symbol)| format!("#define {LAYER_DEFINE_PREFIX}{symbol} {idx}\n"))
            .collect()
    }
}
