//! Build parameter to Kconfig symbol mapping table.

use serde::Deserialize;
use std::collections::HashMap;

/// Value type of a Kconfig symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KconfigType {
    /// `y`/`n`
    Bool,
    /// Integer literal
    Int,
    /// Quoted string
    String,
    /// Passed through verbatim; carries the unrecognized type name if one was given
    Unknown(Option<String>),
}

impl KconfigType {
    /// Parses a type name from the map file.
    #[must_use]
    pub fn parse(name: Option<&str>) -> Self {
        match name.map(str::to_ascii_lowercase).as_deref() {
            Some("bool" | "boolean") => Self::Bool,
            Some("int" | "integer" | "hex") => Self::Int,
            Some("string" | "str") => Self::String,
            Some("unknown") | None => Self::Unknown(None),
            Some(other) => Self::Unknown(Some(other.to_string())),
        }
    }
}

/// One entry of the Kconfig map file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KconfigMapEntry {
    /// Fully-qualified Kconfig symbol (e.g. "CONFIG_ZMK_SLEEP")
    #[serde(alias = "kconfig_name")]
    pub kconfig_name: String,
    /// Declared type name
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Value used when the document supplies `null`
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Human description carried into the traceability comment
    #[serde(default)]
    pub description: Option<String>,
}

impl KconfigMapEntry {
    /// Resolved value type.
    #[must_use]
    pub fn kconfig_type(&self) -> KconfigType {
        KconfigType::parse(self.type_name.as_deref())
    }
}

/// Parameter name to Kconfig entry table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct KconfigMap {
    entries: HashMap<String, KconfigMapEntry>,
}

impl KconfigMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, param_name: impl Into<String>, entry: KconfigMapEntry) {
        self.entries.insert(param_name.into(), entry);
    }

    /// Looks up the entry for a parameter name.
    #[must_use]
    pub fn get(&self, param_name: &str) -> Option<&KconfigMapEntry> {
        self.entries.get(param_name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
