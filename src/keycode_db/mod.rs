//! ZMK keycode and modifier reference tables.
//!
//! The tables are embedded in the binary at compile time and parsed once into
//! a process-wide immutable instance. They provide shorthand keycode
//! resolution (`"1"` -> `N1`) and the modifier-function alias table
//! (`LCTL` -> `LC`) used when formatting nested modifier expressions.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::error;

/// Database schema from keycodes.json.
#[derive(Debug, Clone, Deserialize)]
struct KeycodeDatabase {
    #[allow(dead_code)]
    version: String,
    keycodes: HashMap<String, String>,
    modifiers: BTreeMap<String, Vec<String>>,
}

/// Keycode shorthand table and modifier alias table.
#[derive(Debug, Clone, Default)]
pub struct KeycodeDb {
    /// Shorthand name -> ZMK key name
    keycodes: HashMap<String, String>,
    /// Canonical modifier-function names (LA, LC, ...)
    canonical_modifiers: Vec<String>,
    /// Modifier alias or canonical name -> canonical name
    modifier_lookup: HashMap<String, String>,
}

static GLOBAL: Lazy<KeycodeDb> = Lazy::new(|| {
    KeycodeDb::load().unwrap_or_else(|err| {
        error!("Failed to load embedded keycode table: {err:#}");
        KeycodeDb::default()
    })
});

impl KeycodeDb {
    /// Loads the tables from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("keycodes.json");
        let db: KeycodeDatabase =
            serde_json::from_str(json_data).context("Failed to parse embedded keycodes.json")?;

        let mut modifier_lookup = HashMap::new();
        let mut canonical_modifiers = Vec::new();
        for (canonical, aliases) in &db.modifiers {
            canonical_modifiers.push(canonical.clone());
            modifier_lookup.insert(canonical.clone(), canonical.clone());
            for alias in aliases {
                modifier_lookup.insert(alias.clone(), canonical.clone());
            }
        }

        Ok(Self {
            keycodes: db.keycodes,
            canonical_modifiers,
            modifier_lookup,
        })
    }

    /// Shared read-only instance, initialized on first use.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Resolves a keycode name through the shorthand table.
    ///
    /// Unknown names pass through unchanged so newer ZMK keycodes keep working.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazyzmk::keycode_db::KeycodeDb;
    ///
    /// let db = KeycodeDb::load().unwrap();
    /// assert_eq!(db.resolve("1"), "N1");
    /// assert_eq!(db.resolve("C_VOL_UP"), "C_VOL_UP");
    /// ```
    #[must_use]
    pub fn resolve(&self, name: &str) -> String {
        self.keycodes
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Canonical modifier-function name for a canonical name or alias.
    #[must_use]
    pub fn modifier_function(&self, name: &str) -> Option<&str> {
        self.modifier_lookup.get(name).map(String::as_str)
    }

    /// True for the canonical function names (`LC`, `RS`, ...), which are
    /// not keycodes on their own. Aliases such as `LSHFT` are keycodes.
    #[must_use]
    pub fn is_modifier_function(&self, name: &str) -> bool {
        self.canonical_modifiers.iter().any(|m| m == name)
    }

    /// The canonical modifier-function names, sorted.
    #[must_use]
    pub fn canonical_modifiers(&self) -> &[String] {
        &self.canonical_modifiers
    }

    /// Number of shorthand keycode entries.
    #[must_use]
    pub fn keycode_count(&self) -> usize {
        self.keycodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_db() -> KeycodeDb {
        KeycodeDb::load().expect("Failed to load keycode table")
    }

    #[test]
    fn test_load_database() {
        let db = get_test_db();
        assert!(db.keycode_count() > 30);
        assert_eq!(
            db.canonical_modifiers(),
            ["LA", "LC", "LG", "LS", "RA", "RC", "RG", "RS"]
        );
    }

    #[test]
    fn test_resolve_shorthand() {
        let db = get_test_db();
        assert_eq!(db.resolve("0"), "N0");
        assert_eq!(db.resolve(";"), "SEMI");
        assert_eq!(db.resolve("\\"), "BSLH");
    }

    #[test]
    fn test_resolve_passes_unknown_through() {
        let db = get_test_db();
        assert_eq!(db.resolve("A"), "A");
        assert_eq!(db.resolve("LSHFT"), "LSHFT");
        assert_eq!(db.resolve("SOME_FUTURE_KEY"), "SOME_FUTURE_KEY");
    }

    #[test]
    fn test_modifier_aliases() {
        let db = get_test_db();
        assert_eq!(db.modifier_function("LC"), Some("LC"));
        assert_eq!(db.modifier_function("LCTL"), Some("LC"));
        assert_eq!(db.modifier_function("RSHFT"), Some("RS"));
        assert_eq!(db.modifier_function("RGUI"), Some("RG"));
        assert_eq!(db.modifier_function("A"), None);

        assert!(db.is_modifier_function("LS"));
        assert!(!db.is_modifier_function("LSHFT"));
        assert!(!db.is_modifier_function("A"));
    }

    #[test]
    fn test_global_instance() {
        assert_eq!(KeycodeDb::global().resolve("9"), "N9");
    }
}
