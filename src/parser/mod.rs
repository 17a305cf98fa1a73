//! Loading input files.
//!
//! The keymap document and Kconfig map are JSON. Layout tables are often
//! written by hand, so they are read as JSON5 (comments, trailing commas).

use crate::error::{CompileError, Result};
use crate::models::{KconfigMap, KeymapDocument, LayoutTable};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

fn read(path: &Path, what: &str) -> Result<String> {
    debug!("Reading {what} from {}", path.display());
    Ok(fs::read_to_string(path)?)
}

fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| CompileError::Parse {
        what: what.to_string(),
        message: e.to_string(),
    })
}

/// Parses a keymap document from JSON text.
pub fn parse_keymap_document(text: &str) -> Result<KeymapDocument> {
    parse_json(text, "keymap document")
}

/// Parses a layout table from JSON or JSON5 text.
pub fn parse_layout_table(text: &str) -> Result<LayoutTable> {
    json5::from_str(text).map_err(|e| CompileError::Parse {
        what: "layout table".to_string(),
        message: e.to_string(),
    })
}

/// Parses a Kconfig map from JSON text.
pub fn parse_kconfig_map(text: &str) -> Result<KconfigMap> {
    parse_json(text, "Kconfig map")
}

/// Loads a keymap document file.
pub fn load_keymap_document(path: &Path) -> Result<KeymapDocument> {
    parse_keymap_document(&read(path, "keymap document")?)
}

/// Loads a layout table file.
pub fn load_layout_table(path: &Path) -> Result<LayoutTable> {
    parse_layout_table(&read(path, "layout table")?)
}

/// Loads a Kconfig map file.
pub fn load_kconfig_map(path: &Path) -> Result<KconfigMap> {
    parse_kconfig_map(&read(path, "Kconfig map")?)
}
