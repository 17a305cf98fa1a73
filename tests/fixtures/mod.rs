//! Shared test fixtures for integration tests.
//!
//! Builds keymap documents, layout tables and Kconfig maps as JSON values and
//! writes them into temporary directories for the CLI tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Key press binding in the editor's JSON shape (`&kp <code>`).
pub fn kp(code: &str) -> Value {
    json!({"value": "&kp", "params": [{"value": code, "params": []}]})
}

/// Binding with plain literal parameters.
pub fn binding(behavior: &str, params: &[&str]) -> Value {
    let params: Vec<Value> = params
        .iter()
        .map(|p| json!({"value": p, "params": []}))
        .collect();
    json!({"value": behavior, "params": params})
}

/// Layout table with `rows` x `cols` keys numbered row-major.
pub fn test_layout_table(rows: usize, cols: usize) -> Value {
    let grid: Vec<Vec<usize>> = (0..rows)
        .map(|row| (0..cols).map(|col| row * cols + col).collect())
        .collect();
    json!({
        "keyboardName": "test_board",
        "totalKeys": rows * cols,
        "rows": grid,
        "formatting": {
            "baseIndent": "            ",
            "keyGap": "  ",
            "defaultKeyWidth": 8
        }
    })
}

/// Document with a Base layer of letters and a transparent Nav layer.
pub fn test_document_basic(total_keys: usize) -> Value {
    let base: Vec<Value> = (0..total_keys)
        .map(|idx| {
            let letter = char::from(b'A' + u8::try_from(idx % 26).unwrap());
            kp(&letter.to_string())
        })
        .collect();
    let nav: Vec<Value> = (0..total_keys).map(|_| json!("&trans")).collect();

    json!({
        "keyboard": "test_board",
        "title": "Integration Test",
        "layer_names": ["Base", "Nav"],
        "layers": [base, nav]
    })
}

/// Document exercising hold-taps, macros, combos and build parameters.
pub fn test_document_full() -> Value {
    let mut doc = test_document_basic(6);
    doc["holdTaps"] = json!([{
        "name": "&hm",
        "description": "Home row mod",
        "bindings": ["&kp", "&kp"],
        "flavor": "balanced",
        "tappingTermMs": 200,
        "quickTapMs": 150,
        "holdTriggerKeyPositions": [3, 4, 5],
        "holdTriggerOnRelease": true
    }]);
    doc["macros"] = json!([{
        "name": "&hello",
        "description": "Types hi",
        "bindings": [kp("H"), kp("I")],
        "waitMs": 10,
        "tapMs": 10
    }]);
    doc["combos"] = json!([{
        "name": "esc",
        "keyPositions": [0, 1],
        "binding": kp("ESC"),
        "layers": ["Base"],
        "timeoutMs": 50
    }]);
    doc["config_parameters"] = json!([
        {"paramName": "SLEEP", "value": true},
        {"paramName": "CONFIG_ZMK_RGB_UNDERGLOW", "value": "y"},
        {"paramName": "NOT_MAPPED", "value": 1}
    ]);
    doc["layers"][0][0] = binding("&hm", &["LSHFT", "A"]);
    doc["layers"][0][1] = json!({"value": "&hello", "params": []});
    doc
}

/// Kconfig map covering the parameters of [`test_document_full`].
pub fn test_kconfig_map() -> Value {
    json!({
        "SLEEP": {
            "kconfigName": "CONFIG_ZMK_SLEEP",
            "type": "bool",
            "description": "Enable deep sleep"
        },
        "IDLE_TIMEOUT": {
            "kconfigName": "CONFIG_ZMK_IDLE_TIMEOUT",
            "type": "int",
            "default": 30000
        }
    })
}

/// Writes a JSON value as pretty-printed text.
pub fn write_json(path: &Path, value: &Value) {
    let text = serde_json::to_string_pretty(value).expect("Failed to serialize fixture");
    fs::write(path, text).expect("Failed to write fixture file");
}

/// Input files written into a temp dir for CLI tests.
pub struct TempInputs {
    pub dir: TempDir,
    pub keymap: PathBuf,
    pub layout: PathBuf,
    pub kconfig_map: PathBuf,
}

impl TempInputs {
    /// Output directory inside the temp dir.
    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }
}

/// Writes a document, layout table and Kconfig map to a new temp dir.
pub fn create_temp_inputs(document: &Value, layout: &Value, kconfig_map: &Value) -> TempInputs {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let keymap = dir.path().join("corne.json");
    let layout_path = dir.path().join("layout.json");
    let kconfig_path = dir.path().join("kconfig_map.json");

    write_json(&keymap, document);
    write_json(&layout_path, layout);
    write_json(&kconfig_path, kconfig_map);

    TempInputs {
        dir,
        keymap,
        layout: layout_path,
        kconfig_map: kconfig_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_basic_document() {
        let doc = test_document_basic(6);
        assert_eq!(doc["layers"].as_array().unwrap().len(), 2);
        assert_eq!(doc["layers"][0].as_array().unwrap().len(), 6);
        assert_eq!(doc["layers"][0][2]["params"][0]["value"], "C");
    }

    #[test]
    fn test_fixture_layout_table() {
        let table = test_layout_table(2, 3);
        assert_eq!(table["totalKeys"], 6);
        assert_eq!(table["rows"][1], json!([3, 4, 5]));
    }

    #[test]
    fn test_fixture_full_document() {
        let doc = test_document_full();
        assert_eq!(doc["holdTaps"][0]["name"], "&hm");
        assert_eq!(doc["layers"][0][0]["value"], "&hm");
    }
}
