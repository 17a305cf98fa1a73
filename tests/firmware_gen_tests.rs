//! Integration tests for the keymap compile pipeline.
//!
//! Tests the complete flow:
//! 1. Parsing documents, layout tables and Kconfig maps from JSON
//! 2. Generation of every devicetree section and the Kconfig fragment
//! 3. Rendering through the keymap template
//! 4. Warning isolation: one bad binding never breaks the rest

mod fixtures;

use fixtures::*;
use lazyzmk::firmware::{
    CompileReport, FirmwareGenerator, KconfigGenerator, PlaceholderRenderer, WarningKind,
    DEFAULT_KEYMAP_TEMPLATE,
};
use lazyzmk::models::{ConfigParameter, KconfigMap, KeymapDocument, LayoutTable};
use lazyzmk::CompileError;
use serde_json::{json, Value};

fn parse(document: &Value, layout: &Value, map: &Value) -> (KeymapDocument, LayoutTable, KconfigMap) {
    (
        serde_json::from_value(document.clone()).expect("document"),
        serde_json::from_value(layout.clone()).expect("layout table"),
        serde_json::from_value(map.clone()).expect("kconfig map"),
    )
}

#[test]
fn test_basic_keymap_generation() {
    let (doc, table, map) = parse(
        &test_document_basic(6),
        &test_layout_table(2, 3),
        &json!({}),
    );

    let compiled = FirmwareGenerator::new(&doc, &table, &map)
        .generate()
        .expect("generation should succeed");

    assert_eq!(compiled.layer_defines, "#define LAYER_Base 0\n#define LAYER_Nav 1\n");
    assert!(compiled.keymap.contains("compatible = \"zmk,keymap\";"));
    assert!(compiled.keymap.contains("layer_Base {"));
    assert!(compiled.keymap.contains("layer_Nav {"));
    assert!(compiled.keymap.contains("            &kp A  &kp B  &kp C\n"));
    assert!(compiled.keymap.contains("            &kp D  &kp E  &kp F\n"));
    assert!(compiled
        .keymap
        .contains("            &trans  &trans  &trans\n"));
    assert!(compiled.report.is_clean(), "{}", compiled.report.format_message());
}

#[test]
fn test_generation_is_deterministic() {
    let (doc, table, map) = parse(
        &test_document_full(),
        &test_layout_table(2, 3),
        &test_kconfig_map(),
    );

    let first = FirmwareGenerator::new(&doc, &table, &map).generate().unwrap();
    let second = FirmwareGenerator::new(&doc, &table, &map).generate().unwrap();

    assert_eq!(
        first.render_keymap(DEFAULT_KEYMAP_TEMPLATE, &PlaceholderRenderer),
        second.render_keymap(DEFAULT_KEYMAP_TEMPLATE, &PlaceholderRenderer)
    );
    assert_eq!(first.kconfig.text, second.kconfig.text);
    assert_eq!(first.report, second.report);
}

#[test]
fn test_short_layer_is_padded_with_none() {
    let mut document = test_document_basic(6);
    document["layers"][1] = json!(["&trans", "&trans"]);
    let (doc, table, map) = parse(&document, &test_layout_table(2, 3), &json!({}));

    let compiled = FirmwareGenerator::new(&doc, &table, &map).generate().unwrap();

    // Columns are right-aligned by default
    assert!(compiled.keymap.contains("            &trans  &trans  &none\n"));
    assert!(compiled.keymap.contains("             &none   &none  &none\n"));
}

#[test]
fn test_unknown_behavior_is_isolated() {
    let mut document = test_document_basic(6);
    document["layers"][0][4] = json!({"value": "bogus", "params": []});
    let (doc, table, map) = parse(&document, &test_layout_table(2, 3), &json!({}));

    let compiled = FirmwareGenerator::new(&doc, &table, &map).generate().unwrap();

    assert_eq!(compiled.report.count(WarningKind::UnknownBehavior), 1);
    assert!(compiled.keymap.contains("&error /*"));
    assert!(compiled.keymap.contains("&kp A"));
    assert!(compiled.keymap.contains("&kp F"));
    assert!(compiled.report.warnings[0].context.contains("key 4"));
}

#[test]
fn test_binding_formats() {
    let mut document = test_document_basic(6);
    document["layers"][0][0] = kp("A");
    document["layers"][0][1] = binding("&mt", &["LSHFT", "A"]);
    document["layers"][0][2] = json!({
        "value": "&kp",
        "params": [{"value": "LC", "params": [{"value": "LS", "params": [{"value": "A"}]}]}]
    });
    document["layers"][0][3] = json!({"value": "&mo", "params": [{"value": "Nav"}]});
    let (doc, table, map) = parse(&document, &test_layout_table(2, 3), &json!({}));

    let compiled = FirmwareGenerator::new(&doc, &table, &map).generate().unwrap();

    assert!(compiled.keymap.contains("&kp A"));
    assert!(compiled.keymap.contains("&mt LSHFT A"));
    assert!(compiled.keymap.contains("&kp LC(LS(A))"));
    assert!(compiled.keymap.contains("&mo LAYER_Nav"));
    assert!(compiled.report.is_clean(), "{}", compiled.report.format_message());
}

#[test]
fn test_full_document_sections() {
    let (doc, table, map) = parse(
        &test_document_full(),
        &test_layout_table(2, 3),
        &test_kconfig_map(),
    );

    let compiled = FirmwareGenerator::new(&doc, &table, &map).generate().unwrap();

    // Hold-tap declared before use, referenced with two parameters
    assert!(compiled.behaviors.contains("hm: hm {"));
    assert!(compiled.behaviors.contains("// Home row mod"));
    assert!(compiled.behaviors.contains("flavor = \"balanced\";"));
    assert!(compiled.behaviors.contains("bindings = <&kp>, <&kp>;"));
    assert!(compiled
        .behaviors
        .contains("hold-trigger-key-positions = <3 4 5>;"));
    assert!(compiled.behaviors.contains("hold-trigger-on-release;"));
    assert!(compiled.keymap.contains("&hm LSHFT A"));

    // Macro
    assert!(compiled.macros.contains("hello: hello {"));
    assert!(compiled.macros.contains("label = \"HELLO\";"));
    assert!(compiled.macros.contains("compatible = \"zmk,behavior-macro\";"));
    assert!(compiled.macros.contains("<&kp H>"));
    assert!(compiled.macros.contains("<&kp I>"));
    assert!(compiled.keymap.contains("&hello"));

    // Combo limited to the Base layer
    assert!(compiled.combos.contains("compatible = \"zmk,combos\";"));
    assert!(compiled.combos.contains("combo_esc {"));
    assert!(compiled.combos.contains("timeout-ms = <50>;"));
    assert!(compiled.combos.contains("key-positions = <0 1>;"));
    assert!(compiled.combos.contains("bindings = <&kp ESC>;"));
    assert!(compiled.combos.contains("layers = <0>;"));

    // Kconfig: mapped bool, direct flag, one unmapped parameter
    assert_eq!(compiled.kconfig.settings["CONFIG_ZMK_SLEEP"], "y");
    assert_eq!(compiled.kconfig.settings["CONFIG_ZMK_RGB_UNDERGLOW"], "y");
    assert!(compiled
        .kconfig
        .text
        .contains("CONFIG_ZMK_SLEEP=y\n# from config parameter 'SLEEP': Enable deep sleep\n"));
    assert_eq!(compiled.kconfig.skipped, vec!["NOT_MAPPED".to_string()]);
    assert_eq!(compiled.report.count(WarningKind::ConfigMappingMiss), 1);
    assert_eq!(compiled.report.warnings.len(), 1);
}

#[test]
fn test_rendered_keymap_has_all_sections() {
    let (doc, table, map) = parse(
        &test_document_full(),
        &test_layout_table(2, 3),
        &test_kconfig_map(),
    );

    let compiled = FirmwareGenerator::new(&doc, &table, &map).generate().unwrap();
    let text = compiled.render_keymap(DEFAULT_KEYMAP_TEMPLATE, &PlaceholderRenderer);

    assert!(text.contains("Integration Test"));
    assert!(text.contains("#include <behaviors.dtsi>"));
    assert!(!text.contains("{{"));

    let behaviors = text.find("behaviors {").expect("behaviors node");
    let macros = text.find("macros {").expect("macros node");
    let combos = text.find("combos {").expect("combos node");
    let keymap = text.find("keymap {").expect("keymap node");
    assert!(behaviors < macros && macros < combos && combos < keymap);
}

#[test]
fn test_missing_layers_is_fatal() {
    let mut document = test_document_basic(6);
    document["layers"] = json!([]);
    document["layer_names"] = json!([]);
    let (doc, table, map) = parse(&document, &test_layout_table(2, 3), &json!({}));

    let err = FirmwareGenerator::new(&doc, &table, &map)
        .generate()
        .unwrap_err();

    assert!(matches!(err, CompileError::MalformedInput(_)));
}

#[test]
fn test_layout_key_out_of_range_is_fatal() {
    let mut layout = test_layout_table(2, 3);
    layout["rows"][1][2] = json!(42);
    let (doc, table, map) = parse(&test_document_basic(6), &layout, &json!({}));

    let err = FirmwareGenerator::new(&doc, &table, &map)
        .generate()
        .unwrap_err();

    assert!(matches!(err, CompileError::MalformedInput(_)));
    assert!(err.to_string().contains("42"));
}

#[test]
fn test_kconfig_generator_standalone() {
    let map: KconfigMap = serde_json::from_value(test_kconfig_map()).unwrap();
    let params: Vec<ConfigParameter> = serde_json::from_value(json!([
        {"paramName": "IDLE_TIMEOUT", "value": null},
        {"paramName": "SLEEP", "value": "false"}
    ]))
    .unwrap();
    let mut report = CompileReport::new();

    let output = KconfigGenerator::new(&map).generate(&params, &mut report);

    assert_eq!(output.settings["CONFIG_ZMK_IDLE_TIMEOUT"], "30000");
    assert_eq!(output.settings["CONFIG_ZMK_SLEEP"], "n");
    assert!(report.is_clean());
}

#[test]
fn test_malformed_entries_do_not_reject_document() {
    let mut document = test_document_basic(6);
    document["layers"][0][1] = json!({"value": "&kp", "params": [{"value": 1.5}]});
    document["combos"] = json!([
        {"name": "no_binding", "keyPositions": [0, 1]},
        {"name": "tab", "keyPositions": [1, 2], "binding": kp("TAB")}
    ]);
    document["holdTaps"] = json!([{
        "name": "hm",
        "bindings": ["&kp", "&kp"],
        "flavor": "balanced",
        "holdTriggerKeyPositions": [-1, 0]
    }]);
    let (doc, table, map) = parse(&document, &test_layout_table(2, 3), &json!({}));

    let compiled = FirmwareGenerator::new(&doc, &table, &map).generate().unwrap();

    assert!(compiled.keymap.contains("&kp A"));
    assert!(compiled.keymap.contains("&error /*"));
    assert!(compiled.keymap.contains("&kp C"));
    assert!(compiled.combos.contains("combo_tab {"));
    assert!(!compiled.combos.contains("no_binding"));
    assert!(compiled
        .behaviors
        .contains("hold-trigger-key-positions = <0>;"));
    assert_eq!(compiled.report.count(WarningKind::InvalidParameterShape), 1);
    assert_eq!(compiled.report.count(WarningKind::SkippedEntry), 1);
    assert_eq!(compiled.report.count(WarningKind::UnresolvedReference), 1);
}
