//! `combos` node.

use super::{comment_lines, indent, split_positions, wrap_root};
use crate::firmware::formatter::BindingFormatter;
use crate::firmware::layers::{sanitize_symbol, LayerSymbols};
use crate::firmware::report::{CompileReport, WarningKind};
use crate::models::{Combo, LayerRef, LayoutTable};
use std::collections::HashSet;

/// Outcome of resolving a combo's layer filter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LayerFilter {
    /// Active on every layer; the property is omitted
    All,
    /// Active on the listed layer indices
    Only(Vec<usize>),
    /// At least one entry did not resolve; the property is omitted
    Dropped(String),
}

fn resolve_layer_filter(refs: &[LayerRef], layers: &LayerSymbols) -> LayerFilter {
    if refs.is_empty() || refs.iter().any(LayerRef::is_all_layers) {
        return LayerFilter::All;
    }

    let mut indices = Vec::with_capacity(refs.len());
    for entry in refs {
        let resolved = match entry {
            LayerRef::Index(idx) => usize::try_from(*idx).ok().filter(|i| *i < layers.len()),
            LayerRef::Name(name) => layers.index_of(name),
        };
        match resolved {
            Some(idx) if !indices.contains(&idx) => indices.push(idx),
            Some(_) => {}
            None => return LayerFilter::Dropped(entry.to_string()),
        }
    }
    LayerFilter::Only(indices)
}

/// Renders the `combos` node.
///
/// A combo with no key positions, or with a position outside the layout, is
/// skipped. An unresolvable layer filter entry drops the whole filter, leaving
/// the combo active on every layer.
pub fn generate_combos_node(
    combos: &[Combo],
    layers: &LayerSymbols,
    table: &LayoutTable,
    formatter: &BindingFormatter<'_>,
    report: &mut CompileReport,
) -> String {
    let mut nodes = Vec::new();
    let mut used_symbols = HashSet::new();

    for (idx, combo) in combos.iter().enumerate() {
        let context = format!("combo {}", combo.name);

        if combo.key_positions.is_empty() {
            report.warn(WarningKind::SkippedEntry, context, "combo has no key positions");
            continue;
        }
        let (positions, out_of_range): (Vec<usize>, Vec<i64>) =
            split_positions(&combo.key_positions, table.total_keys);
        if !out_of_range.is_empty() {
            report.warn(
                WarningKind::SkippedEntry,
                context,
                format!(
                    "key positions {out_of_range:?} are outside 0..{}",
                    table.total_keys
                ),
            );
            continue;
        }

        let mut symbol = sanitize_symbol(combo.name.trim());
        if symbol.is_empty() {
            symbol = idx.to_string();
        }
        if !used_symbols.insert(symbol.clone()) {
            let unique = format!("{symbol}_{idx}");
            report.warn(
                WarningKind::SkippedEntry,
                context.as_str(),
                format!("node name 'combo_{symbol}' already used, using 'combo_{unique}'"),
            );
            used_symbols.insert(unique.clone());
            symbol = unique;
        }

        let pad = indent(3);
        let mut node = comment_lines(combo.description.as_deref(), 2);
        node.push_str(&format!("{}combo_{symbol} {{\n", indent(2)));
        if let Some(ms) = combo.timeout_ms {
            node.push_str(&format!("{pad}timeout-ms = <{ms}>;\n"));
        }

        let positions: Vec<String> = positions
            .iter()
            .map(|pos| table.key_position_name(*pos))
            .collect();
        node.push_str(&format!("{pad}key-positions = <{}>;\n", positions.join(" ")));

        let binding = formatter.format_reported(&combo.binding, report, &context);
        node.push_str(&format!("{pad}bindings = <{binding}>;\n"));

        match resolve_layer_filter(&combo.layers, layers) {
            LayerFilter::All => {}
            LayerFilter::Only(indices) => {
                let cells: Vec<String> = indices.iter().map(ToString::to_string).collect();
                node.push_str(&format!("{pad}layers = <{}>;\n", cells.join(" ")));
            }
            LayerFilter::Dropped(entry) => report.warn(
                WarningKind::UnresolvedReference,
                context.as_str(),
                format!("layer '{entry}' does not exist, combo is active on all layers"),
            ),
        }

        if let Some(ms) = combo.require_prior_idle_ms {
            node.push_str(&format!("{pad}require-prior-idle-ms = <{ms}>;\n"));
        }
        if combo.slow_release == Some(true) {
            node.push_str(&format!("{pad}slow-release;\n"));
        }
        node.push_str(&format!("{}}};\n", indent(2)));
        nodes.push(node);
    }

    if nodes.is_empty() {
        return String::new();
    }

    let mut body = format!("{}combos {{\n", indent(1));
    body.push_str(&format!("{}compatible = \"zmk,combos\";\n", indent(2)));
    for node in nodes {
        body.push('\n');
        body.push_str(&node);
    }
    body.push_str(&format!("{}}};\n", indent(1)));
    wrap_root(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::registry::BehaviorRegistry;
    use crate::models::{Binding, KeySlot, Param};

    fn combo(name: &str, positions: &[i64], layers: Vec<LayerRef>) -> Combo {
        Combo {
            name: name.to_string(),
            description: None,
            key_positions: positions.to_vec(),
            binding: Binding::new("&kp", vec![Param::str("ESC")]),
            layers,
            timeout_ms: None,
            require_prior_idle_ms: None,
            slow_release: None,
        }
    }

    fn table() -> LayoutTable {
        LayoutTable::new(
            "four",
            4,
            vec![(0..4).map(KeySlot::Key).collect()],
        )
    }

    fn layer_symbols() -> LayerSymbols {
        let mut report = CompileReport::new();
        LayerSymbols::build(&["Base".to_string(), "Nav".to_string()], &mut report)
    }

    fn render(combos: &[Combo], table: &LayoutTable, report: &mut CompileReport) -> String {
        let registry = BehaviorRegistry::with_builtins();
        let layers = layer_symbols();
        let formatter = BindingFormatter::new(&registry, &layers);
        generate_combos_node(combos, &layers, table, &formatter, report)
    }

    #[test]
    fn test_combo_node() {
        let mut report = CompileReport::new();
        let mut esc = combo("esc", &[0, 1], vec![LayerRef::Name("Nav".into()), LayerRef::Index(0)]);
        esc.description = Some("Escape".to_string());
        esc.timeout_ms = Some(50);
        esc.require_prior_idle_ms = Some(150);
        esc.slow_release = Some(true);

        let node = render(&[esc], &table(), &mut report);

        let expected = "\
/ {
    combos {
        compatible = \"zmk,combos\";

        // Escape
        combo_esc {
            timeout-ms = <50>;
            key-positions = <0 1>;
            bindings = <&kp ESC>;
            layers = <1 0>;
            require-prior-idle-ms = <150>;
            slow-release;
        };
    };
};
";
        assert_eq!(node, expected);
        assert!(report.is_clean());
    }

    #[test]
    fn test_key_position_names() {
        let mut report = CompileReport::new();
        let mut table = table();
        table.key_position_names.insert(2, "LM1".to_string());

        let node = render(&[combo("x", &[2, 3], Vec::new())], &table, &mut report);

        assert!(node.contains("key-positions = <LM1 3>;"));
    }

    #[test]
    fn test_unresolved_layer_drops_filter() {
        let mut report = CompileReport::new();
        let node = render(
            &[combo("tab", &[0, 1], vec![LayerRef::Name("Base".into()), LayerRef::Name("Gone".into())])],
            &table(),
            &mut report,
        );

        assert!(node.contains("combo_tab"));
        assert!(!node.contains("layers ="));
        assert_eq!(report.count(WarningKind::UnresolvedReference), 1);
    }

    #[test]
    fn test_all_layers_sentinel_omits_filter() {
        let mut report = CompileReport::new();
        let node = render(
            &[
                combo("a", &[0, 1], vec![LayerRef::Index(-1)]),
                combo("b", &[2, 3], vec![LayerRef::Name("all".into())]),
            ],
            &table(),
            &mut report,
        );

        assert!(!node.contains("layers ="));
        assert!(report.is_clean());
    }

    #[test]
    fn test_invalid_combos_are_skipped() {
        let mut report = CompileReport::new();
        let node = render(
            &[
                combo("empty", &[], Vec::new()),
                combo("far", &[1, 9], Vec::new()),
                combo("negative", &[-1, 0], Vec::new()),
                combo("ok", &[0, 3], Vec::new()),
            ],
            &table(),
            &mut report,
        );

        assert!(!node.contains("combo_empty"));
        assert!(!node.contains("combo_far"));
        assert!(!node.contains("combo_negative"));
        assert!(node.contains("combo_ok"));
        assert_eq!(report.count(WarningKind::SkippedEntry), 3);
    }

    #[test]
    fn test_duplicate_names_get_unique_nodes() {
        let mut report = CompileReport::new();
        let node = render(
            &[combo("esc", &[0, 1], Vec::new()), combo("esc", &[2, 3], Vec::new())],
            &table(),
            &mut report,
        );

        assert!(node.contains("combo_esc {"));
        assert!(node.contains("combo_esc_1 {"));
    }

    #[test]
    fn test_no_combos_renders_nothing() {
        let mut report = CompileReport::new();
        assert_eq!(render(&[], &table(), &mut report), "");
    }
}
