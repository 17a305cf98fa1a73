//! `keymap` node: one grid-formatted sub-node per layer.

use super::{indent, wrap_root};
use crate::firmware::formatter::BindingFormatter;
use crate::firmware::grid::render_grid;
use crate::firmware::layers::LayerSymbols;
use crate::firmware::report::{CompileReport, WarningKind};
use crate::models::{Binding, LayoutTable};

/// Formats one layer's bindings into exactly `total_keys` cells.
///
/// Short layers are padded with `&none`; bindings past `total_keys` are dropped
/// with a warning.
pub fn format_layer_cells(
    bindings: &[Binding],
    total_keys: usize,
    formatter: &BindingFormatter<'_>,
    report: &mut CompileReport,
    context: &str,
) -> Vec<String> {
    if bindings.len() > total_keys {
        report.warn(
            WarningKind::SkippedEntry,
            context,
            format!(
                "{} bindings for {total_keys} keys, ignoring the last {}",
                bindings.len(),
                bindings.len() - total_keys
            ),
        );
    }

    let mut cells: Vec<String> = bindings
        .iter()
        .take(total_keys)
        .enumerate()
        .map(|(idx, binding)| {
            formatter.format_reported(binding, report, &format!("{context}, key {idx}"))
        })
        .collect();

    if cells.len() < total_keys {
        let padding = formatter.format(&Binding::none());
        cells.resize(total_keys, padding);
    }
    cells
}

/// Renders the `keymap` node.
///
/// `layers[i]` is rendered under the define symbol of layer `i`.
pub fn generate_keymap_node(
    layers: &[Vec<Binding>],
    symbols: &LayerSymbols,
    table: &LayoutTable,
    formatter: &BindingFormatter<'_>,
    report: &mut CompileReport,
) -> String {
    let mut body = String::new();
    body.push_str(&format!("{}keymap {{\n", indent(1)));
    body.push_str(&format!("{}compatible = \"zmk,keymap\";\n", indent(2)));

    for (idx, bindings) in layers.iter().enumerate() {
        let name = symbols.name(idx).unwrap_or_default();
        let symbol = symbols.symbol(idx).unwrap_or_default();
        let context = format!("layer {name}");

        let cells = format_layer_cells(bindings, table.total_keys, formatter, report, &context);

        body.push('\n');
        body.push_str(&format!("{}layer_{symbol} {{\n", indent(2)));
        body.push_str(&format!("{}bindings = <\n", indent(3)));
        // Blank slots at the end of a row are padding only
        for line in render_grid(&cells, table) {
            body.push_str(line.trim_end());
            body.push('\n');
        }
        body.push_str(&format!("{}>;\n", indent(3)));
        body.push_str(&format!("{}}};\n", indent(2)));
    }

    body.push_str(&format!("{}}};\n", indent(1)));
    wrap_root(&body)
}
