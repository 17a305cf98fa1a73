//! Devicetree section generators.
//!
//! Each submodule renders one node kind. Section text is self-contained: node
//! kinds that live under the devicetree root are wrapped in `/ { ... };`, and
//! listener overrides are emitted as root-level `&label { ... };` blocks. A
//! section with nothing to emit renders as an empty string.

pub mod combos;
pub mod hold_taps;
pub mod input_listeners;
pub mod keymap;
pub mod macros;

pub use combos::generate_combos_node;
pub use hold_taps::{declare_hold_taps, generate_behaviors_node};
pub use input_listeners::generate_input_listeners_node;
pub use keymap::{format_layer_cells, generate_keymap_node};
pub use macros::{declare_macros, generate_macros_node, DeclaredMacro};

/// One indentation level in generated devicetree.
pub const INDENT: &str = "    ";

/// Indentation for the given nesting depth.
pub(crate) fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

/// Wraps node text in the devicetree root node.
pub(crate) fn wrap_root(body: &str) -> String {
    format!("/ {{\n{body}}};\n")
}

/// Renders a description as `//` comment lines at the given depth.
pub(crate) fn comment_lines(description: Option<&str>, depth: usize) -> String {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return String::new();
    };
    let pad = indent(depth);
    description
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                format!("{pad}//\n")
            } else {
                format!("{pad}// {line}\n")
            }
        })
        .collect()
}

/// Renders an integer cell list (`<0 1 2>` contents).
pub(crate) fn cell_list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits key positions into those inside `0..total_keys` and the rest.
pub(crate) fn split_positions(positions: &[i64], total_keys: usize) -> (Vec<usize>, Vec<i64>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for &pos in positions {
        match usize::try_from(pos) {
            Ok(idx) if idx < total_keys => valid.push(idx),
            _ => invalid.push(pos),
        }
    }
    (valid, invalid)
}
