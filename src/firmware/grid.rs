//! Arranges formatted bindings into the physical keymap grid.
//!
//! The layout table's rows say which key index sits in which grid cell. Each
//! column is as wide as its widest binding; cells are padded to that width
//! according to the column's alignment (right-justified by default) and joined
//! with the key gap. Blank cells render as spaces so thumb clusters and
//! staggered halves line up.

use crate::models::{Alignment, KeySlot, LayoutTable};
use tracing::debug;

/// Renders formatted cells into grid lines.
///
/// `cells[i]` is the formatted binding of key index `i`. Indices missing from
/// `cells` render blank.
///
/// # Examples
///
/// ```
/// use lazyzmk::firmware::grid::render_grid;
/// use lazyzmk::models::{KeySlot, LayoutTable};
///
/// let mut table = LayoutTable::new(
///     "demo",
///     2,
///     vec![
///         vec![KeySlot::Key(0), KeySlot::Blank],
///         vec![KeySlot::Blank, KeySlot::Key(1)],
///     ],
/// );
/// table.formatting.base_indent = String::new();
/// table.formatting.key_gap = " ".to_string();
///
/// let cells = vec!["&kp A".to_string(), "&kp B".to_string()];
/// assert_eq!(render_grid(&cells, &table), vec!["&kp A      ", "      &kp B"]);
/// ```
#[must_use]
pub fn render_grid(cells: &[String], table: &LayoutTable) -> Vec<String> {
    let formatting = &table.formatting;
    let column_count = table.column_count();

    let matrix: Vec<Vec<Option<&str>>> = table
        .rows
        .iter()
        .map(|row| {
            let mut line = vec![None; column_count];
            for (col, slot) in row.iter().enumerate() {
                if let KeySlot::Key(idx) = slot {
                    line[col] = cells.get(*idx).map(String::as_str);
                }
            }
            line
        })
        .collect();

    let widths: Vec<usize> = (0..column_count)
        .map(|col| {
            matrix
                .iter()
                .filter_map(|line| line[col])
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for (col, width) in widths.iter().enumerate() {
        if formatting.default_key_width > 0 && *width > formatting.default_key_width {
            debug!(
                "Column {col} is {width} characters wide (default key width {})",
                formatting.default_key_width
            );
        }
    }

    matrix
        .iter()
        .map(|line| {
            let rendered: Vec<String> = line
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let alignment = formatting.alignment_rules.for_column(col);
                    pad_cell(cell.unwrap_or(""), widths[col], alignment)
                })
                .collect();
            format!("{}{}", formatting.base_indent, rendered.join(&formatting.key_gap))
        })
        .collect()
}

/// Pads a cell to the column width.
fn pad_cell(text: &str, width: usize, alignment: Alignment) -> String {
    match alignment {
        Alignment::Right => format!("{text:>width$}"),
        Alignment::Left => format!("{text:<width$}"),
        Alignment::Center => {
            let padding = width.saturating_sub(text.chars().count());
            let right = padding / 2;
            let left = padding - right;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
        }
    }
}
