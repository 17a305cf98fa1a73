//! Physical layout table: how key indices sit in the printed keymap grid.

use serde::Deserialize;
use std::collections::BTreeMap;

/// One cell of a layout row: a key index or an absent key.
///
/// In JSON a cell is an integer; any negative value is the blank sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "i64")]
pub enum KeySlot {
    /// Logical key index
    Key(usize),
    /// Physically absent key
    Blank,
}

impl From<i64> for KeySlot {
    fn from(value: i64) -> Self {
        usize::try_from(value).map_or(Self::Blank, Self::Key)
    }
}

impl KeySlot {
    /// Key index, if this slot holds a key.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Key(idx) => Some(idx),
            Self::Blank => None,
        }
    }
}

/// Horizontal alignment of a grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Pad on the left (default)
    #[default]
    Right,
    /// Pad on the right
    Left,
    /// Split padding, extra space on the left
    Center,
}

/// Column alignment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlignmentRules {
    /// Alignment used for columns without an override
    pub default: Alignment,
    /// Per-column overrides keyed by column number
    pub columns: BTreeMap<usize, Alignment>,
}

impl AlignmentRules {
    /// Alignment for the given column.
    #[must_use]
    pub fn for_column(&self, col: usize) -> Alignment {
        self.columns.get(&col).copied().unwrap_or(self.default)
    }
}

/// Text formatting parameters for the keymap grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutFormatting {
    /// Prefix of every grid line
    #[serde(alias = "base_indent")]
    pub base_indent: String,
    /// Separator between cells
    #[serde(alias = "key_gap")]
    pub key_gap: String,
    /// Expected cell width, only used to flag unusually wide bindings
    #[serde(alias = "default_key_width")]
    pub default_key_width: usize,
    /// Column alignment
    #[serde(alias = "alignment_rules")]
    pub alignment_rules: AlignmentRules,
}

impl Default for LayoutFormatting {
    fn default() -> Self {
        Self {
            base_indent: " ".repeat(12),
            key_gap: "  ".to_string(),
            default_key_width: 8,
            alignment_rules: AlignmentRules::default(),
        }
    }
}

/// Keyboard layout table loaded from the layout file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTable {
    /// Keyboard name
    #[serde(alias = "keyboard_name", alias = "keyboard")]
    pub keyboard_name: String,
    /// Number of keys on every layer
    #[serde(alias = "total_keys")]
    pub total_keys: usize,
    /// Row-major grid of key indices
    pub rows: Vec<Vec<KeySlot>>,
    /// Grid formatting
    #[serde(default)]
    pub formatting: LayoutFormatting,
    /// Symbolic key-position names used by combos
    #[serde(default, alias = "key_position_names")]
    pub key_position_names: BTreeMap<usize, String>,
}

impl LayoutTable {
    /// Builds a table with default formatting.
    pub fn new(keyboard_name: impl Into<String>, total_keys: usize, rows: Vec<Vec<KeySlot>>) -> Self {
        Self {
            keyboard_name: keyboard_name.into(),
            total_keys,
            rows,
            formatting: LayoutFormatting::default(),
            key_position_names: BTreeMap::new(),
        }
    }

    /// Number of grid columns (longest row).
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Symbolic name of a key position, falling back to the numeric index.
    #[must_use]
    pub fn key_position_name(&self, idx: usize) -> String {
        self.key_position_names
            .get(&idx)
            .cloned()
            .unwrap_or_else(|| idx.to_string())
    }

    /// Indices referenced by the grid, in row-major order.
    pub fn key_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().flatten().filter_map(|slot| slot.index())
    }
}
