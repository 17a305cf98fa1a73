//! Data models for keymap documents, layout tables and Kconfig maps.
//!
//! Models only describe input shapes; all rendering lives in `firmware`.

pub mod binding;
pub mod document;
pub mod kconfig_map;
pub mod layout_table;

// Re-export all model types
pub use binding::{Binding, Param};
pub use document::{
    Combo, ConfigParameter, HoldTap, HoldTapFlavor, InputListener, InputListenerNode,
    InputProcessor, KeymapDocument, LayerRef, Macro, RejectedEntry,
};
pub use kconfig_map::{KconfigMap, KconfigMapEntry, KconfigType};
pub use layout_table::{Alignment, AlignmentRules, KeySlot, LayoutFormatting, LayoutTable};
