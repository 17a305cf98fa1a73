//! Built-in ZMK behavior table.
//!
//! Every built-in id maps to one [`BehaviorKind`], which decides both its
//! parameter arity and which formatting routine renders it.

/// Sigil that starts every behavior reference.
pub const BEHAVIOR_SIGIL: char = '&';

/// Id that marks a raw passthrough binding.
pub const RAW_BEHAVIOR_ID: &str = "Custom";

/// Closed set of built-in behavior families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    /// No parameters (`&trans`, `&none`, `&sys_reset`, macro controls)
    NoParam,
    /// `&kp` with a keycode or nested modifier expression
    KeyPress,
    /// `&lt LAYER KEY`
    LayerTap,
    /// `&mt MOD KEY`
    ModTap,
    /// Single layer parameter (`&mo`, `&to`, `&tog`, `&sl`)
    Layer,
    /// Single generic parameter (`&sk`, `&rgb_ug`, `&out`, mouse actions)
    OneParam,
    /// `&bt COMMAND [INDEX]`
    Bluetooth,
}

impl BehaviorKind {
    /// Number of binding cells this behavior takes.
    #[must_use]
    pub const fn arity(self) -> u8 {
        match self {
            Self::NoParam => 0,
            Self::KeyPress | Self::Layer | Self::OneParam => 1,
            Self::LayerTap | Self::ModTap | Self::Bluetooth => 2,
        }
    }
}

/// Built-in behavior ids and their families.
pub const BUILTIN_BEHAVIORS: &[(&str, BehaviorKind)] = &[
    ("&trans", BehaviorKind::NoParam),
    ("&none", BehaviorKind::NoParam),
    ("&sys_reset", BehaviorKind::NoParam),
    ("&bootloader", BehaviorKind::NoParam),
    ("&caps_word", BehaviorKind::NoParam),
    ("&key_repeat", BehaviorKind::NoParam),
    ("&studio_unlock", BehaviorKind::NoParam),
    ("&gresc", BehaviorKind::NoParam),
    ("&macro_tap", BehaviorKind::NoParam),
    ("&macro_press", BehaviorKind::NoParam),
    ("&macro_release", BehaviorKind::NoParam),
    ("&macro_pause_for_release", BehaviorKind::NoParam),
    ("&macro_param_1to1", BehaviorKind::NoParam),
    ("&macro_param_1to2", BehaviorKind::NoParam),
    ("&macro_param_2to1", BehaviorKind::NoParam),
    ("&macro_param_2to2", BehaviorKind::NoParam),
    ("&kp", BehaviorKind::KeyPress),
    ("&lt", BehaviorKind::LayerTap),
    ("&mt", BehaviorKind::ModTap),
    ("&mo", BehaviorKind::Layer),
    ("&to", BehaviorKind::Layer),
    ("&tog", BehaviorKind::Layer),
    ("&sl", BehaviorKind::Layer),
    ("&sk", BehaviorKind::OneParam),
    ("&kt", BehaviorKind::OneParam),
    ("&rgb_ug", BehaviorKind::OneParam),
    ("&out", BehaviorKind::OneParam),
    ("&mkp", BehaviorKind::OneParam),
    ("&mmv", BehaviorKind::OneParam),
    ("&msc", BehaviorKind::OneParam),
    ("&ext_power", BehaviorKind::OneParam),
    ("&bl", BehaviorKind::OneParam),
    ("&macro_wait_time", BehaviorKind::OneParam),
    ("&macro_tap_time", BehaviorKind::OneParam),
    ("&bt", BehaviorKind::Bluetooth),
];

/// Ids collapsed onto another canonical id before dispatch.
const BEHAVIOR_ALIASES: &[(&str, &str)] = &[("&reset", "&sys_reset")];

/// Bluetooth commands and whether they take a profile index.
pub const BLUETOOTH_COMMANDS: &[(&str, bool)] = &[
    ("BT_CLR", false),
    ("BT_CLR_ALL", false),
    ("BT_NXT", false),
    ("BT_PRV", false),
    ("BT_SEL", true),
    ("BT_DISC", true),
];

/// Canonical id for a behavior id, collapsing aliases.
#[must_use]
pub fn canonical_id(id: &str) -> &str {
    BEHAVIOR_ALIASES
        .iter()
        .find(|(alias, _)| *alias == id)
        .map_or(id, |&(_, canonical)| canonical)
}

/// Family of a built-in behavior id (aliases included).
#[must_use]
pub fn builtin_kind(id: &str) -> Option<BehaviorKind> {
    let id = canonical_id(id);
    BUILTIN_BEHAVIORS
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, kind)| *kind)
}

/// Whether a Bluetooth command takes an index; `None` if the command is unknown.
#[must_use]
pub fn bluetooth_takes_index(command: &str) -> Option<bool> {
    BLUETOOTH_COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, takes_index)| *takes_index)
}

/// Adds the `&` sigil to a behavior name if it is missing.
#[must_use]
pub fn behavior_ref(name: &str) -> String {
    if name.starts_with(BEHAVIOR_SIGIL) {
        name.to_string()
    } else {
        format!("{BEHAVIOR_SIGIL}{name}")
    }
}

/// Devicetree node label for a behavior name (sigil stripped).
#[must_use]
pub fn behavior_label(name: &str) -> &str {
    name.strip_prefix(BEHAVIOR_SIGIL).unwrap_or(name)
}
