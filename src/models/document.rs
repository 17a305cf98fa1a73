//! Keymap document data structures.
//!
//! The document is the layout editor's JSON export: layer names and bindings,
//! user-defined hold-taps, macros, combos, input listeners and build
//! parameters. Field names follow the editor (`layer_names`, `holdTaps`, ...)
//! with camelCase/snake_case aliases accepted.

use crate::models::binding::Binding;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Complete keymap document handed to the compiler.
///
/// Hold-tap, macro, combo, input listener and config parameter entries are
/// read one at a time; an entry that does not fit its shape lands in
/// [`KeymapDocument::rejected`] instead of failing the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawKeymapDocument")]
pub struct KeymapDocument {
    /// Keyboard identifier (informational)
    pub keyboard: Option<String>,
    /// Layout title (informational)
    pub title: Option<String>,
    /// Layer names in index order
    pub layer_names: Vec<String>,
    /// Per-layer bindings, index order = key index
    pub layers: Vec<Vec<Binding>>,
    /// User-defined hold-tap behaviors
    pub hold_taps: Vec<HoldTap>,
    /// User-defined macros
    pub macros: Vec<Macro>,
    /// Combos
    pub combos: Vec<Combo>,
    /// Input listener overrides
    pub input_listeners: Vec<InputListener>,
    /// Build parameters rendered into Kconfig lines
    pub config_parameters: Vec<ConfigParameter>,
    /// Devicetree text inserted verbatim by the template
    pub custom_devicetree: String,
    /// Behavior definitions inserted verbatim by the template
    pub custom_defined_behaviors: String,
    /// Entries dropped while parsing
    pub rejected: Vec<RejectedEntry>,
}

impl KeymapDocument {
    /// Parses a document from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Document entry that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Section the entry came from ("combo", "hold-tap", ...)
    pub section: &'static str,
    /// Position within its section
    pub index: usize,
    /// Entry name, when one could be read
    pub name: Option<String>,
    /// Deserialization error
    pub message: String,
}

impl fmt::Display for RejectedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {name}", self.section),
            None => write!(f, "{} #{}", self.section, self.index),
        }
    }
}

/// Wire shape of [`KeymapDocument`] with entry lists left unparsed.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawKeymapDocument {
    keyboard: Option<String>,
    title: Option<String>,
    #[serde(alias = "layerNames")]
    layer_names: Vec<String>,
    layers: Vec<Vec<Binding>>,
    #[serde(alias = "holdTaps")]
    hold_taps: Vec<Value>,
    macros: Vec<Value>,
    combos: Vec<Value>,
    #[serde(alias = "inputListeners")]
    input_listeners: Vec<Value>,
    #[serde(alias = "configParameters")]
    config_parameters: Vec<Value>,
    #[serde(alias = "customDevicetree")]
    custom_devicetree: String,
    #[serde(alias = "customDefinedBehaviors")]
    custom_defined_behaviors: String,
}

/// Parses each entry of one section, keeping the ones that fit.
fn read_entries<T: DeserializeOwned>(
    section: &'static str,
    raw: Vec<Value>,
    rejected: &mut Vec<RejectedEntry>,
) -> Vec<T> {
    let mut entries = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        let name = ["name", "code", "paramName"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_string);
        match serde_json::from_value(value) {
            Ok(entry) => entries.push(entry),
            Err(err) => rejected.push(RejectedEntry {
                section,
                index,
                name,
                message: err.to_string(),
            }),
        }
    }
    entries
}

impl From<RawKeymapDocument> for KeymapDocument {
    fn from(raw: RawKeymapDocument) -> Self {
        let mut rejected = Vec::new();
        let hold_taps = read_entries("hold-tap", raw.hold_taps, &mut rejected);
        let macros = read_entries("macro", raw.macros, &mut rejected);
        let combos = read_entries("combo", raw.combos, &mut rejected);
        let input_listeners = read_entries("input listener", raw.input_listeners, &mut rejected);
        let config_parameters =
            read_entries("config parameter", raw.config_parameters, &mut rejected);
        Self {
            keyboard: raw.keyboard,
            title: raw.title,
            layer_names: raw.layer_names,
            layers: raw.layers,
            hold_taps,
            macros,
            combos,
            input_listeners,
            config_parameters,
            custom_devicetree: raw.custom_devicetree,
            custom_defined_behaviors: raw.custom_defined_behaviors,
            rejected,
        }
    }
}

/// Hold-tap decision flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoldTapFlavor {
    /// Tap unless held past the tapping term
    TapPreferred,
    /// Hold as soon as another key is pressed or the term expires
    HoldPreferred,
    /// Hold when another key is pressed and released while held
    Balanced,
    /// Tap unless another key is pressed while held
    TapUnlessInterrupted,
    /// Any flavor name the compiler does not know
    #[serde(other)]
    Unrecognized,
}

impl HoldTapFlavor {
    /// Devicetree value of this flavor, `None` when unrecognized.
    #[must_use]
    pub const fn as_str(self) -> Option<&'static str> {
        match self {
            Self::TapPreferred => Some("tap-preferred"),
            Self::HoldPreferred => Some("hold-preferred"),
            Self::Balanced => Some("balanced"),
            Self::TapUnlessInterrupted => Some("tap-unless-interrupted"),
            Self::Unrecognized => None,
        }
    }
}

/// User-defined hold-tap behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldTap {
    /// Behavior name, with or without the `&` sigil
    pub name: String,
    /// Optional description emitted as a comment
    #[serde(default)]
    pub description: Option<String>,
    /// Hold binding followed by tap binding
    #[serde(default)]
    pub bindings: Vec<Binding>,
    /// Decision flavor
    #[serde(default)]
    pub flavor: Option<HoldTapFlavor>,
    /// tapping-term-ms
    #[serde(default, alias = "tapping_term_ms")]
    pub tapping_term_ms: Option<u32>,
    /// quick-tap-ms
    #[serde(default, alias = "quick_tap_ms")]
    pub quick_tap_ms: Option<u32>,
    /// require-prior-idle-ms
    #[serde(default, alias = "require_prior_idle_ms")]
    pub require_prior_idle_ms: Option<u32>,
    /// hold-trigger-on-release
    #[serde(default, alias = "hold_trigger_on_release")]
    pub hold_trigger_on_release: Option<bool>,
    /// hold-trigger-key-positions
    #[serde(default, alias = "hold_trigger_key_positions")]
    pub hold_trigger_key_positions: Option<Vec<i64>>,
    /// retro-tap
    #[serde(default, alias = "retro_tap")]
    pub retro_tap: Option<bool>,
}

/// User-defined macro.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macro {
    /// Macro name, with or without the `&` sigil
    pub name: String,
    /// Optional description emitted as a comment
    #[serde(default)]
    pub description: Option<String>,
    /// Explicit parameter arity
    #[serde(default, alias = "param_arity")]
    pub param_arity: Option<u32>,
    /// Parameter names; their count is the arity when `paramArity` is absent
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
    /// Played-back bindings, in order
    #[serde(default)]
    pub bindings: Vec<Binding>,
    /// wait-ms
    #[serde(default, alias = "wait_ms")]
    pub wait_ms: Option<u32>,
    /// tap-ms
    #[serde(default, alias = "tap_ms")]
    pub tap_ms: Option<u32>,
}

impl Macro {
    /// Parameter arity of this macro.
    #[must_use]
    pub fn arity(&self) -> u32 {
        self.param_arity
            .unwrap_or_else(|| u32::try_from(self.params.len()).unwrap_or(u32::MAX))
    }
}

/// One entry of a layer filter: a layer index or a layer name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LayerRef {
    /// 0-based layer index (`-1` means all layers)
    Index(i64),
    /// Layer name
    Name(String),
}

impl LayerRef {
    /// True for the explicit "all layers" sentinel.
    #[must_use]
    pub fn is_all_layers(&self) -> bool {
        match self {
            Self::Index(idx) => *idx < 0,
            Self::Name(name) => name.eq_ignore_ascii_case("all"),
        }
    }
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "{idx}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Combo: a binding triggered by pressing several keys together.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combo {
    /// Combo name
    pub name: String,
    /// Optional description emitted as a comment
    #[serde(default)]
    pub description: Option<String>,
    /// Key indices that trigger the combo
    #[serde(default, alias = "key_positions")]
    pub key_positions: Vec<i64>,
    /// Triggered binding
    pub binding: Binding,
    /// Layers the combo is active on (empty = all)
    #[serde(default)]
    pub layers: Vec<LayerRef>,
    /// timeout-ms
    #[serde(default, alias = "timeout_ms")]
    pub timeout_ms: Option<u32>,
    /// require-prior-idle-ms
    #[serde(default, alias = "require_prior_idle_ms")]
    pub require_prior_idle_ms: Option<u32>,
    /// slow-release
    #[serde(default, alias = "slow_release")]
    pub slow_release: Option<bool>,
}

/// Input processor reference with integer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputProcessor {
    /// Processor reference (e.g. "&zip_xy_scaler")
    pub code: String,
    /// Processor parameters
    #[serde(default)]
    pub params: Vec<i64>,
}

/// Child node of an input listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputListenerNode {
    /// Node name
    pub code: String,
    /// Optional description emitted as a comment
    #[serde(default)]
    pub description: Option<String>,
    /// Layers this node applies to
    #[serde(default)]
    pub layers: Vec<LayerRef>,
    /// Processor chain for this node
    #[serde(default, alias = "input_processors")]
    pub input_processors: Vec<InputProcessor>,
}

/// Input listener override node (e.g. `&mmv_input_listener`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputListener {
    /// Listener reference
    pub code: String,
    /// Global processor chain
    #[serde(
        default,
        alias = "input_processors",
        alias = "globalProcessors",
        alias = "global_processors"
    )]
    pub input_processors: Vec<InputProcessor>,
    /// Child nodes in order
    #[serde(default)]
    pub nodes: Vec<InputListenerNode>,
}

/// One build parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigParameter {
    /// Parameter name or fully-qualified `CONFIG_*` flag
    #[serde(alias = "param_name")]
    pub param_name: String,
    /// Parameter value (string, number, bool or null)
    #[serde(default)]
    pub value: serde_json::Value,
    /// Optional description carried into the traceability comment
    #[serde(default)]
    pub description: Option<String>,
}
