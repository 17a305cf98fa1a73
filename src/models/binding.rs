//! Key binding data structures.
//!
//! A binding is the action assigned to one physical key: a behavior id such as
//! `&kp` plus an ordered list of parameters. Parameters are either literals or
//! nested bindings (modifier-function stacks like `LC(LS(A))`).

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// One parameter of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Integer literal (layer index, Bluetooth profile, timing value)
    Int(i64),
    /// String literal (keycode name, layer reference, or raw reference)
    Str(String),
    /// Nested binding (modifier function or behavior-valued parameter)
    Binding(Binding),
    /// Input that is none of the above, kept as JSON text for diagnostics
    Invalid(String),
}

impl Param {
    /// Creates a string literal parameter.
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Returns the literal text of this parameter, if it is a literal.
    #[must_use]
    pub fn literal(&self) -> Option<String> {
        match self {
            Self::Int(value) => Some(value.to_string()),
            Self::Str(value) => Some(value.clone()),
            Self::Binding(_) | Self::Invalid(_) => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) | Self::Invalid(value) => write!(f, "{value}"),
            Self::Binding(binding) => {
                write!(f, "{}(", binding.value)?;
                for (idx, param) in binding.params.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Action assigned to one key: behavior id plus ordered parameters.
///
/// Deserializes from the layout editor's JSON shape
/// (`{"value": "&kp", "params": [{"value": "A", "params": []}]}`) or from a
/// bare behavior reference string (`"&kp"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct Binding {
    /// Behavior id (e.g. "&kp", "&mt", "Custom")
    pub value: String,
    /// Ordered parameters
    pub params: Vec<Param>,
}

impl Binding {
    /// Creates a binding with the given behavior id and parameters.
    pub fn new(value: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            value: value.into(),
            params,
        }
    }

    /// Creates a parameterless binding (e.g. `&trans`).
    pub fn bare(value: impl Into<String>) -> Self {
        Self::new(value, Vec::new())
    }

    /// The no-op binding used to pad short layers.
    #[must_use]
    pub fn none() -> Self {
        Self::bare("&none")
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.value)?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, "]")
    }
}

/// Keys that carry a binding's behavior id in the editor shape.
const ID_KEYS: [&str; 3] = ["value", "behaviorId", "behavior_id"];

/// Literal carried in a `value` field.
fn literal_param(value: &Value) -> Option<Param> {
    match value {
        Value::String(s) => Some(Param::Str(s.clone())),
        Value::Number(n) => n.as_i64().map(Param::Int),
        _ => None,
    }
}

/// Reads a parameter: a bare literal or a `{value, params}` node.
///
/// Anything else becomes [`Param::Invalid`] so only this parameter fails to
/// format.
impl From<Value> for Param {
    fn from(raw: Value) -> Self {
        let parsed = match &raw {
            Value::Object(node) => match (node.get("value"), node.get("params")) {
                (Some(value), None) => literal_param(value),
                (Some(value), Some(Value::Array(params))) if params.is_empty() => {
                    literal_param(value)
                }
                (Some(Value::String(id)), Some(Value::Array(params))) => {
                    Some(Self::Binding(Binding {
                        value: id.clone(),
                        params: params.iter().cloned().map(Self::from).collect(),
                    }))
                }
                _ => None,
            },
            scalar => literal_param(scalar),
        };
        parsed.unwrap_or_else(|| Self::Invalid(raw.to_string()))
    }
}

/// Reads a binding: a bare reference string (`"&kp"`) or the editor's
/// `{value, params}` node.
///
/// Malformed input still produces a binding, with no behavior id and the
/// offending JSON as an invalid parameter, so it renders as an error token
/// in place instead of rejecting the whole document.
impl From<Value> for Binding {
    fn from(raw: Value) -> Self {
        if let Value::String(reference) = &raw {
            return Self::bare(reference.clone());
        }
        if let Value::Object(node) = &raw {
            let id = ID_KEYS.iter().find_map(|key| node.get(*key));
            let params = match node.get("params") {
                None => Some(Vec::new()),
                Some(Value::Array(params)) => {
                    Some(params.iter().cloned().map(Param::from).collect())
                }
                Some(_) => None,
            };
            if let (Some(Value::String(id)), Some(params)) = (id, params) {
                return Self {
                    value: id.clone(),
                    params,
                };
            }
        }
        Self::new(String::new(), vec![Param::Invalid(raw.to_string())])
    }
}
