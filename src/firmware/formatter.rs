//! Binding to devicetree expression formatting.
//!
//! Dispatch goes through [`renderer_for`], which maps each built-in behavior
//! family to one formatting function. Anything else is a raw passthrough
//! (`Custom`), a call to a user behavior (`&name`), or unknown.
//!
//! Formatting never aborts a compile: a binding that cannot be rendered turns
//! into an `&error /* ... */` token naming the original id and parameters.

use crate::firmware::behaviors::{
    bluetooth_takes_index, builtin_kind, canonical_id, BehaviorKind, BEHAVIOR_SIGIL,
    RAW_BEHAVIOR_ID,
};
use crate::firmware::layers::LayerSymbols;
use crate::firmware::registry::BehaviorRegistry;
use crate::firmware::report::{CompileReport, WarningKind};
use crate::keycode_db::KeycodeDb;
use crate::models::{Binding, Param};
use thiserror::Error;
use tracing::{debug, warn};

/// Deepest allowed modifier-function nesting (`LC(LS(...))`).
pub const MAX_MODIFIER_DEPTH: usize = 16;

/// Why a binding could not be formatted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Id is not built-in, not a `&` reference and not raw.
    #[error("unknown behavior '{0}'")]
    UnknownBehavior(String),

    /// Wrong parameter count or type.
    #[error("{0}")]
    InvalidParameterShape(String),

    /// Modifier stack nested past [`MAX_MODIFIER_DEPTH`].
    #[error("modifier functions nested deeper than {MAX_MODIFIER_DEPTH} levels")]
    TooDeep,
}

impl FormatError {
    /// Report category of this error.
    #[must_use]
    pub const fn kind(&self) -> WarningKind {
        match self {
            Self::UnknownBehavior(_) => WarningKind::UnknownBehavior,
            Self::InvalidParameterShape(_) | Self::TooDeep => WarningKind::InvalidParameterShape,
        }
    }

    fn shape(message: impl Into<String>) -> Self {
        Self::InvalidParameterShape(message.into())
    }
}

fn invalid_param(raw: &str) -> FormatError {
    FormatError::shape(format!("malformed parameter {raw}"))
}

/// Renders the inline error token for a binding that failed to format.
#[must_use]
pub fn error_token(binding: &Binding, err: &FormatError) -> String {
    let diagnostic = format!("{binding}: {err}").replace("*/", "* /");
    format!("&error /* {diagnostic} */")
}

/// Formatting routine for one behavior family.
type Renderer = fn(&BindingFormatter<'_>, &str, &[Param]) -> Result<String, FormatError>;

/// Maps a behavior family to its formatting routine.
fn renderer_for(kind: BehaviorKind) -> Renderer {
    match kind {
        BehaviorKind::NoParam => render_no_param,
        BehaviorKind::KeyPress | BehaviorKind::OneParam => render_one_key,
        BehaviorKind::LayerTap => render_layer_tap,
        BehaviorKind::ModTap => render_mod_tap,
        BehaviorKind::Layer => render_layer_change,
        BehaviorKind::Bluetooth => render_bluetooth,
    }
}

fn expect_params(id: &str, params: &[Param], expected: usize) -> Result<(), FormatError> {
    if params.len() == expected {
        Ok(())
    } else {
        Err(FormatError::shape(format!(
            "{id} takes exactly {expected} parameter{}, got {}",
            if expected == 1 { "" } else { "s" },
            params.len()
        )))
    }
}

fn render_no_param(
    _fmt: &BindingFormatter<'_>,
    id: &str,
    params: &[Param],
) -> Result<String, FormatError> {
    expect_params(id, params, 0)?;
    Ok(id.to_string())
}

fn render_one_key(
    fmt: &BindingFormatter<'_>,
    id: &str,
    params: &[Param],
) -> Result<String, FormatError> {
    expect_params(id, params, 1)?;
    Ok(format!("{id} {}", fmt.format_key(&params[0], 0)?))
}

fn render_layer_tap(
    fmt: &BindingFormatter<'_>,
    id: &str,
    params: &[Param],
) -> Result<String, FormatError> {
    expect_params(id, params, 2)?;
    Ok(format!(
        "{id} {} {}",
        fmt.format_layer(&params[0])?,
        fmt.format_key(&params[1], 0)?
    ))
}

fn render_mod_tap(
    fmt: &BindingFormatter<'_>,
    id: &str,
    params: &[Param],
) -> Result<String, FormatError> {
    expect_params(id, params, 2)?;
    Ok(format!(
        "{id} {} {}",
        fmt.format_key(&params[0], 0)?,
        fmt.format_key(&params[1], 0)?
    ))
}

fn render_layer_change(
    fmt: &BindingFormatter<'_>,
    id: &str,
    params: &[Param],
) -> Result<String, FormatError> {
    expect_params(id, params, 1)?;
    Ok(format!("{id} {}", fmt.format_layer(&params[0])?))
}

fn render_bluetooth(
    _fmt: &BindingFormatter<'_>,
    id: &str,
    params: &[Param],
) -> Result<String, FormatError> {
    let (command, index) = match params {
        [command] => (command, None),
        [command, index] => (command, Some(index)),
        _ => {
            return Err(FormatError::shape(format!(
                "{id} takes a command and an optional index, got {} parameters",
                params.len()
            )))
        }
    };

    let Param::Str(command) = command else {
        return Err(FormatError::shape(format!(
            "{id} command must be a name, got '{command}'"
        )));
    };
    let takes_index = bluetooth_takes_index(command).ok_or_else(|| {
        FormatError::shape(format!("unknown {id} command '{command}'"))
    })?;

    match (takes_index, index) {
        (true, Some(index)) => {
            let index = match index {
                Param::Int(n) if *n >= 0 => n.to_string(),
                Param::Str(s) if s.parse::<u32>().is_ok() => s.clone(),
                other => {
                    return Err(FormatError::shape(format!(
                        "{command} index must be a non-negative number, got '{other}'"
                    )))
                }
            };
            Ok(format!("{id} {command} {index}"))
        }
        (true, None) => Err(FormatError::shape(format!("{command} requires an index"))),
        (false, Some(_)) => Err(FormatError::shape(format!(
            "{command} does not take an index"
        ))),
        (false, None) => Ok(format!("{id} {command}")),
    }
}

/// Formats bindings against one compile run's registry and layer table.
#[derive(Debug, Clone, Copy)]
pub struct BindingFormatter<'a> {
    registry: &'a BehaviorRegistry,
    layers: &'a LayerSymbols,
    keycodes: &'static KeycodeDb,
}

impl<'a> BindingFormatter<'a> {
    /// Creates a formatter using the shared keycode table.
    #[must_use]
    pub fn new(registry: &'a BehaviorRegistry, layers: &'a LayerSymbols) -> Self {
        Self {
            registry,
            layers,
            keycodes: KeycodeDb::global(),
        }
    }

    /// Formats a binding; failures become an inline error token.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazyzmk::firmware::{BehaviorRegistry, BindingFormatter, LayerSymbols};
    /// use lazyzmk::models::{Binding, Param};
    ///
    /// let registry = BehaviorRegistry::with_builtins();
    /// let layers = LayerSymbols::default();
    /// let formatter = BindingFormatter::new(&registry, &layers);
    ///
    /// let binding = Binding::new("&kp", vec![Param::str("A")]);
    /// assert_eq!(formatter.format(&binding), "&kp A");
    /// ```
    #[must_use]
    pub fn format(&self, binding: &Binding) -> String {
        self.try_format(binding).unwrap_or_else(|err| {
            warn!("Cannot format binding {binding}: {err}");
            error_token(binding, &err)
        })
    }

    /// Formats a binding, recording a failure in the report.
    pub fn format_reported(
        &self,
        binding: &Binding,
        report: &mut CompileReport,
        context: &str,
    ) -> String {
        match self.try_format(binding) {
            Ok(text) => text,
            Err(err) => {
                report.warn(err.kind(), context, format!("{binding}: {err}"));
                error_token(binding, &err)
            }
        }
    }

    /// Formats a behavior reference used as a child of another behavior.
    ///
    /// Hold-tap children are usually bare references (`&kp`); those render as
    /// the reference itself. Children with parameters format normally.
    pub fn format_reference(&self, binding: &Binding) -> Result<String, FormatError> {
        if binding.params.is_empty() && binding.value.starts_with(BEHAVIOR_SIGIL) {
            Ok(canonical_id(&binding.value).to_string())
        } else {
            self.try_format(binding)
        }
    }

    /// Formats a binding or explains why it cannot be formatted.
    pub fn try_format(&self, binding: &Binding) -> Result<String, FormatError> {
        let id = canonical_id(&binding.value);
        if id.is_empty() {
            return Err(FormatError::shape("binding has no behavior id"));
        }

        if let Some(kind) = builtin_kind(id) {
            let render = renderer_for(kind);
            return render(self, id, &binding.params);
        }
        if id == RAW_BEHAVIOR_ID {
            return Self::format_raw(&binding.params);
        }
        if id.starts_with(BEHAVIOR_SIGIL) {
            return self.format_custom(id, &binding.params);
        }

        Err(FormatError::UnknownBehavior(binding.value.clone()))
    }

    fn format_raw(params: &[Param]) -> Result<String, FormatError> {
        params
            .first()
            .and_then(Param::literal)
            .ok_or_else(|| FormatError::shape("raw binding needs a literal first parameter"))
    }

    /// Formats a call to a user-defined behavior.
    ///
    /// When the registry knows the behavior, extra parameters are dropped and
    /// missing ones are padded with `0` so the cell count matches its arity.
    fn format_custom(&self, id: &str, params: &[Param]) -> Result<String, FormatError> {
        let mut rendered = params
            .iter()
            .map(|param| self.format_key(param, 0))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(arity) = self.registry.lookup(id) {
            let arity = usize::from(arity);
            if rendered.len() > arity {
                debug!(
                    "{id} takes {arity} parameters, ignoring {} extra",
                    rendered.len() - arity
                );
                rendered.truncate(arity);
            } else if rendered.len() < arity {
                warn!(
                    "{id} takes {arity} parameters, padding {} missing with 0",
                    arity - rendered.len()
                );
                rendered.resize(arity, "0".to_string());
            }
        }

        if rendered.is_empty() {
            Ok(id.to_string())
        } else {
            Ok(format!("{id} {}", rendered.join(" ")))
        }
    }

    /// Formats a keycode parameter, expanding nested modifier functions.
    fn format_key(&self, param: &Param, depth: usize) -> Result<String, FormatError> {
        match param {
            Param::Int(n) => Ok(n.to_string()),
            Param::Str(name) if self.keycodes.is_modifier_function(name) => Err(
                FormatError::shape(format!("modifier function {name} is missing its argument")),
            ),
            Param::Str(name) => Ok(self.keycodes.resolve(name)),
            Param::Binding(nested) => self.format_modifier_call(nested, depth),
            Param::Invalid(raw) => Err(invalid_param(raw)),
        }
    }

    fn format_modifier_call(&self, nested: &Binding, depth: usize) -> Result<String, FormatError> {
        if depth >= MAX_MODIFIER_DEPTH {
            return Err(FormatError::TooDeep);
        }

        let Some(function) = self.keycodes.modifier_function(&nested.value) else {
            if nested.params.is_empty() {
                return Ok(self.keycodes.resolve(&nested.value));
            }
            return Err(FormatError::shape(format!(
                "'{}' is not a modifier function",
                nested.value
            )));
        };

        match nested.params.as_slice() {
            [child] => Ok(format!("{function}({})", self.format_key(child, depth + 1)?)),
            [] => Err(FormatError::shape(format!(
                "modifier function {function} is missing its argument"
            ))),
            extra => Err(FormatError::shape(format!(
                "modifier function {function} takes one argument, got {}",
                extra.len()
            ))),
        }
    }

    /// Formats a layer parameter: an index, a declared layer name, or a raw symbol.
    fn format_layer(&self, param: &Param) -> Result<String, FormatError> {
        match param {
            Param::Int(n) if *n >= 0 => Ok(n.to_string()),
            Param::Int(n) => Err(FormatError::shape(format!("layer index {n} is negative"))),
            Param::Str(name) => Ok(self
                .layers
                .define_for(name)
                .unwrap_or_else(|| name.clone())),
            Param::Binding(nested) => Err(FormatError::shape(format!(
                "layer parameter cannot be the nested binding '{}'",
                nested.value
            ))),
            Param::Invalid(raw) => Err(invalid_param(raw)),
        }
    }
}
