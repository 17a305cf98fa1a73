//! Kconfig (`.conf`) generation from the document's build parameters.
//!
//! Each parameter is resolved to a Kconfig symbol, either directly when its
//! name is already a `CONFIG_*` flag or through the Kconfig map. The value is
//! then rendered according to the symbol's declared type. Every accepted line
//! is followed by a comment naming the parameter it came from.

use crate::firmware::report::{CompileReport, WarningKind};
use crate::models::{ConfigParameter, KconfigMap, KconfigType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parameter names that are already fully-qualified Kconfig flags.
static CONFIG_FLAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CONFIG_[A-Za-z0-9_]+$").expect("static regex"));

/// Result of a Kconfig generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KconfigOutput {
    /// `.conf` text: `NAME=value` lines, each followed by a traceability comment
    pub text: String,
    /// Every Kconfig symbol that was set, with its rendered value
    pub settings: BTreeMap<String, String>,
    /// Parameter names that produced no line
    pub skipped: Vec<String>,
}

/// Symbol a parameter resolved to.
struct Resolved<'m> {
    kconfig_name: String,
    kind: KconfigType,
    default: Option<&'m Value>,
    description: Option<&'m str>,
}

/// Renders build parameters into Kconfig lines.
#[derive(Debug, Clone, Copy)]
pub struct KconfigGenerator<'a> {
    map: &'a KconfigMap,
}

impl<'a> KconfigGenerator<'a> {
    /// Creates a generator over a Kconfig map.
    #[must_use]
    pub const fn new(map: &'a KconfigMap) -> Self {
        Self { map }
    }

    /// Renders all parameters in order. The first parameter to set a symbol wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazyzmk::firmware::report::CompileReport;
    /// use lazyzmk::firmware::KconfigGenerator;
    /// use lazyzmk::models::{ConfigParameter, KconfigMap};
    /// use serde_json::json;
    ///
    /// let map = KconfigMap::new();
    /// let params = vec![ConfigParameter {
    ///     param_name: "CONFIG_ZMK_SLEEP".to_string(),
    ///     value: json!("y"),
    ///     description: None,
    /// }];
    ///
    /// let mut report = CompileReport::new();
    /// let output = KconfigGenerator::new(&map).generate(&params, &mut report);
    /// assert!(output.text.starts_with("CONFIG_ZMK_SLEEP=y\n"));
    /// ```
    pub fn generate(&self, params: &[ConfigParameter], report: &mut CompileReport) -> KconfigOutput {
        let mut output = KconfigOutput::default();

        for param in params {
            let name = param.param_name.trim();
            let context = format!("config parameter {name}");

            let Some(resolved) = self.resolve(name) else {
                report.warn(
                    WarningKind::ConfigMappingMiss,
                    context,
                    "no Kconfig mapping for this parameter",
                );
                output.skipped.push(name.to_string());
                continue;
            };

            if output.settings.contains_key(&resolved.kconfig_name) {
                report.warn(
                    WarningKind::SkippedEntry,
                    context,
                    format!("{} is already set by an earlier parameter", resolved.kconfig_name),
                );
                output.skipped.push(name.to_string());
                continue;
            }

            let raw = match effective_value(&param.value, resolved.default) {
                Ok(raw) => raw,
                Err(reason) => {
                    report.warn(WarningKind::SkippedEntry, context, reason);
                    output.skipped.push(name.to_string());
                    continue;
                }
            };

            if let KconfigType::Unknown(Some(type_name)) = &resolved.kind {
                report.warn(
                    WarningKind::InvalidParameterShape,
                    context.as_str(),
                    format!("unknown Kconfig type '{type_name}', passing the value through"),
                );
            }

            let value = match render_value(&resolved.kind, &raw) {
                Ok(value) => value,
                Err(reason) => {
                    report.warn(WarningKind::SkippedEntry, context, reason);
                    output.skipped.push(name.to_string());
                    continue;
                }
            };

            output
                .text
                .push_str(&format!("{}={value}\n", resolved.kconfig_name));
            let description = param.description.as_deref().or(resolved.description);
            match description.map(str::trim).filter(|d| !d.is_empty()) {
                Some(description) => output.text.push_str(&format!(
                    "# from config parameter '{name}': {}\n",
                    description.replace('\n', " ")
                )),
                None => output
                    .text
                    .push_str(&format!("# from config parameter '{name}'\n")),
            }
            output.settings.insert(resolved.kconfig_name, value);
        }

        output
    }

    fn resolve(&self, name: &str) -> Option<Resolved<'a>> {
        if CONFIG_FLAG.is_match(name) {
            return Some(Resolved {
                kconfig_name: name.to_string(),
                kind: KconfigType::Unknown(None),
                default: None,
                description: None,
            });
        }

        let entry = self.map.get(name)?;
        Some(Resolved {
            kconfig_name: entry.kconfig_name.trim().to_string(),
            kind: entry.kconfig_type(),
            default: entry.default.as_ref(),
            description: entry.description.as_deref(),
        })
    }
}

/// Stringifies the parameter value, falling back to the map default for `null`.
fn effective_value(value: &Value, default: Option<&Value>) -> Result<String, String> {
    let value = match (value, default) {
        (Value::Null, Some(default)) if !default.is_null() => default,
        (Value::Null, _) => return Err("no value and no default".to_string()),
        (value, _) => value,
    };

    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Bool(flag) => Ok(if *flag { "y" } else { "n" }.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(format!("unsupported value {other}")),
    }
}

/// Renders a raw value for a Kconfig type.
fn render_value(kind: &KconfigType, raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    match kind {
        KconfigType::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "y" | "true" | "1" => Ok("y".to_string()),
            "n" | "false" | "0" => Ok("n".to_string()),
            _ => Err(format!("'{raw}' is not a boolean")),
        },
        KconfigType::Int => {
            if let Some(hex) = trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                return i64::from_str_radix(hex, 16)
                    .map(|_| trimmed.to_string())
                    .map_err(|_| format!("'{raw}' is not a number"));
            }
            match trimmed.parse::<f64>() {
                Ok(number) if number.is_finite() => {
                    let whole = number.trunc();
                    if whole >= i64::MIN as f64 && whole < i64::MAX as f64 {
                        Ok(format!("{}", whole as i64))
                    } else {
                        Err(format!("'{raw}' does not fit a 64-bit integer"))
                    }
                }
                _ => Err(format!("'{raw}' is not a number")),
            }
        }
        KconfigType::String => Ok(format!(
            "\"{}\"",
            raw.replace('\\', "\\\\").replace('"', "\\\"")
        )),
        KconfigType::Unknown(_) => Ok(trimmed.to_string()),
    }
}
