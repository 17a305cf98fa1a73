//! `macros` node holding user-defined macros.

use super::{comment_lines, indent, wrap_root};
use crate::firmware::behaviors::{behavior_label, behavior_ref};
use crate::firmware::formatter::BindingFormatter;
use crate::firmware::registry::{BehaviorOrigin, BehaviorRegistry, Registration};
use crate::firmware::report::{CompileReport, WarningKind};
use crate::models::Macro;

/// Devicetree compatible string for a macro arity.
fn compatible_for(arity: u8) -> &'static str {
    match arity {
        0 => "zmk,behavior-macro",
        1 => "zmk,behavior-macro-one-param",
        _ => "zmk,behavior-macro-two-param",
    }
}

/// A macro accepted for emission, with its resolved arity.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredMacro<'d> {
    /// Source macro
    pub source: &'d Macro,
    /// Parameter arity (0, 1 or 2)
    pub arity: u8,
}

/// Validates macros and registers them with their parameter arity.
///
/// Macros with more than two parameters, an empty name, or a name that is
/// already taken are skipped with a warning.
pub fn declare_macros<'d>(
    macros: &'d [Macro],
    registry: &mut BehaviorRegistry,
    report: &mut CompileReport,
) -> Vec<DeclaredMacro<'d>> {
    let mut accepted = Vec::with_capacity(macros.len());

    for source in macros {
        let context = format!("macro {}", source.name);
        if behavior_label(source.name.trim()).is_empty() {
            report.warn(WarningKind::SkippedEntry, context, "macro has no name");
            continue;
        }
        let arity = match u8::try_from(source.arity()) {
            Ok(arity) if arity <= 2 => arity,
            _ => {
                report.warn(
                    WarningKind::SkippedEntry,
                    context,
                    format!(
                        "macros take at most 2 parameters, this one declares {}",
                        source.arity()
                    ),
                );
                continue;
            }
        };

        match registry.register(
            &behavior_ref(source.name.trim()),
            arity,
            BehaviorOrigin::UserMacro,
        ) {
            Registration::Added => accepted.push(DeclaredMacro { source, arity }),
            Registration::AlreadyPresent => report.warn(
                WarningKind::SkippedEntry,
                context,
                "a behavior with this name is already defined",
            ),
            Registration::Conflict { existing } => report.warn(
                WarningKind::RegistryConflict,
                context,
                format!(
                    "already registered with {} parameters ({:?}), keeping the first definition",
                    existing.arity, existing.origin
                ),
            ),
        }
    }

    accepted
}

/// Renders the `macros` node.
pub fn generate_macros_node(
    macros: &[DeclaredMacro<'_>],
    formatter: &BindingFormatter<'_>,
    report: &mut CompileReport,
) -> String {
    if macros.is_empty() {
        return String::new();
    }

    let mut body = format!("{}macros {{\n", indent(1));
    for (idx, declared) in macros.iter().enumerate() {
        if idx > 0 {
            body.push('\n');
        }
        body.push_str(&render_macro(declared, formatter, report));
    }
    body.push_str(&format!("{}}};\n", indent(1)));
    wrap_root(&body)
}

fn render_macro(
    declared: &DeclaredMacro<'_>,
    formatter: &BindingFormatter<'_>,
    report: &mut CompileReport,
) -> String {
    let source = declared.source;
    let label = behavior_label(source.name.trim());
    let context = format!("macro {label}");
    let pad = indent(3);

    let mut node = comment_lines(source.description.as_deref(), 2);
    node.push_str(&format!("{}{label}: {label} {{\n", indent(2)));
    node.push_str(&format!("{pad}label = \"{}\";\n", label.to_uppercase()));
    node.push_str(&format!(
        "{pad}compatible = \"{}\";\n",
        compatible_for(declared.arity)
    ));
    node.push_str(&format!("{pad}#binding-cells = <{}>;\n", declared.arity));
    if let Some(ms) = source.wait_ms {
        node.push_str(&format!("{pad}wait-ms = <{ms}>;\n"));
    }
    if let Some(ms) = source.tap_ms {
        node.push_str(&format!("{pad}tap-ms = <{ms}>;\n"));
    }

    if source.bindings.is_empty() {
        node.push_str(&format!("{pad}bindings = <>;\n"));
    } else {
        node.push_str(&format!("{pad}bindings\n"));
        let inner = indent(4);
        for (idx, binding) in source.bindings.iter().enumerate() {
            let text =
                formatter.format_reported(binding, report, &format!("{context}, step {idx}"));
            let lead = if idx == 0 { '=' } else { ',' };
            node.push_str(&format!("{inner}{lead} <{text}>\n"));
        }
        node.push_str(&format!("{inner};\n"));
    }

    node.push_str(&format!("{}}};\n", indent(2)));
    node
}
