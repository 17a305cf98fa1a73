//! `behaviors` node holding user-defined hold-taps.

use super::{cell_list, comment_lines, indent, split_positions, wrap_root};
use crate::firmware::behaviors::{behavior_label, behavior_ref};
use crate::firmware::formatter::{error_token, BindingFormatter};
use crate::firmware::registry::{BehaviorOrigin, BehaviorRegistry, Registration};
use crate::firmware::report::{CompileReport, WarningKind};
use crate::models::{Binding, HoldTap};

/// Validates hold-taps and registers them with arity 2.
///
/// Returns the hold-taps that will be emitted. A hold-tap is dropped when it
/// does not have exactly two bindings, has an empty name, or its name is
/// already taken.
pub fn declare_hold_taps<'d>(
    hold_taps: &'d [HoldTap],
    registry: &mut BehaviorRegistry,
    report: &mut CompileReport,
) -> Vec<&'d HoldTap> {
    let mut accepted = Vec::with_capacity(hold_taps.len());

    for hold_tap in hold_taps {
        let context = format!("hold-tap {}", hold_tap.name);
        if behavior_label(hold_tap.name.trim()).is_empty() {
            report.warn(WarningKind::SkippedEntry, context, "hold-tap has no name");
            continue;
        }
        if hold_tap.bindings.len() != 2 {
            report.warn(
                WarningKind::SkippedEntry,
                context,
                format!(
                    "hold-tap needs exactly 2 bindings (hold, tap), got {}",
                    hold_tap.bindings.len()
                ),
            );
            continue;
        }

        match registry.register(
            &behavior_ref(hold_tap.name.trim()),
            2,
            BehaviorOrigin::UserHoldTap,
        ) {
            Registration::Added => accepted.push(hold_tap),
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

/// Renders the `behaviors` node for the accepted hold-taps.
pub fn generate_behaviors_node(
    hold_taps: &[&HoldTap],
    total_keys: usize,
    formatter: &BindingFormatter<'_>,
    report: &mut CompileReport,
) -> String {
    if hold_taps.is_empty() {
        return String::new();
    }

    let mut body = format!("{}behaviors {{\n", indent(1));
    for (idx, hold_tap) in hold_taps.iter().enumerate() {
        if idx > 0 {
            body.push('\n');
        }
        body.push_str(&render_hold_tap(hold_tap, total_keys, formatter, report));
    }
    body.push_str(&format!("{}}};\n", indent(1)));
    wrap_root(&body)
}

fn render_hold_tap(
    hold_tap: &HoldTap,
    total_keys: usize,
    formatter: &BindingFormatter<'_>,
    report: &mut CompileReport,
) -> String {
    let label = behavior_label(hold_tap.name.trim());
    let context = format!("hold-tap {label}");
    let pad = indent(3);

    let mut node = format!("{}{label}: {label} {{\n", indent(2));
    node.push_str(&comment_lines(hold_tap.description.as_deref(), 3));
    node.push_str(&format!("{pad}compatible = \"zmk,behavior-hold-tap\";\n"));
    node.push_str(&format!("{pad}#binding-cells = <2>;\n"));

    if let Some(ms) = hold_tap.tapping_term_ms {
        node.push_str(&format!("{pad}tapping-term-ms = <{ms}>;\n"));
    }
    if let Some(ms) = hold_tap.quick_tap_ms {
        node.push_str(&format!("{pad}quick-tap-ms = <{ms}>;\n"));
    }
    if let Some(ms) = hold_tap.require_prior_idle_ms {
        node.push_str(&format!("{pad}require-prior-idle-ms = <{ms}>;\n"));
    }
    if let Some(flavor) = hold_tap.flavor {
        match flavor.as_str() {
            Some(name) => node.push_str(&format!("{pad}flavor = \"{name}\";\n")),
            None => report.warn(
                WarningKind::SkippedEntry,
                context.as_str(),
                "unknown flavor, leaving the firmware default",
            ),
        }
    }

    let children: Vec<String> = hold_tap
        .bindings
        .iter()
        .map(|child| format!("<{}>", render_child(child, formatter, report, &context)))
        .collect();
    node.push_str(&format!("{pad}bindings = {};\n", children.join(", ")));

    if let Some(positions) = &hold_tap.hold_trigger_key_positions {
        let (valid, invalid) = split_positions(positions, total_keys);
        if !invalid.is_empty() {
            report.warn(
                WarningKind::UnresolvedReference,
                context.as_str(),
                format!("hold-trigger key positions {invalid:?} are outside 0..{total_keys}"),
            );
        }
        if !valid.is_empty() {
            node.push_str(&format!(
                "{pad}hold-trigger-key-positions = <{}>;\n",
                cell_list(&valid)
            ));
        }
    }
    if hold_tap.hold_trigger_on_release == Some(true) {
        node.push_str(&format!("{pad}hold-trigger-on-release;\n"));
    }
    if hold_tap.retro_tap == Some(true) {
        node.push_str(&format!("{pad}retro-tap;\n"));
    }

    node.push_str(&format!("{}}};\n", indent(2)));
    node
}

fn render_child(
    child: &Binding,
    formatter: &BindingFormatter<'_>,
    report: &mut CompileReport,
    context: &str,
) -> String {
    match formatter.format_reference(child) {
        Ok(text) => text,
        Err(err) => {
            report.warn(
                WarningKind::UnresolvedReference,
                context,
                format!("child binding {child}: {err}"),
            );
            error_token(child, &err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::layers::LayerSymbols;
    use crate::models::HoldTapFlavor;

    fn hold_tap(name: &str, children: &[&str]) -> HoldTap {
        HoldTap {
            name: name.to_string(),
            description: None,
            bindings: children.iter().map(|c| Binding::bare(*c)).collect(),
            flavor: None,
            tapping_term_ms: None,
            quick_tap_ms: None,
            require_prior_idle_ms: None,
            hold_trigger_on_release: None,
            hold_trigger_key_positions: None,
            retro_tap: None,
        }
    }

    #[test]
    fn test_full_hold_tap_node() {
        let mut registry = BehaviorRegistry::with_builtins();
        let mut report = CompileReport::new();
        let mut ht = hold_tap("&hm_l", &["&kp", "&kp"]);
        ht.description = Some("Left home row".to_string());
        ht.flavor = Some(HoldTapFlavor::Balanced);
        ht.tapping_term_ms = Some(200);
        ht.quick_tap_ms = Some(150);
        ht.require_prior_idle_ms = Some(100);
        ht.hold_trigger_key_positions = Some(vec![5, 6]);
        ht.hold_trigger_on_release = Some(true);
        ht.retro_tap = Some(false);
        let hold_taps = vec![ht];

        let accepted = declare_hold_taps(&hold_taps, &mut registry, &mut report);
        assert_eq!(registry.lookup("&hm_l"), Some(2));

        let symbols = LayerSymbols::default();
        let formatter = BindingFormatter::new(&registry, &symbols);
        let node = generate_behaviors_node(&accepted, 10, &formatter, &mut report);

        let expected = "\
/ {
    behaviors {
        hm_l: hm_l {
            // Left home row
            compatible = \"zmk,behavior-hold-tap\";
            #binding-cells = <2>;
            tapping-term-ms = <200>;
            quick-tap-ms = <150>;
            require-prior-idle-ms = <100>;
            flavor = \"balanced\";
            bindings = <&kp>, <&kp>;
            hold-trigger-key-positions = <5 6>;
            hold-trigger-on-release;
        };
    };
};
";
        assert_eq!(node, expected);
        assert!(report.is_clean());
    }

    #[test]
    fn test_wrong_child_count_is_skipped() {
        let mut registry = BehaviorRegistry::with_builtins();
        let mut report = CompileReport::new();
        let hold_taps = vec![hold_tap("bad", &["&kp"]), hold_tap("good", &["&mo", "&kp"])];

        let accepted = declare_hold_taps(&hold_taps, &mut registry, &mut report);

        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].name, "good");
        assert_eq!(registry.lookup("&bad"), None);
        assert_eq!(report.count(WarningKind::SkippedEntry), 1);
    }

    #[test]
    fn test_conflicting_name_is_reported() {
        let mut registry = BehaviorRegistry::with_builtins();
        let mut report = CompileReport::new();
        let hold_taps = vec![hold_tap("kp", &["&kp", "&kp"])];

        let accepted = declare_hold_taps(&hold_taps, &mut registry, &mut report);

        assert!(accepted.is_empty());
        assert_eq!(registry.lookup("&kp"), Some(1));
        assert_eq!(report.count(WarningKind::RegistryConflict), 1);
    }

    #[test]
    fn test_duplicate_hold_tap_keeps_first() {
        let mut registry = BehaviorRegistry::with_builtins();
        let mut report = CompileReport::new();
        let hold_taps = vec![hold_tap("hm", &["&kp", "&kp"]), hold_tap("hm", &["&mo", "&kp"])];

        let accepted = declare_hold_taps(&hold_taps, &mut registry, &mut report);

        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].bindings[0].value, "&kp");
        assert_eq!(report.count(WarningKind::SkippedEntry), 1);
    }

    #[test]
    fn test_bad_child_and_out_of_range_positions() {
        let mut registry = BehaviorRegistry::with_builtins();
        let mut report = CompileReport::new();
        let mut ht = hold_tap("odd", &["kp", "&kp"]);
        ht.hold_trigger_key_positions = Some(vec![1, 40, -1]);
        ht.flavor = Some(HoldTapFlavor::Unrecognized);
        let hold_taps = vec![ht];

        let accepted = declare_hold_taps(&hold_taps, &mut registry, &mut report);
        let symbols = LayerSymbols::default();
        let formatter = BindingFormatter::new(&registry, &symbols);
        let node = generate_behaviors_node(&accepted, 4, &formatter, &mut report);

        assert!(node.contains("bindings = <&error /*"));
        assert!(node.contains("hold-trigger-key-positions = <1>;"));
        assert!(!node.contains("flavor"));
        assert_eq!(report.count(WarningKind::UnresolvedReference), 2);
        assert_eq!(report.count(WarningKind::SkippedEntry), 1);
    }

    #[test]
    fn test_empty_section() {
        let registry = BehaviorRegistry::with_builtins();
        let symbols = LayerSymbols::default();
        let formatter = BindingFormatter::new(&registry, &symbols);
        let mut report = CompileReport::new();
        assert_eq!(generate_behaviors_node(&[], 4, &formatter, &mut report), "");
    }
}
