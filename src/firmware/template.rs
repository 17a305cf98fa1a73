//! Template rendering: stitches generated fragments into the final `.keymap`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use tracing::warn;

/// Keymap template used when no template file is configured.
pub const DEFAULT_KEYMAP_TEMPLATE: &str = include_str!("templates/default.keymap");

/// Matches `{{ name }}` placeholders.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("static regex")
});

/// Turns a template plus named fragments into output text.
pub trait TemplateRenderer {
    /// Renders `template`, substituting fragments by name.
    fn render(&self, template: &str, fragments: &BTreeMap<&str, &str>) -> String;
}

/// Plain `{{ name }}` substitution.
///
/// Unknown placeholders are left in place and logged.
///
/// # Examples
///
/// ```
/// use lazyzmk::firmware::template::{PlaceholderRenderer, TemplateRenderer};
/// use std::collections::BTreeMap;
///
/// let fragments = BTreeMap::from([("title", "Corne")]);
/// let text = PlaceholderRenderer.render("// {{ title }} / {{title}}", &fragments);
/// assert_eq!(text, "// Corne / Corne");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl TemplateRenderer for PlaceholderRenderer {
    fn render(&self, template: &str, fragments: &BTreeMap<&str, &str>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                let name = &caps[1];
                match fragments.get(name) {
                    Some(text) => (*text).to_string(),
                    None => {
                        warn!("Template placeholder '{name}' has no value");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_placeholder_is_kept() {
        let fragments = BTreeMap::from([("a", "1")]);
        assert_eq!(
            PlaceholderRenderer.render("{{ a }} {{ b }}", &fragments),
            "1 {{ b }}"
        );
    }

    #[test]
    fn test_fragment_text_is_not_rescanned() {
        let fragments = BTreeMap::from([("a", "{{ b }}"), ("b", "2")]);
        assert_eq!(PlaceholderRenderer.render("{{ a }}", &fragments), "{{ b }}");
    }

    #[test]
    fn test_default_template_placeholders() {
        let names: Vec<&str> = PLACEHOLDER
            .captures_iter(DEFAULT_KEYMAP_TEMPLATE)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();
        for expected in [
            "title",
            "keyboard",
            "layer_defines",
            "keymap",
            "behaviors",
            "macros",
            "combos",
            "input_listeners",
            "custom_devicetree",
            "custom_defined_behaviors",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }
}
