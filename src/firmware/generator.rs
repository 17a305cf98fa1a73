//! Compile pipeline: document + layout table + Kconfig map → output fragments.

use crate::error::{CompileError, Result};
use crate::firmware::formatter::BindingFormatter;
use crate::firmware::kconfig::{KconfigGenerator, KconfigOutput};
use crate::firmware::layers::LayerSymbols;
use crate::firmware::registry::BehaviorRegistry;
use crate::firmware::report::{CompileReport, WarningKind};
use crate::firmware::sections;
use crate::firmware::template::TemplateRenderer;
use crate::firmware::validator::FirmwareValidator;
use crate::models::{KconfigMap, KeymapDocument, LayoutTable};
use std::collections::BTreeMap;
use tracing::debug;

/// Everything one compile run produces.
#[derive(Debug, Clone)]
pub struct CompiledKeymap {
    /// Keyboard name (document, else layout table)
    pub keyboard: String,
    /// Layout title (document, else keyboard name)
    pub title: String,
    /// `#define LAYER_*` lines
    pub layer_defines: String,
    /// `keymap` node
    pub keymap: String,
    /// Hold-tap `behaviors` node (empty when there are none)
    pub behaviors: String,
    /// `macros` node (empty when there are none)
    pub macros: String,
    /// `combos` node (empty when there are none)
    pub combos: String,
    /// Input listener overrides (empty when there are none)
    pub input_listeners: String,
    /// Verbatim devicetree from the document
    pub custom_devicetree: String,
    /// Verbatim behavior definitions from the document
    pub custom_defined_behaviors: String,
    /// Kconfig text and the symbols it sets
    pub kconfig: KconfigOutput,
    /// Recoverable problems found while compiling
    pub report: CompileReport,
}

impl CompiledKeymap {
    /// Fragments by template placeholder name.
    #[must_use]
    pub fn fragments(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("keyboard", self.keyboard.as_str()),
            ("title", self.title.as_str()),
            ("layer_defines", self.layer_defines.as_str()),
            ("keymap", self.keymap.as_str()),
            ("behaviors", self.behaviors.as_str()),
            ("macros", self.macros.as_str()),
            ("combos", self.combos.as_str()),
            ("input_listeners", self.input_listeners.as_str()),
            ("custom_devicetree", self.custom_devicetree.as_str()),
            ("custom_defined_behaviors", self.custom_defined_behaviors.as_str()),
            ("kconfig", self.kconfig.text.as_str()),
        ])
    }

    /// Renders the final keymap file from a template.
    pub fn render_keymap(&self, template: &str, renderer: &impl TemplateRenderer) -> String {
        renderer.render(template, &self.fragments())
    }
}

/// Compiles one keymap document.
pub struct FirmwareGenerator<'a> {
    document: &'a KeymapDocument,
    table: &'a LayoutTable,
    kconfig_map: &'a KconfigMap,
}

impl<'a> FirmwareGenerator<'a> {
    /// Creates a generator over already-loaded inputs.
    #[must_use]
    pub const fn new(
        document: &'a KeymapDocument,
        table: &'a LayoutTable,
        kconfig_map: &'a KconfigMap,
    ) -> Self {
        Self {
            document,
            table,
            kconfig_map,
        }
    }

    /// Runs the whole pipeline.
    ///
    /// Fails only on structurally unusable input (see [`FirmwareValidator`]);
    /// everything else is recovered and recorded in the returned report.
    pub fn generate(&self) -> Result<CompiledKeymap> {
        let document = self.document;
        let table = self.table;

        let validation = FirmwareValidator::new(document, table).validate();
        if !validation.is_valid() {
            let reasons: Vec<String> = validation.errors.iter().map(ToString::to_string).collect();
            return Err(CompileError::malformed(reasons.join("; ")));
        }

        let mut report = CompileReport::new();
        for warning in &validation.warnings {
            report.warn(WarningKind::SkippedEntry, "layout", warning.message.as_str());
        }
        for entry in &document.rejected {
            report.warn(WarningKind::SkippedEntry, entry.to_string(), entry.message.as_str());
        }

        let names: Vec<String> = (0..document.layers.len())
            .map(|idx| {
                document
                    .layer_names
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("Layer {idx}"))
            })
            .collect();
        let layers = LayerSymbols::build(&names, &mut report);
        debug!("Resolved {} layer symbols", layers.len());

        let mut registry = BehaviorRegistry::with_builtins();
        let hold_taps = sections::declare_hold_taps(&document.hold_taps, &mut registry, &mut report);
        let macros = sections::declare_macros(&document.macros, &mut registry, &mut report);
        debug!(
            "Registered {} hold-taps and {} macros ({} behaviors known)",
            hold_taps.len(),
            macros.len(),
            registry.len()
        );

        let formatter = BindingFormatter::new(&registry, &layers);

        let keymap =
            sections::generate_keymap_node(&document.layers, &layers, table, &formatter, &mut report);
        let behaviors =
            sections::generate_behaviors_node(&hold_taps, table.total_keys, &formatter, &mut report);
        let macros_node = sections::generate_macros_node(&macros, &formatter, &mut report);
        let combos = sections::generate_combos_node(
            &document.combos,
            &layers,
            table,
            &formatter,
            &mut report,
        );
        let input_listeners =
            sections::generate_input_listeners_node(&document.input_listeners, &layers);
        let kconfig =
            KconfigGenerator::new(self.kconfig_map).generate(&document.config_parameters, &mut report);
        debug!(
            "Generated {} Kconfig settings with {} warnings",
            kconfig.settings.len(),
            report.warnings.len()
        );

        let keyboard = document
            .keyboard
            .clone()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| table.keyboard_name.clone());
        let title = document
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| keyboard.clone());

        Ok(CompiledKeymap {
            keyboard,
            title,
            layer_defines: layers.generate_defines(),
            keymap,
            behaviors,
            macros: macros_node,
            combos,
            input_listeners,
            custom_devicetree: document.custom_devicetree.clone(),
            custom_defined_behaviors: document.custom_defined_behaviors.clone(),
            kconfig,
            report,
        })
    }
}
