//! Generate command: writes `<name>.keymap` and `<name>.conf`.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::constants::{KCONFIG_EXTENSION, KEYMAP_EXTENSION};
use crate::firmware::generator::FirmwareGenerator;
use crate::firmware::template::{PlaceholderRenderer, DEFAULT_KEYMAP_TEMPLATE};
use crate::models::{KconfigMap, KeymapDocument, LayoutTable};
use crate::parser;
use clap::Args;
use std::path::{Path, PathBuf};

/// Generate a ZMK keymap and Kconfig fragment from a keymap document
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Path to keymap document (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub keymap: PathBuf,

    /// Path to layout table (JSON/JSON5), defaults to the configured one
    #[arg(short, long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Path to Kconfig map (JSON), defaults to the configured one
    #[arg(long, value_name = "FILE")]
    pub kconfig_map: Option<PathBuf>,

    /// Keymap template, defaults to the configured one or the built-in template
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Output directory, defaults to the configured build directory
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Output file name without extension (defaults to the keymap file name)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Fail if generation produced warnings
    #[arg(long)]
    pub strict: bool,
}

/// Inputs resolved from arguments and configuration.
#[derive(Debug)]
pub(crate) struct ResolvedInputs {
    pub layout: PathBuf,
    pub kconfig_map: Option<PathBuf>,
}

/// Fills in paths the user did not pass from the config file.
pub(crate) fn resolve_inputs(
    layout: Option<&Path>,
    kconfig_map: Option<&Path>,
    config: &Config,
) -> CliResult<ResolvedInputs> {
    let layout = layout
        .map(Path::to_path_buf)
        .or_else(|| config.paths.layout_table.clone())
        .ok_or_else(|| {
            CliError::validation(
                "No layout table given. Use --layout or set paths.layout_table in config.toml",
            )
        })?;
    let kconfig_map = kconfig_map
        .map(Path::to_path_buf)
        .or_else(|| config.paths.kconfig_map.clone());

    Ok(ResolvedInputs {
        layout,
        kconfig_map,
    })
}

/// Loads the Kconfig map, or an empty one when none is configured.
pub(crate) fn load_kconfig_map(path: Option<&Path>) -> CliResult<KconfigMap> {
    match path {
        Some(path) => parser::load_kconfig_map(path)
            .map_err(|e| CliError::load("Kconfig map", path, &e)),
        None => Ok(KconfigMap::new()),
    }
}

/// Loads the keymap document, layout table and Kconfig map.
pub(crate) fn load_inputs(
    keymap: &Path,
    inputs: &ResolvedInputs,
) -> CliResult<(KeymapDocument, LayoutTable, KconfigMap)> {
    let document = parser::load_keymap_document(keymap)
        .map_err(|e| CliError::load("keymap document", keymap, &e))?;
    let table = parser::load_layout_table(&inputs.layout)
        .map_err(|e| CliError::load("layout table", &inputs.layout, &e))?;
    let kconfig_map = load_kconfig_map(inputs.kconfig_map.as_deref())?;
    Ok((document, table, kconfig_map))
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().unwrap_or_default();
        let inputs = resolve_inputs(self.layout.as_deref(), self.kconfig_map.as_deref(), &config)?;
        let (document, table, kconfig_map) = load_inputs(&self.keymap, &inputs)?;

        let template = match self.template.as_ref().or(config.paths.template.as_ref()) {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                CliError::io(format!("Failed to read template {}: {e}", path.display()))
            })?,
            None => DEFAULT_KEYMAP_TEMPLATE.to_string(),
        };

        let compiled = FirmwareGenerator::new(&document, &table, &kconfig_map)
            .generate()
            .map_err(|e| CliError::validation(format!("Generation failed: {e}")))?;

        let out_dir = self
            .out_dir
            .clone()
            .unwrap_or_else(|| config.build.output_dir.clone());
        std::fs::create_dir_all(&out_dir)
            .map_err(|e| CliError::io(format!("Failed to create output directory: {e}")))?;

        let name = self.name.clone().unwrap_or_else(|| {
            self.keymap
                .file_stem()
                .map_or_else(|| "keymap".to_string(), |s| s.to_string_lossy().into_owned())
        });
        let keymap_file = format!("{name}.{KEYMAP_EXTENSION}");
        let conf_file = format!("{name}.{KCONFIG_EXTENSION}");

        let keymap_text = compiled.render_keymap(&template, &PlaceholderRenderer);
        std::fs::write(out_dir.join(&keymap_file), keymap_text)
            .map_err(|e| CliError::io(format!("Failed to write {keymap_file}: {e}")))?;
        std::fs::write(out_dir.join(&conf_file), &compiled.kconfig.text)
            .map_err(|e| CliError::io(format!("Failed to write {conf_file}: {e}")))?;

        println!("✓ Generated {keymap_file} and {conf_file}");
        println!("  Output: {}", out_dir.display());

        if !compiled.report.is_clean() {
            println!();
            print!("{}", compiled.report.format_message());
            if self.strict {
                return Err(CliError::validation("Warnings found in strict mode"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_inputs_prefers_arguments() {
        let mut config = Config::new();
        config.paths.layout_table = Some(PathBuf::from("/configured/layout.json"));
        config.paths.kconfig_map = Some(PathBuf::from("/configured/kconfig.json"));

        let inputs = resolve_inputs(Some(Path::new("given.json")), None, &config).unwrap();
        assert_eq!(inputs.layout, PathBuf::from("given.json"));
        assert_eq!(
            inputs.kconfig_map,
            Some(PathBuf::from("/configured/kconfig.json"))
        );
    }

    #[test]
    fn test_resolve_inputs_requires_layout() {
        let err = resolve_inputs(None, None, &Config::new()).unwrap_err();
        assert_eq!(err.exit_code, crate::cli::common::ExitCode::Validation);
    }

    #[test]
    fn test_missing_kconfig_map_is_empty() {
        assert!(load_kconfig_map(None).unwrap().is_empty());
        let err = load_kconfig_map(Some(Path::new("/nonexistent/map.json"))).unwrap_err();
        assert_eq!(err.exit_code, crate::cli::common::ExitCode::Io);
    }

    #[test]
    fn test_unparsable_input_is_validation_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let keymap = temp_dir.path().join("broken.json");
        let layout = temp_dir.path().join("layout.json");
        std::fs::write(&keymap, "{ not json").unwrap();
        std::fs::write(&layout, r#"{"keyboardName": "k", "totalKeys": 1, "rows": [[0]]}"#).unwrap();

        let inputs = ResolvedInputs {
            layout,
            kconfig_map: None,
        };
        let err = load_inputs(&keymap, &inputs).unwrap_err();
        assert_eq!(err.exit_code, crate::cli::common::ExitCode::Validation);
        assert!(err.message.contains("keymap document"));
    }
}
