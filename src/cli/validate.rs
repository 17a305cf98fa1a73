//! Validation command: compiles without writing and reports problems.

use crate::cli::common::{CliError, CliResult, ValidationMessage, ValidationResponse};
use crate::cli::generate::{load_inputs, resolve_inputs};
use crate::config::Config;
use crate::firmware::generator::FirmwareGenerator;
use clap::Args;
use std::path::PathBuf;

/// Validate a keymap document against a layout table
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to keymap document (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub keymap: PathBuf,

    /// Path to layout table (JSON/JSON5), defaults to the configured one
    #[arg(short, long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Path to Kconfig map (JSON), defaults to the configured one
    #[arg(long, value_name = "FILE")]
    pub kconfig_map: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().unwrap_or_default();
        let inputs = resolve_inputs(self.layout.as_deref(), self.kconfig_map.as_deref(), &config)?;

        let (document, table, kconfig_map) = load_inputs(&self.keymap, &inputs)?;

        let response = match FirmwareGenerator::new(&document, &table, &kconfig_map).generate() {
            Ok(compiled) => ValidationResponse {
                valid: true,
                errors: compiled
                    .report
                    .warnings
                    .iter()
                    .map(|warning| ValidationMessage {
                        severity: "warning".to_string(),
                        kind: serde_json::to_value(warning.kind)
                            .ok()
                            .and_then(|v| v.as_str().map(String::from)),
                        context: Some(warning.context.clone()),
                        message: warning.message.clone(),
                    })
                    .collect(),
                kconfig_settings: compiled.kconfig.settings.len(),
            },
            Err(err) => ValidationResponse {
                valid: false,
                errors: vec![ValidationMessage {
                    severity: "error".to_string(),
                    kind: None,
                    context: None,
                    message: err.to_string(),
                }],
                kconfig_settings: 0,
            },
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            if response.valid {
                println!("✓ Validation passed");
            } else {
                println!("✗ Validation failed");
            }
            println!("  Kconfig settings: {}", response.kconfig_settings);

            if !response.errors.is_empty() {
                println!("\nIssues:");
                for msg in &response.errors {
                    let prefix = if msg.severity == "error" {
                        "  ✗"
                    } else {
                        "  ⚠"
                    };
                    match &msg.context {
                        Some(context) => println!("{prefix} [{context}] {}", msg.message),
                        None => println!("{prefix} {}", msg.message),
                    }
                }
            }
        }

        if !response.valid {
            return Err(CliError::validation("Validation failed"));
        }
        if self.strict && !response.errors.is_empty() {
            return Err(CliError::validation("Warnings found in strict mode"));
        }

        Ok(())
    }
}
