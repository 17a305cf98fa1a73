//! LazyZMK - ZMK keymap compiler
//!
//! Turns a JSON keyboard layout document into a ZMK `.keymap` file and a
//! Kconfig `.conf` fragment.

use clap::{Parser, Subcommand};
use lazyzmk::cli::{CliResult, GenerateArgs, ValidateArgs};
use lazyzmk::constants::APP_BINARY_NAME;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// LazyZMK - compile JSON keyboard layouts into ZMK keymaps
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate `.keymap` and `.conf` files
    Generate(GenerateArgs),
    /// Check a keymap document without writing files
    Validate(ValidateArgs),
}

fn run(command: &Commands) -> CliResult<()> {
    match command {
        Commands::Generate(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; warnings are also printed from the compile report
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(&cli.command) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code.code());
    }
}
