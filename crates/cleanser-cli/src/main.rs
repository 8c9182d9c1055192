//! Cleanser CLI - flag test and dummy entries in contact lists.

use cleanser_cli::commands;
use cleanser_cli::config::{load_config, override_path};
use cleanser_cli::logging::init_logging;
use cleanser_cli::{Cli, CliFormat, Command, Formatter};
use clap::Parser;
use std::io::IsTerminal;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> cleanser_cli::Result<()> {
    // Values from .env feed clap's env fallbacks, so load them first
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    override_path(&mut config.paths.log, cli.log_file.as_ref());

    let color_enabled = !cli.no_color && std::io::stdout().is_terminal();
    if !color_enabled {
        colored::control::set_override(false);
    }

    let _log_guard = init_logging(&config.paths.log, !cli.no_color)?;

    let formatter = Formatter::new(cli.format.unwrap_or(CliFormat::Table), color_enabled);
    let show_progress = !cli.quiet;

    match cli.command {
        Command::Analyze(args) => {
            commands::execute_analyze(args, config, &formatter, show_progress).await?;
        }
        Command::Clean(args) => {
            commands::execute_clean(args, config, &formatter)?;
        }
        Command::Run(args) => {
            commands::execute_run(args, config, &formatter, show_progress).await?;
        }
        Command::Init(args) => {
            commands::execute_init(args, config, &formatter)?;
        }
    }

    Ok(())
}
