//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Cleanser CLI - Flag test and dummy entries in contact lists with an LLM.
#[derive(Debug, Parser)]
#[command(name = "cleanser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML); defaults to ./cleanser.toml when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file (overrides paths.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Hide the progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Summary plus a table of failed chunks (default)
    Table,
    /// JSON document
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every contact and write the analyzed CSV
    Analyze(AnalyzeArgs),

    /// Keep only contacts flagged genuine from an analyzed CSV
    Clean(CleanArgs),

    /// Analyze, then clean, with the same configuration
    Run(RunArgs),

    /// Create the input, output and prompt directories and a default template
    Init(InitArgs),
}

/// Model and batching options shared by `analyze` and `run`.
///
/// Each option may also come from the environment (or a `.env` file).
#[derive(Debug, Clone, Default, Args)]
pub struct ModelArgs {
    /// Contacts per model request
    #[arg(long, env = "CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Model name
    #[arg(short, long, env = "MODEL_NAME")]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(short, long, env = "TEMPERATURE")]
    pub temperature: Option<f64>,

    /// Ollama endpoint
    #[arg(short, long, env = "OLLAMA_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Timeout per model call in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the analyze command.
#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Input contacts CSV
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Analyzed output CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Prompt template (YAML or TOML)
    #[arg(short, long)]
    pub prompt: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the clean command.
#[derive(Debug, Clone, Args)]
pub struct CleanArgs {
    /// Analyzed CSV to read
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Cleaned CSV to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the run command.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Input contacts CSV
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Analyzed output CSV
    #[arg(short, long)]
    pub analyzed: Option<PathBuf>,

    /// Cleaned output CSV
    #[arg(short = 'o', long)]
    pub cleaned: Option<PathBuf>,

    /// Prompt template (YAML or TOML)
    #[arg(short, long)]
    pub prompt: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the init command.
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Overwrite an existing prompt template
    #[arg(long)]
    pub force: bool,

    /// Also write the effective configuration to this file
    #[arg(long)]
    pub write_config: Option<PathBuf>,
}
