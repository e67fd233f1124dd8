//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, run::RunArgs, steps::StepsCommands, validate::ValidateArgs,
};
use crate::core::config::ThemePreference;

#[derive(Parser)]
#[command(name = "regwiz")]
#[command(author, version, about = "Multi-step registration wizard")]
#[command(
    long_about = "A terminal registration wizard: three validated steps, accumulated across pages, submitted once to a gateway."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Display theme (default: from config, then system)
    #[arg(long, global = true, value_enum)]
    pub theme: Option<ThemePreference>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the registration wizard
    Run(RunArgs),

    /// Step registry inspection
    #[command(subcommand)]
    Steps(StepsCommands),

    /// Validate a record file against every step schema
    Validate(ValidateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
