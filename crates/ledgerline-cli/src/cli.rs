//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ledgerline - Turn bank statements into structured transactions.
#[derive(Debug, Parser)]
#[command(name = "ledgerline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ~/.ledgerline/config.toml)
    #[arg(short, long, global = true, env = "LEDGERLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract transactions from a statement
    Extract(ExtractArgs),

    /// Print the recovered page text and the strategy each page used
    Text(TextArgs),

    /// Salvage transactions from a saved model response
    Salvage(SalvageArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Statement file (.pdf or a scanned image)
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: CliFormat,

    /// Characters per chunk sent to the model
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Model name
    #[arg(short, long, env = "LEDGERLINE_MODEL")]
    pub model: Option<String>,
}

/// Arguments for the text command.
#[derive(Debug, Parser)]
pub struct TextArgs {
    /// Statement file (.pdf or a scanned image)
    pub file: PathBuf,
}

/// Arguments for the salvage command.
#[derive(Debug, Parser)]
pub struct SalvageArgs {
    /// File holding the response (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: CliFormat,
}
