//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use mcp_catalog::output::{ColorWhen, OutputConfig};

/// MCP Catalog - Resolve Git and GitHub catalog sources into catalog entries
#[derive(Parser, Debug)]
#[command(name = "mcp-catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output
    #[arg(long, global = true, value_name = "WHEN", value_enum, default_value = "auto")]
    color: ColorWhen,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        env = "MCP_CATALOG_LOG"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone a catalog source and print its entries
    Fetch(commands::fetch::FetchArgs),

    /// Show how a catalog URL is parsed, without network access
    Parse(commands::parse::ParseArgs),

    /// Print which resolver handles a catalog URL
    Classify(commands::classify::ClassifyArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // A logger may already be installed when embedded in tests
        let _ = env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .try_init();

        let output = OutputConfig::new(self.color);

        match self.command {
            Commands::Fetch(args) => commands::fetch::execute(args),
            Commands::Parse(args) => commands::parse::execute(args, &output),
            Commands::Classify(args) => commands::classify::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
