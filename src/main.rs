//! # MCP Catalog CLI
//!
//! This is the binary entry point for the `mcp-catalog` command-line tool.
//!
//! It parses arguments with `clap`, runs the selected command and lets
//! `anyhow` report any error on stderr with a non-zero exit code. All catalog
//! logic lives in the library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
