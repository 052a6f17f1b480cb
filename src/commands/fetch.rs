//! # Fetch Command Implementation
//!
//! Clones a catalog source and prints its entries as YAML or JSON.
//!
//! The shared token is read once, here, from the environment variable named
//! by `--token-env` (`GITHUB_AUTH_TOKEN` by default) and handed to the
//! fetcher. The same token is sent to every Git host.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::debug;
use std::path::PathBuf;

use mcp_catalog::defaults::TOKEN_ENV_VAR;
use mcp_catalog::fetcher::CatalogFetcher;
use mcp_catalog::git::Credential;

/// Output format for catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Catalog URL, e.g. github.com/org/repo or https://gitlab.com/org/repo.git/branch
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: Format,

    /// Environment variable holding the Git token
    #[arg(long, value_name = "VAR", default_value = TOKEN_ENV_VAR)]
    pub token_env: String,

    /// Clone without a token even when one is configured
    #[arg(long)]
    pub anonymous: bool,

    /// Directory to create temporary checkouts in
    #[arg(long, value_name = "DIR", env = "MCP_CATALOG_WORKDIR")]
    pub workdir: Option<PathBuf>,
}

/// Execute the fetch command
pub fn execute(args: FetchArgs) -> Result<()> {
    let credential = if args.anonymous {
        None
    } else {
        Credential::from_env(&args.token_env)
    };
    debug!(
        "using {} credential",
        if credential.is_some() { "a" } else { "no" }
    );

    let mut fetcher = CatalogFetcher::new().with_credential(credential);
    if let Some(workdir) = args.workdir {
        fetcher = fetcher.with_workspace_root(workdir);
    }

    let entries = fetcher
        .fetch_catalog(&args.url)
        .with_context(|| format!("Failed to fetch catalog {}", args.url))?;

    let rendered = match args.format {
        Format::Yaml => serde_yaml::to_string(&entries)?,
        Format::Json => serde_json::to_string_pretty(&entries)? + "\n",
    };
    print!("{rendered}");
    Ok(())
}
