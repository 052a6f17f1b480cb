//! # Parse Command Implementation
//!
//! Shows how a catalog URL is split into host, org, repo and branch, and the
//! clone URL that would be used. Runs no git commands, so it is a cheap way to
//! check a URL before configuring it.

use anyhow::{Context, Result};
use clap::Args;

use mcp_catalog::output::OutputConfig;
use mcp_catalog::source::{self, SourceKind};

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Catalog URL to parse
    #[arg(value_name = "URL")]
    pub url: String,

    /// Force the github.com rules even if the URL is not classified as GitHub
    #[arg(long)]
    pub github: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the parse command
pub fn execute(args: ParseArgs, output: &OutputConfig) -> Result<()> {
    let use_github = args.github
        || source::resolver_for(&source::with_default_scheme(args.url.trim()))
            == SourceKind::GitHub;

    let repo = if use_github {
        source::parse_github_url(&args.url)
    } else {
        source::parse_git_url(&args.url)
    }
    .with_context(|| format!("Failed to parse {}", args.url))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&repo)?);
        return Ok(());
    }

    println!("{}", output.field("resolver", if use_github { "github" } else { "git" }));
    println!("{}", output.field("host", &repo.host));
    println!("{}", output.field("org", &repo.org));
    println!("{}", output.field("repo", &repo.repo));
    println!(
        "{}",
        output.field(
            "ref",
            &if repo.ref_from_url {
                repo.r#ref.clone()
            } else {
                format!("{} (default)", repo.r#ref)
            }
        )
    );
    println!("{}", output.field("clone url", &repo.clone_url()));
    Ok(())
}
