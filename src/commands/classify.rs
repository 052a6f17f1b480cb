//! # Classify Command Implementation
//!
//! Prints `github`, `git` or `raw` for a catalog URL, the same decision
//! `fetch` makes before picking a resolver. Input without a scheme is
//! classified as an `https://` URL.

use anyhow::Result;
use clap::Args;

use mcp_catalog::source;

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Catalog URL to classify
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Execute the classify command
pub fn execute(args: ClassifyArgs) -> Result<()> {
    let url = source::with_default_scheme(args.url.trim());
    println!("{}", source::resolver_for(&url));
    Ok(())
}
