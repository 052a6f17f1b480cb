//! # MCP Catalog Library
//!
//! This library resolves a catalog source URL into a local checkout and reads
//! MCP server catalog entries out of it. It backs the `mcp-catalog`
//! command-line tool and can be embedded in any service that needs to
//! refresh catalogs from Git.
//!
//! ## Quick Example
//!
//! ```
//! use mcp_catalog::source::{classify, parse_github_url, SourceKind};
//!
//! let url = "https://github.com/obot-platform/test-mcp-catalog.git";
//! assert_eq!(classify(url), SourceKind::GitHub);
//!
//! let repo = parse_github_url(url).unwrap();
//! assert_eq!(repo.org, "obot-platform");
//! assert_eq!(repo.r#ref, "main");
//! assert_eq!(repo.reference_name(), "refs/heads/main");
//!
//! // Plaintext transport is refused before anything touches the network
//! assert!(parse_github_url("http://github.com/obot-platform/test-mcp-catalog").is_err());
//! ```
//!
//! ## Core Concepts
//!
//! - **Sources (`source`)**: classify URLs as GitHub, generic Git or raw, and
//!   parse Git URLs into host, org, repo and branch.
//! - **Branch names (`refname`)**: allow-list validation of branches taken
//!   from URLs.
//! - **Workspaces (`workspace`)**: temporary checkout directories removed on
//!   every exit path.
//! - **Git (`git`)**: shallow single-branch clones through the system `git`,
//!   with an optional shared token.
//! - **Catalogs (`catalog`)**: the `CatalogReader` trait and the default
//!   directory reader.
//! - **Fetching (`fetcher`)**: `CatalogFetcher` ties everything together.
//!
//! ## Execution Flow
//!
//! 1.  **Classify** the URL and pick the GitHub or generic Git resolver.
//! 2.  **Parse and validate** the URL; reject plaintext, malformed and unsafe
//!     input.
//! 3.  **Clone** the branch at depth 1 into a fresh workspace.
//! 4.  **Read** the checkout into catalog entries.
//! 5.  **Remove** the workspace.

pub mod catalog;
pub mod defaults;
pub mod error;
pub mod fetcher;
pub mod git;
pub mod output;
pub mod refname;
pub mod source;
pub mod workspace;

#[cfg(test)]
mod source_proptest;
