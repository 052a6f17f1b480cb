//! # Error Handling
//!
//! This module defines the error type shared by every stage of catalog
//! resolution. It uses `thiserror` to build a single `Error` enum whose
//! variants follow the order in which a resolution can fail:
//!
//! - **Protocol rejection**: a plaintext `http://` source was requested.
//! - **Malformed input**: the URL does not parse, or it names fewer than two
//!   path segments.
//! - **Security rejection**: the branch derived from the URL is not a safe
//!   Git ref name.
//! - **Transport failure**: `git clone` failed (authentication, network,
//!   missing ref).
//! - **Extraction failure**: the checked-out tree could not be read into
//!   catalog entries.
//!
//! The first three categories are always raised before any network or
//! filesystem activity happens.

use std::path::PathBuf;

use thiserror::Error;

use crate::refname::RefError;

/// Which resolver rejected an input. Only used to word error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKindLabel {
    Git,
    GitHub,
}

impl std::fmt::Display for SourceKindLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKindLabel::Git => f.write_str("Git"),
            SourceKindLabel::GitHub => f.write_str("GitHub"),
        }
    }
}

/// Main error type for catalog resolution
#[derive(Error, Debug)]
pub enum Error {
    /// A plaintext `http://` URL was supplied.
    #[error("only HTTPS is supported for {kind} catalogs")]
    InsecureScheme { kind: SourceKindLabel },

    /// The URL could not be parsed, or it has no usable host.
    #[error("invalid Git URL: {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The URL parsed but does not name an `org/repo` pair.
    #[error("invalid Git URL format, expected host/org/repo.git (got {url})")]
    InvalidUrlFormat { url: String },

    /// The branch taken from the URL failed validation.
    #[error("invalid branch name: {0}")]
    InvalidBranchName(#[from] RefError),

    /// The URL is neither a GitHub nor a generic Git source.
    #[error("unsupported catalog source {url}: expected a github.com URL or a URL ending in .git")]
    UnsupportedSource { url: String },

    /// The temporary checkout directory could not be created.
    #[error("failed to create temporary directory: {0}")]
    Workspace(#[source] std::io::Error),

    /// `git clone` failed.
    ///
    /// Includes the canonical clone URL, the ref, git's own message and an
    /// optional hint for common failures.
    #[error("failed to clone repository {url}@{r#ref}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
        hint: Option<String>,
    },

    /// A catalog file in the checkout could not be turned into entries.
    #[error("failed to read catalog file {}: {message}", path.display())]
    Catalog { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors raised before any workspace or network access.
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            Error::InsecureScheme { .. }
                | Error::InvalidUrl { .. }
                | Error::InvalidUrlFormat { .. }
                | Error::InvalidBranchName(_)
                | Error::UnsupportedSource { .. }
        )
    }
}
