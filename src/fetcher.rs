//! # Catalog Fetching
//!
//! This module provides the `CatalogFetcher`, which ties the other pieces
//! together: it parses a catalog URL, clones the repository into a fresh
//! [`Workspace`], hands the checkout to a [`CatalogReader`] and removes the
//! workspace again.
//!
//! ## Design
//!
//! Like the rest of the crate, the fetcher is built around traits so the
//! expensive parts can be swapped out in tests:
//!
//! - **`GitOperations`** performs the shallow clone. `SystemGit` is the
//!   default and shells out to `git`.
//! - **`CatalogReader`** turns the checkout into entries. `DirectoryReader` is
//!   the default.
//!
//! The token shared by all Git hosts is injected at construction time rather
//! than read from the environment here, so one process can hold fetchers
//! with and without credentials side by side.
//!
//! ## Guarantees
//!
//! - Invalid input (plaintext URL, bad format, unsafe branch) is rejected
//!   before a workspace is created or git is run.
//! - Clones are never retried.
//! - The workspace is removed on every exit path, and a failure to remove it
//!   never hides the result of the fetch.

use std::path::PathBuf;

use log::{debug, info};

use crate::catalog::{CatalogEntry, CatalogReader, DirectoryReader};
use crate::error::{Error, Result};
use crate::git::{CloneRequest, Credential, GitOperations, SystemGit};
use crate::source::{self, RepoRef, SourceKind};
use crate::workspace::Workspace;

/// Resolves catalog URLs into catalog entries.
pub struct CatalogFetcher {
    git_ops: Box<dyn GitOperations>,
    reader: Box<dyn CatalogReader>,
    credential: Option<Credential>,
    workspace_root: Option<PathBuf>,
}

impl Default for CatalogFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogFetcher {
    /// Creates a fetcher using the system `git` and the directory reader,
    /// cloning anonymously.
    pub fn new() -> Self {
        Self::with_operations(Box::new(SystemGit::new()), Box::new(DirectoryReader::new()))
    }

    /// Creates a fetcher with custom `GitOperations` and `CatalogReader`
    /// implementations.
    pub fn with_operations(
        git_ops: Box<dyn GitOperations>,
        reader: Box<dyn CatalogReader>,
    ) -> Self {
        Self {
            git_ops,
            reader,
            credential: None,
            workspace_root: None,
        }
    }

    /// Attach the token used for every clone. `None` clones anonymously.
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    /// Create workspaces under `root` instead of the system temp directory.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Fetch any supported catalog source.
    ///
    /// github.com URLs go to [`Self::fetch_github_catalog`], other URLs ending
    /// in `.git` or naming a `repo.git/<branch>` path to
    /// [`Self::fetch_git_catalog`]. Input without a scheme is classified as if
    /// it started with `https://`.
    pub fn fetch_catalog(&self, catalog_url: &str) -> Result<Vec<CatalogEntry>> {
        let catalog_url = catalog_url.trim();
        match source::resolver_for(&source::with_default_scheme(catalog_url)) {
            SourceKind::GitHub => self.fetch_github_catalog(catalog_url),
            SourceKind::Git => self.fetch_git_catalog(catalog_url),
            SourceKind::Raw => Err(Error::UnsupportedSource {
                url: catalog_url.to_string(),
            }),
        }
    }

    /// Fetch a catalog from any HTTPS Git server.
    pub fn fetch_git_catalog(&self, catalog_url: &str) -> Result<Vec<CatalogEntry>> {
        let repo = source::parse_git_url(catalog_url)?;
        self.fetch_repo(&repo)
    }

    /// Fetch a catalog hosted on github.com.
    pub fn fetch_github_catalog(&self, catalog_url: &str) -> Result<Vec<CatalogEntry>> {
        let repo = source::parse_github_url(catalog_url)?;
        self.fetch_repo(&repo)
    }

    /// Clone an already validated repository and read its catalog.
    pub fn fetch_repo(&self, repo: &RepoRef) -> Result<Vec<CatalogEntry>> {
        let workspace = match &self.workspace_root {
            Some(root) => Workspace::create_in(root)?,
            None => Workspace::create()?,
        };

        let request = CloneRequest::shallow(repo, self.credential.clone());
        self.git_ops.clone_shallow(&request, workspace.path())?;

        debug!("reading catalog from {}", workspace.path().display());
        let result = self.reader.read_catalog(workspace.path());
        workspace.close();

        if let Ok(entries) = &result {
            info!("read {} catalog entries from {}", entries.len(), repo);
        }
        result
    }
}
