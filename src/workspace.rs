//! Ephemeral checkout directories.
//!
//! Every fetch clones into its own [`Workspace`], a uniquely named temporary
//! directory. The fetcher closes it explicitly once the catalog has been read;
//! on any other exit path, including unwinding out of a panicking catalog
//! reader, dropping the value removes the directory, so no checkout outlives
//! the call that created it.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::TempDir;

use crate::defaults::WORKSPACE_PREFIX;
use crate::error::{Error, Result};

/// A temporary directory owned by a single fetch.
///
/// [`Workspace::close`] removes the directory and logs a failure to do so.
/// If the workspace is dropped instead, for example while unwinding, the
/// inner [`TempDir`] removes it on a best-effort basis.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace under the system temporary directory.
    pub fn create() -> Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a workspace under `parent`.
    pub fn create_in(parent: impl AsRef<Path>) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(Error::Workspace)?;
        debug!("created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now.
    ///
    /// A failed removal is logged and otherwise ignored; it never replaces
    /// the result of the fetch that owned the workspace.
    pub fn close(self) {
        let path: PathBuf = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("removed workspace {}", path.display()),
            Err(e) => warn!("failed to remove workspace {}: {}", path.display(), e),
        }
    }
}
