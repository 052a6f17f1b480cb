//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then `use common::prelude::*;`.
//!
//! The [`FakeGit`] fixture puts a `git` script first on `PATH` that copies a
//! prepared catalog tree into the clone target instead of talking to a
//! server, so the `fetch` command can be exercised without network access.

use assert_fs::prelude::*;
use std::env;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::catalogs;
    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    #[allow(unused_imports)]
    pub use super::FakeGit;
}

/// Catalog file contents used across tests.
#[allow(dead_code)]
pub mod catalogs {
    pub const SERVER_ONE: &str = "name: Test 1\ndescription: First test server\n";
    pub const SERVER_TWO: &str = "name: Test 2\ndescription: Second test server\n";
    pub const SERVER_THREE: &str = r#"{"name": "Test 3", "description": "Third test server"}"#;
    /// Fixture that must never be returned.
    pub const EXCLUDED: &str = "name: Test 0\ndescription: Excluded fixture\n";
    pub const IGNORE: &str = "# fixtures are not catalog entries\ntest/**\n";
    pub const MISSING_DESCRIPTION: &str = "name: Broken\n";
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A stand-in `git` executable plus the tree it "clones".
#[allow(dead_code)]
pub struct FakeGit {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl FakeGit {
    /// Create the fixture with an empty source tree.
    pub fn new() -> Self {
        let fake = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        fake.temp_dir
            .child("source")
            .create_dir_all()
            .expect("Failed to create source tree");
        fake.temp_dir
            .child("workspaces")
            .create_dir_all()
            .expect("Failed to create workspace root");
        fake.write_script("0");
        fake
    }

    /// A fixture whose tree is the standard three-entry catalog with one
    /// excluded fixture file.
    pub fn with_standard_catalog() -> Self {
        Self::new()
            .with_file(".catalogignore", catalogs::IGNORE)
            .with_file("servers/one.yaml", catalogs::SERVER_ONE)
            .with_file("servers/two.yaml", catalogs::SERVER_TWO)
            .with_file("servers/three.json", catalogs::SERVER_THREE)
            .with_file("test/zero.yaml", catalogs::EXCLUDED)
    }

    /// Add a file to the tree that will be "cloned".
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("source")
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Make the fake clone fail with `stderr` and exit code 128.
    pub fn failing_with(self, stderr: &str) -> Self {
        self.temp_dir
            .child("stderr.txt")
            .write_str(stderr)
            .expect("Failed to write stderr");
        self.write_script("128");
        self
    }

    fn write_script(&self, exit_code: &str) {
        // Logs every invocation; the fetch step records the credential
        // header and may fail, checkout copies the tree into its `-C` dir.
        let script = format!(
            "#!/bin/sh\n\
             echo \"$@\" >> '{log}'\n\
             case \" $* \" in\n\
             *\" fetch \"*)\n\
               if [ -n \"$GIT_CONFIG_VALUE_0\" ]; then echo \"$GIT_CONFIG_VALUE_0\" > '{auth}'; fi\n\
               if [ {code} -ne 0 ]; then cat '{stderr}' >&2; exit {code}; fi ;;\n\
             *\" checkout \"*)\n\
               cp -R '{source}'/. \"$2\"/ ;;\n\
             esac\n",
            log = self.path().join("calls.log").display(),
            auth = self.path().join("auth.txt").display(),
            stderr = self.path().join("stderr.txt").display(),
            source = self.path().join("source").display(),
            code = exit_code,
        );
        let path = self.bin_dir().join("git");
        std::fs::create_dir_all(self.bin_dir()).expect("Failed to create bin dir");
        std::fs::write(&path, script).expect("Failed to write fake git");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to make fake git executable");
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.path().join("bin")
    }

    /// Directory passed as `--workdir`; must be empty after every run.
    pub fn workspace_root(&self) -> PathBuf {
        self.path().join("workspaces")
    }

    /// Argument lines of every fake git invocation so far.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path().join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Argument lines of the fetch steps only.
    pub fn fetches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.split(' ').any(|arg| arg == "fetch"))
            .collect()
    }

    /// Authorization header the last fetch received, if any.
    pub fn auth_header(&self) -> Option<String> {
        std::fs::read_to_string(self.path().join("auth.txt"))
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Number of workspaces left behind under [`Self::workspace_root`].
    pub fn leftover_workspaces(&self) -> usize {
        std::fs::read_dir(self.workspace_root())
            .map(|dir| dir.count())
            .unwrap_or(0)
    }

    /// `mcp-catalog fetch` wired to this fake git.
    pub fn fetch_command(&self, url: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mcp-catalog");
        let path = match env::var_os("PATH") {
            Some(existing) => {
                let mut paths = vec![self.bin_dir()];
                paths.extend(env::split_paths(&existing));
                env::join_paths(paths).expect("Failed to build PATH")
            }
            None => self.bin_dir().into_os_string(),
        };
        cmd.env("PATH", path)
            .env_remove("GITHUB_AUTH_TOKEN")
            .arg("fetch")
            .arg(url)
            .arg("--workdir")
            .arg(self.workspace_root());
        cmd
    }
}

impl Default for FakeGit {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_constants_are_valid() {
        for yaml in [catalogs::SERVER_ONE, catalogs::SERVER_TWO, catalogs::EXCLUDED] {
            serde_yaml::from_str::<serde_yaml::Value>(yaml).expect("should be valid YAML");
        }
        serde_json::from_str::<serde_json::Value>(catalogs::SERVER_THREE)
            .expect("should be valid JSON");
    }

    #[test]
    fn test_fake_git_layout() {
        let fake = FakeGit::with_standard_catalog();
        assert!(fake.bin_dir().join("git").exists());
        assert!(fake.path().join("source/servers/one.yaml").exists());
        assert_eq!(fake.leftover_workspaces(), 0);
        assert!(fake.calls().is_empty());
    }
}
