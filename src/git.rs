//! Shallow clones through the system `git` binary.
//!
//! A [`CloneRequest`] always asks for depth 1 and a single branch. The
//! checkout is built in three steps: `git init`, a `git fetch` of exactly
//! `refs/heads/<branch>`, and a detached checkout of `FETCH_HEAD`. Naming the
//! full refspec means a tag that happens to share the branch name is never
//! checked out. Each child process runs with a reduced environment, no
//! terminal prompts, and only the `https` protocol allowed. When a [`Credential`] is attached it is handed to
//! git as a basic-auth `http.extraHeader` through `GIT_CONFIG_*` environment
//! variables, so the token never shows up in the process arguments.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};

use crate::defaults::CREDENTIAL_USERNAME;
use crate::error::{Error, Result};
use crate::source::RepoRef;

/// Variables passed through to the git child process. Everything else,
/// including `GIT_*` overrides from the parent, is dropped.
const INHERITED_ENV: &[&str] = &[
    "PATH",
    "HOME",
    "TMPDIR",
    "SYSTEMROOT",
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
    "NO_PROXY",
    "no_proxy",
    "SSL_CERT_FILE",
    "SSL_CERT_DIR",
    "GIT_SSL_CAINFO",
];

/// A token used for every Git host, sent as the basic-auth password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    token: String,
}

impl Credential {
    /// Wrap a token, pairing it with the placeholder username.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            username: CREDENTIAL_USERNAME.to_string(),
            token: token.into(),
        }
    }

    /// Read a token from the environment. Unset or blank means anonymous.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(Self::new)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn authorization_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.token));
        format!("Authorization: Basic {encoded}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Parameters of a single shallow clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub url: String,
    /// Branch name, without the `refs/heads/` prefix.
    pub r#ref: String,
    pub depth: u32,
    pub credential: Option<Credential>,
}

impl CloneRequest {
    /// Build the depth-1 request for a parsed catalog source.
    pub fn shallow(repo: &RepoRef, credential: Option<Credential>) -> Self {
        Self {
            url: repo.clone_url(),
            r#ref: repo.r#ref.clone(),
            depth: 1,
            credential,
        }
    }

    /// `refs/heads/{ref}`
    pub fn reference_name(&self) -> String {
        format!("refs/heads/{}", self.r#ref)
    }
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clone `request` into `target_dir`, which exists and is empty.
    fn clone_shallow(&self, request: &CloneRequest, target_dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, which runs the system's
/// `git` command.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific git executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `git` with the reduced environment shared by every step.
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);

        cmd.env_clear();
        for name in INHERITED_ENV {
            if let Some(value) = std::env::var_os(name) {
                cmd.env(name, value);
            }
        }
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.env("GIT_CONFIG_NOSYSTEM", "1");
        cmd.stdin(Stdio::null());
        cmd
    }

    /// `git init --quiet <target>`
    pub fn init_command(&self, target_dir: &Path) -> Command {
        let mut cmd = self.command();
        cmd.args(["init", "--quiet"]).arg(target_dir);
        cmd
    }

    /// Fetch `refs/heads/<ref>` at the requested depth into `FETCH_HEAD`.
    ///
    /// This is the only step that talks to the server, so it is the only one
    /// that carries the credential.
    pub fn fetch_command(&self, request: &CloneRequest, target_dir: &Path) -> Command {
        let mut cmd = self.command();

        if let Some(credential) = &request.credential {
            cmd.env("GIT_CONFIG_COUNT", "1");
            cmd.env("GIT_CONFIG_KEY_0", "http.extraHeader");
            cmd.env("GIT_CONFIG_VALUE_0", credential.authorization_header());
        }

        cmd.arg("-C").arg(target_dir);
        cmd.args(["-c", "protocol.allow=never", "-c", "protocol.https.allow=always"]);
        cmd.args(["fetch", "--quiet", "--no-tags"]);
        cmd.arg(format!("--depth={}", request.depth));
        cmd.arg("--");
        cmd.arg(&request.url);
        cmd.arg(request.reference_name());
        cmd
    }

    /// Check out what the fetch step brought in.
    pub fn checkout_command(&self, target_dir: &Path) -> Command {
        let mut cmd = self.command();
        cmd.arg("-C").arg(target_dir);
        cmd.args(["checkout", "--quiet", "--detach", "FETCH_HEAD"]);
        cmd
    }

    fn run(&self, mut cmd: Command, request: &CloneRequest) -> Result<()> {
        let output = cmd.output().map_err(|e| Error::GitClone {
            url: request.url.clone(),
            r#ref: request.r#ref.clone(),
            message: format!("failed to run {}: {}", self.program.display(), e),
            hint: Some("make sure git is installed and on PATH".to_string()),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let hint = clone_failure_hint(&stderr, request);
            return Err(Error::GitClone {
                url: request.url.clone(),
                r#ref: request.r#ref.clone(),
                message: if stderr.is_empty() {
                    format!("git exited with {}", output.status)
                } else {
                    stderr
                },
                hint,
            });
        }
        Ok(())
    }
}

impl GitOperations for SystemGit {
    fn clone_shallow(&self, request: &CloneRequest, target_dir: &Path) -> Result<()> {
        info!(
            "cloning {} ({}) depth {}{}",
            request.url,
            request.reference_name(),
            request.depth,
            if request.credential.is_some() {
                " with credential"
            } else {
                ""
            }
        );

        self.run(self.init_command(target_dir), request)?;
        self.run(self.fetch_command(request, target_dir), request)?;
        self.run(self.checkout_command(target_dir), request)?;

        debug!("cloned {} into {}", request.url, target_dir.display());
        Ok(())
    }
}

fn clone_failure_hint(stderr: &str, request: &CloneRequest) -> Option<String> {
    let auth_failed = stderr.contains("Authentication failed")
        || stderr.contains("could not read Username")
        || stderr.contains("terminal prompts disabled")
        || stderr.contains("403");
    if auth_failed {
        return Some(if request.credential.is_some() {
            "the configured token was rejected or lacks access to this repository".to_string()
        } else {
            format!(
                "the repository may be private; set {} to a token with read access",
                crate::defaults::TOKEN_ENV_VAR
            )
        });
    }
    if stderr.contains("couldn't find remote ref") {
        return Some(format!(
            "branch '{}' does not exist; name another branch after org/repo in the URL",
            request.r#ref
        ));
    }
    if stderr.contains("Could not resolve host") {
        return Some("check the host name and network connectivity".to_string());
    }
    None
}
