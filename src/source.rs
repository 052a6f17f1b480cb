//! # Catalog Source URLs
//!
//! This module decides what kind of catalog a URL points at and turns
//! untrusted Git URLs into a [`RepoRef`] from which a clone can be built.
//!
//! ## Classification
//!
//! - [`is_generic_git_url`]: the path ends in `.git` (after removing one
//!   trailing slash). Host and scheme do not matter.
//! - [`is_github_url`]: the host is exactly `github.com`.
//!
//! Both predicates are advisory. Malformed input is simply "not a match".
//! They can both be true for the same URL, so [`classify`] fixes the
//! precedence: GitHub first, then generic Git, otherwise a raw catalog.
//!
//! [`resolver_for`] is what the fetcher dispatches on. It agrees with
//! [`classify`] except that a URL whose repository segment ends in `.git`
//! (`host/org/repo.git/branch`) goes to the Git resolver even though the
//! full path does not end in `.git`.
//!
//! ## Parsing
//!
//! [`parse_git_url`] and [`parse_github_url`] accept `https://` URLs or bare
//! `host/org/repo` input and reject plaintext `http://` outright. The path is
//! read as `org/repo[.git][/branch...][.git]`; the branch defaults to `main`
//! and is validated with [`crate::refname`] whenever it comes from the URL.
//!
//! The path is split from the input text itself, not from a parsed [`Url`].
//! URL parsing resolves `.`/`..` segments and silently drops tabs and
//! newlines, which would let a branch like `a/../b` or `ma\tin` slip past
//! validation or even point the clone at another repository. [`Url`] is only
//! used for the scheme, host and port.
//!
//! ```
//! use mcp_catalog::source::parse_git_url;
//!
//! let repo = parse_git_url("gitlab.com/acme/catalog.git/release/v2").unwrap();
//! assert_eq!(repo.org, "acme");
//! assert_eq!(repo.repo, "catalog");
//! assert_eq!(repo.r#ref, "release/v2");
//! assert_eq!(repo.clone_url(), "https://gitlab.com/acme/catalog.git");
//! ```

use std::borrow::Cow;
use std::fmt;

use log::debug;
use serde::Serialize;
use url::Url;

use crate::defaults::DEFAULT_BRANCH;
use crate::error::{Error, Result, SourceKindLabel};
use crate::refname::validate_branch_name;

const GITHUB_HOST: &str = "github.com";
const HTTPS_PREFIX: &str = "https://";
const HTTP_PREFIX: &str = "http://";

/// The resolver a catalog URL should be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A repository hosted on github.com.
    GitHub,
    /// Any other Git server, recognised by a `.git` suffix.
    Git,
    /// Not a Git source (for example a raw YAML or JSON file).
    Raw,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::GitHub => f.write_str("github"),
            SourceKind::Git => f.write_str("git"),
            SourceKind::Raw => f.write_str("raw"),
        }
    }
}

/// Returns true when the URL path ends in `.git`.
pub fn is_generic_git_url(catalog_url: &str) -> bool {
    match Url::parse(catalog_url) {
        Ok(url) => url.path().strip_suffix('/').unwrap_or(url.path()).ends_with(".git"),
        Err(_) => false,
    }
}

/// Returns true when the URL host is exactly `github.com`, in any case.
pub fn is_github_url(catalog_url: &str) -> bool {
    Url::parse(catalog_url)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.eq_ignore_ascii_case(GITHUB_HOST)))
        .unwrap_or(false)
}

/// Pick the resolver for a URL. GitHub wins over generic Git.
pub fn classify(catalog_url: &str) -> SourceKind {
    if is_github_url(catalog_url) {
        SourceKind::GitHub
    } else if is_generic_git_url(catalog_url) {
        SourceKind::Git
    } else {
        SourceKind::Raw
    }
}

/// Pick the resolver the fetcher dispatches to.
///
/// Same as [`classify`], except that a raw URL whose repository segment ends
/// in `.git` goes to the Git resolver, so `host/org/repo.git/branch` works.
pub fn resolver_for(catalog_url: &str) -> SourceKind {
    match classify(catalog_url) {
        SourceKind::Raw if names_git_repository(catalog_url) => SourceKind::Git,
        kind => kind,
    }
}

fn names_git_repository(catalog_url: &str) -> bool {
    split_url(catalog_url)
        .map(|(_, path)| {
            path.trim_matches('/')
                .split('/')
                .nth(1)
                .is_some_and(|repo| repo.len() > ".git".len() && repo.ends_with(".git"))
        })
        .unwrap_or(false)
}

/// Split `scheme://authority/path?query#fragment` into the raw authority and
/// path text. Query and fragment are dropped.
fn split_url(url: &str) -> Option<(&str, &str)> {
    let (_, rest) = url.split_once("://")?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    Some(match rest.find('/') {
        Some(slash) => rest.split_at(slash),
        None => (rest, ""),
    })
}

/// Prefix `https://` when the input carries no scheme at all.
///
/// Inputs that already name a scheme, `http://` included, are returned
/// untouched so the resolvers can reject them.
pub fn with_default_scheme(raw: &str) -> Cow<'_, str> {
    if raw.contains("://") {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("{HTTPS_PREFIX}{raw}"))
    }
}

/// A repository location derived from a catalog URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub scheme: String,
    /// Host, with `:port` appended when the URL names a non-default port.
    pub host: String,
    pub org: String,
    /// Repository name without a `.git` suffix.
    pub repo: String,
    /// Branch to check out.
    pub r#ref: String,
    /// False when `ref` is the default branch rather than taken from the URL.
    pub ref_from_url: bool,
}

impl RepoRef {
    /// Canonical clone URL: `{scheme}://{host}/{org}/{repo}.git`.
    pub fn clone_url(&self) -> String {
        format!("{}://{}/{}/{}.git", self.scheme, self.host, self.org, self.repo)
    }

    /// Fully qualified reference for the branch, `refs/heads/{ref}`.
    pub fn reference_name(&self) -> String {
        format!("refs/heads/{}", self.r#ref)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.clone_url(), self.r#ref)
    }
}

/// Parse a generic Git catalog URL (GitLab, Bitbucket, Gitea, GitHub
/// Enterprise or any other HTTPS Git server).
pub fn parse_git_url(raw: &str) -> Result<RepoRef> {
    parse_repo_url(raw, SourceKindLabel::Git)
}

/// Parse a github.com catalog URL.
///
/// Same rules as [`parse_git_url`], except that the host must be
/// `github.com` and a browser-style `tree/<branch>` path selects `<branch>`.
pub fn parse_github_url(raw: &str) -> Result<RepoRef> {
    parse_repo_url(raw, SourceKindLabel::GitHub)
}

fn parse_repo_url(raw: &str, kind: SourceKindLabel) -> Result<RepoRef> {
    let raw = raw.trim();

    // Plaintext transport is refused before anything else is looked at.
    if raw
        .get(..HTTP_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(HTTP_PREFIX))
    {
        return Err(Error::InsecureScheme { kind });
    }

    let normalized = with_default_scheme(raw);
    if !normalized
        .get(..HTTPS_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(HTTPS_PREFIX))
    {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            message: "only https:// URLs can be cloned".to_string(),
        });
    }

    let (authority, path) = split_url(&normalized).ok_or_else(|| Error::InvalidUrl {
        url: raw.to_string(),
        message: "missing host".to_string(),
    })?;
    if authority
        .chars()
        .any(|c| c.is_ascii_control() || c.is_whitespace() || c == '\\')
    {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            message: "host contains invalid characters".to_string(),
        });
    }

    let url =
        Url::parse(&format!("{HTTPS_PREFIX}{authority}/")).map_err(|e| Error::InvalidUrl {
            url: raw.to_string(),
            message: e.to_string(),
        })?;

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_ascii_lowercase(),
        _ => {
            return Err(Error::InvalidUrl {
                url: raw.to_string(),
                message: "missing host".to_string(),
            })
        }
    };

    if kind == SourceKindLabel::GitHub && host != GITHUB_HOST {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            message: format!("expected host {GITHUB_HOST}, got {host}"),
        });
    }

    let host = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    };

    // Raw segments: nothing is decoded, collapsed or stripped here.
    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
    if parts.len() < 2 {
        return Err(Error::InvalidUrlFormat {
            url: raw.to_string(),
        });
    }

    let org = parts[0];
    let repo = parts[1].strip_suffix(".git").unwrap_or(parts[1]);
    validate_path_component(org, raw)?;
    validate_path_component(repo, raw)?;

    let mut rest = &parts[2..];
    if kind == SourceKindLabel::GitHub && rest.len() > 1 && rest[0] == "tree" {
        rest = &rest[1..];
    }

    let (branch, ref_from_url) = if rest.is_empty() {
        (DEFAULT_BRANCH.to_string(), false)
    } else {
        let joined = rest.join("/");
        let branch = joined.strip_suffix(".git").unwrap_or(&joined).to_string();
        validate_branch_name(&branch)?;
        (branch, true)
    };

    let parsed = RepoRef {
        scheme: "https".to_string(),
        host,
        org: org.to_string(),
        repo: repo.to_string(),
        r#ref: branch,
        ref_from_url,
    };
    debug!("parsed {} catalog source {}", kind, parsed);
    Ok(parsed)
}

/// Owner and repository names are spliced into the clone URL, so they get the
/// same character allow-list as branches.
fn validate_path_component(component: &str, raw: &str) -> Result<()> {
    if component.is_empty() {
        return Err(Error::InvalidUrlFormat {
            url: raw.to_string(),
        });
    }
    let allowed = component
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !allowed || component.starts_with('-') || component == "." || component == ".." {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            message: format!("invalid repository path component '{component}'"),
        });
    }
    Ok(())
}
