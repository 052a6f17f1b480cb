//! Default values for catalog resolution.
//!
//! This module provides centralized default values used by the library and
//! the CLI, ensuring consistency and avoiding duplication.

/// Branch checked out when the catalog URL does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Environment variable holding the token shared by every Git host.
///
/// Read once by the CLI at startup. Library callers pass a
/// [`crate::git::Credential`] explicitly instead.
pub const TOKEN_ENV_VAR: &str = "GITHUB_AUTH_TOKEN";

/// Username sent alongside the token. Servers ignore it but git requires a
/// non-empty value for basic auth.
pub const CREDENTIAL_USERNAME: &str = "git";

/// Prefix of the temporary directory each clone is made into.
pub const WORKSPACE_PREFIX: &str = "catalog-clone-";

/// File at the root of a catalog repository listing glob patterns of files
/// that must not be read as catalog entries.
pub const CATALOG_IGNORE_FILE: &str = ".catalogignore";

/// File extensions read as catalog entries.
pub const CATALOG_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];
