//! Branch name validation.
//!
//! Branches taken from a catalog URL end up in a `refs/heads/<branch>`
//! reference passed to `git clone`. Validation is an allow-list: a name is
//! accepted only when every character is in `[A-Za-z0-9/_.-]` and the
//! structural rules of `git check-ref-format` hold. The transport is never
//! relied upon to reject a bad name.

use thiserror::Error;

/// Upper bound on the length of a branch name, in bytes.
pub const MAX_BRANCH_LEN: usize = 255;

/// Why a branch name was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefError {
    #[error("branch name is empty")]
    Empty,

    #[error("branch name is longer than {MAX_BRANCH_LEN} bytes")]
    TooLong,

    #[error("branch name contains invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("branch name contains '..'")]
    DoubleDot,

    #[error("branch name must not start with '-'")]
    LeadingDash,

    #[error("branch name must not start with '/'")]
    LeadingSlash,

    #[error("branch name must not end with '/'")]
    TrailingSlash,

    #[error("branch name contains consecutive slashes")]
    ConsecutiveSlashes,

    #[error("branch name must not end with '.'")]
    TrailingDot,

    #[error("branch name component must not end with '.lock'")]
    LockSuffix,

    #[error("branch name component must not start with '.'")]
    ComponentStartsWithDot,
}

/// Outcome of checking a branch name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValidation {
    Valid,
    Invalid(RefError),
}

impl RefValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, RefValidation::Valid)
    }
}

impl From<RefValidation> for Result<(), RefError> {
    fn from(validation: RefValidation) -> Self {
        match validation {
            RefValidation::Valid => Ok(()),
            RefValidation::Invalid(reason) => Err(reason),
        }
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-')
}

/// Check a branch name and return a tagged result.
pub fn check_branch_name(name: &str) -> RefValidation {
    match first_violation(name) {
        Some(reason) => RefValidation::Invalid(reason),
        None => RefValidation::Valid,
    }
}

/// Validate a branch name, returning the first rule it breaks.
pub fn validate_branch_name(name: &str) -> Result<(), RefError> {
    check_branch_name(name).into()
}

fn first_violation(name: &str) -> Option<RefError> {
    if name.is_empty() {
        return Some(RefError::Empty);
    }
    if name.len() > MAX_BRANCH_LEN {
        return Some(RefError::TooLong);
    }
    if let Some(c) = name.chars().find(|c| !is_allowed_char(*c)) {
        return Some(RefError::InvalidCharacter(c));
    }
    if name.contains("..") {
        return Some(RefError::DoubleDot);
    }
    if name.starts_with('-') {
        return Some(RefError::LeadingDash);
    }
    if name.starts_with('/') {
        return Some(RefError::LeadingSlash);
    }
    if name.ends_with('/') {
        return Some(RefError::TrailingSlash);
    }
    if name.contains("//") {
        return Some(RefError::ConsecutiveSlashes);
    }
    if name.ends_with('.') {
        return Some(RefError::TrailingDot);
    }
    for component in name.split('/') {
        if component.starts_with('.') {
            return Some(RefError::ComponentStartsWithDot);
        }
        if component.ends_with(".lock") {
            return Some(RefError::LockSuffix);
        }
    }
    None
}
