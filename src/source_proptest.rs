//! Property-based tests for catalog URL handling and branch validation.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::error::Error;
    use crate::refname::{validate_branch_name, RefError};
    use crate::source::{classify, is_generic_git_url, is_github_url, parse_git_url, SourceKind};
    use proptest::prelude::*;

    const HOST: &str = "[a-z][a-z0-9]{0,10}(\\.[a-z][a-z0-9]{0,10}){1,2}";
    const NAME: &str = "[A-Za-z0-9][A-Za-z0-9_-]{0,15}";
    const BRANCH: &str = "[A-Za-z0-9][A-Za-z0-9_-]{0,10}(/[A-Za-z0-9][A-Za-z0-9_-]{0,10}){0,2}";

    // ============================================================================
    // Classifier properties
    // ============================================================================

    proptest! {
        /// Property: any URL whose path ends in .git is a generic Git URL
        #[test]
        fn git_suffix_always_classifies_as_git(
            host in HOST,
            org in NAME,
            repo in NAME,
            slash in proptest::bool::ANY,
        ) {
            let url = format!("https://{host}/{org}/{repo}.git{}", if slash { "/" } else { "" });
            prop_assert!(is_generic_git_url(&url));
        }

        /// Property: github.com in any letter case is always GitHub
        #[test]
        fn github_host_any_case(
            mask in proptest::collection::vec(proptest::bool::ANY, 10),
            org in NAME,
            repo in NAME,
            http in proptest::bool::ANY,
            suffix in proptest::bool::ANY,
        ) {
            let host: String = "github.com"
                .chars()
                .zip(mask)
                .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
                .collect();
            let scheme = if http { "http" } else { "https" };
            let url = format!("{scheme}://{host}/{org}/{repo}{}", if suffix { ".git" } else { "" });
            prop_assert!(is_github_url(&url));
            prop_assert_eq!(classify(&url), SourceKind::GitHub);
        }

        /// Property: hosts other than github.com are never GitHub
        #[test]
        fn other_hosts_are_not_github(prefix in "[a-z]{1,8}", org in NAME, repo in NAME) {
            for host in [
                format!("{prefix}.github.com"),
                format!("github.{prefix}.com"),
                format!("git.github.{prefix}.com"),
            ] {
                let url = format!("https://{host}/{org}/{repo}.git");
                prop_assert!(!is_github_url(&url), "{} classified as GitHub", url);
            }
        }

        /// Property: classification never panics
        #[test]
        fn classify_never_panics(input in ".*") {
            let _ = classify(&input);
        }
    }

    // ============================================================================
    // Parser properties
    // ============================================================================

    proptest! {
        /// Property: schemeless input parses exactly like the https:// form
        #[test]
        fn schemeless_equals_https(host in HOST, org in NAME, repo in NAME, branch in proptest::option::of(BRANCH)) {
            let path = match &branch {
                Some(b) => format!("{host}/{org}/{repo}/{b}"),
                None => format!("{host}/{org}/{repo}"),
            };
            let bare = parse_git_url(&path).unwrap();
            let https = parse_git_url(&format!("https://{path}")).unwrap();
            prop_assert_eq!(bare, https);
        }

        /// Property: http:// input is always rejected as insecure
        #[test]
        fn http_always_rejected(rest in ".*") {
            let result = parse_git_url(&format!("http://{rest}"));
            prop_assert!(
                matches!(result, Err(Error::InsecureScheme { .. })),
                "expected insecure scheme error, got {:?}",
                result
            );
        }

        /// Property: re-parsing the clone URL keeps org and repo and adds nothing
        #[test]
        fn clone_url_round_trip(host in HOST, org in NAME, repo in NAME, branch in BRANCH) {
            let first = parse_git_url(&format!("{host}/{org}/{repo}.git/{branch}")).unwrap();
            prop_assert_eq!(&first.r#ref, &branch);

            let second = parse_git_url(&first.clone_url()).unwrap();
            prop_assert_eq!(&second.org, &first.org);
            prop_assert_eq!(&second.repo, &first.repo);
            prop_assert_eq!(second.clone_url(), first.clone_url());
            prop_assert!(!second.ref_from_url);
        }

        /// Property: a single path segment is always a format error
        #[test]
        fn single_segment_is_format_error(host in HOST, org in NAME) {
            let result = parse_git_url(&format!("https://{host}/{org}"));
            prop_assert!(matches!(result, Err(Error::InvalidUrlFormat { .. })), "{:?}", result);
        }

        /// Property: `..` anywhere in the branch part of a URL never parses
        #[test]
        fn dot_dot_in_url_branch_rejected(
            host in HOST,
            org in NAME,
            repo in NAME,
            before in proptest::option::of(BRANCH),
            after in BRANCH,
        ) {
            let branch = match before {
                Some(b) => format!("{b}/../{after}"),
                None => format!("../{after}"),
            };
            let url = format!("https://{host}/{org}/{repo}.git/{branch}");
            let result = parse_git_url(&url);
            prop_assert!(
                matches!(result, Err(Error::InvalidBranchName(RefError::DoubleDot))),
                "{} parsed as {:?}",
                url,
                result
            );
        }

        /// Property: parsing arbitrary input never panics
        #[test]
        fn parse_never_panics(input in ".*") {
            let _ = parse_git_url(&input);
        }
    }

    // ============================================================================
    // Branch validation properties
    // ============================================================================

    proptest! {
        /// Property: names containing ".." are rejected
        #[test]
        fn double_dot_rejected(a in "[A-Za-z0-9]{1,8}", b in "[A-Za-z0-9]{1,8}") {
            prop_assert_eq!(validate_branch_name(&format!("{a}..{b}")), Err(RefError::DoubleDot));
        }

        /// Property: names starting with '-' are rejected
        #[test]
        fn leading_dash_rejected(rest in "[A-Za-z0-9_-]{0,12}") {
            prop_assert_eq!(validate_branch_name(&format!("-{rest}")), Err(RefError::LeadingDash));
        }

        /// Property: names containing whitespace are rejected
        #[test]
        fn whitespace_rejected(a in "[A-Za-z0-9]{1,8}", ws in "[ \t\r\n]", b in "[A-Za-z0-9]{0,8}") {
            let name = format!("{a}{ws}{b}");
            prop_assert!(validate_branch_name(&name).is_err());
        }

        /// Property: accepted names only use the allowed characters
        #[test]
        fn accepted_names_use_safe_characters(input in ".{0,40}") {
            if validate_branch_name(&input).is_ok() {
                prop_assert!(input
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-')));
                prop_assert!(!input.contains(".."));
                prop_assert!(!input.starts_with('-'));
            }
        }

        /// Property: branches built from safe components are accepted
        #[test]
        fn safe_branches_accepted(branch in BRANCH) {
            prop_assert_eq!(validate_branch_name(&branch), Ok(()));
        }
    }
}
