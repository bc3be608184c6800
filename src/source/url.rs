//! Source URL parsing utilities
//!
//! Splits `scheme://host[:port]/path?key=value` strings into their parts and
//! recognises SCP-style SSH addresses (`git@host:org/repo.git`).

use crate::error::{KclError, Result};

pub const GIT_SCHEME: &str = "git";
pub const SSH_SCHEME: &str = "ssh";
pub const OCI_SCHEME: &str = "oci";
pub const FILE_SCHEME: &str = "file";
pub const HTTP_SCHEME: &str = "http";
pub const HTTPS_SCHEME: &str = "https";

/// Query keys carrying source refinements
pub const TAG_KEY: &str = "tag";
pub const COMMIT_KEY: &str = "commit";
pub const BRANCH_KEY: &str = "branch";

/// Hosts whose plain http(s) urls are git repositories rather than OCI registries
const GIT_FORGE_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org", "gitee.com"];

/// A url with an explicit scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    /// Lowercased scheme without `://`
    pub scheme: String,
    /// Authority: optional `user@`, host and optional `:port`
    pub host: String,
    /// Path without the leading `/`
    pub path: String,
    /// Query parameters in input order
    pub query: Vec<(String, String)>,
}

impl SourceUrl {
    /// Parse `input` if it carries a `scheme://` prefix.
    ///
    /// Returns `Ok(None)` when there is no scheme, so callers can try other
    /// interpretations.
    pub fn parse(input: &str) -> Result<Option<Self>> {
        let Some((scheme, rest)) = split_scheme(input) else {
            return Ok(None);
        };

        let (location, query) = match rest.split_once('?') {
            Some((location, query)) => (location, parse_query(query)),
            None => (rest, Vec::new()),
        };
        let location = location.split('#').next().unwrap_or_default();

        let (host, path) = match location.split_once('/') {
            Some((host, path)) => (host, path),
            None => (location, ""),
        };

        if host.contains(char::is_whitespace) || path.contains(char::is_whitespace) {
            return Err(KclError::InvalidUrl {
                url: input.to_string(),
                reason: "urls must not contain whitespace".to_string(),
            });
        }

        Ok(Some(Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_string(),
            path: path.trim_end_matches('/').to_string(),
            query,
        }))
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// The url rebuilt with another scheme and without its query
    pub fn with_scheme(&self, scheme: &str) -> String {
        if self.path.is_empty() {
            format!("{scheme}://{}", self.host)
        } else {
            format!("{scheme}://{}/{}", self.host, self.path)
        }
    }

    /// The url without its query
    pub fn without_query(&self) -> String {
        self.with_scheme(&self.scheme)
    }

    /// Host without any `user@` prefix or `:port` suffix
    pub fn hostname(&self) -> &str {
        let host = self.host.rsplit('@').next().unwrap_or_default();
        host.split(':').next().unwrap_or_default()
    }

    /// Whether a plain http(s) url points at a git repository
    pub fn looks_like_git_repository(&self) -> bool {
        self.path.ends_with(".git")
            || GIT_FORGE_HOSTS
                .iter()
                .any(|forge| self.hostname().eq_ignore_ascii_case(forge))
    }
}

/// Split `scheme://rest`, validating the scheme characters
pub fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

/// Check if input is an SCP-style SSH address (`user@host:path`)
pub fn is_scp_like(input: &str) -> bool {
    if input.contains("://") {
        return false;
    }
    let Some((user_host, path)) = input.split_once(':') else {
        return false;
    };
    let Some((user, host)) = user_host.split_once('@') else {
        return false;
    };
    !user.is_empty()
        && !host.is_empty()
        && !path.is_empty()
        && !user_host.contains('/')
        && !host.contains(char::is_whitespace)
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_oci_url() {
        let url = SourceUrl::parse("oci://ghcr.io/kcl-lang/helloworld?tag=0.1.0")
            .unwrap()
            .unwrap();
        assert_eq!(url.scheme, "oci");
        assert_eq!(url.host, "ghcr.io");
        assert_eq!(url.path, "kcl-lang/helloworld");
        assert_eq!(url.query_value(TAG_KEY), Some("0.1.0"));
    }

    #[test]
    fn test_parse_port_in_host() {
        let url = SourceUrl::parse("oci://localhost:5001/test/pkg")
            .unwrap()
            .unwrap();
        assert_eq!(url.host, "localhost:5001");
        assert_eq!(url.hostname(), "localhost");
        assert_eq!(url.path, "test/pkg");
    }

    #[test]
    fn test_no_scheme_is_none() {
        assert!(SourceUrl::parse("k8s:1.28").unwrap().is_none());
        assert!(SourceUrl::parse("ghcr.io/kcl-lang/k8s").unwrap().is_none());
        assert!(SourceUrl::parse("/abs/path").unwrap().is_none());
    }

    #[test]
    fn test_uppercase_scheme_is_normalized() {
        let url = SourceUrl::parse("OCI://ghcr.io/a/b").unwrap().unwrap();
        assert_eq!(url.scheme, "oci");
    }

    #[test]
    fn test_with_scheme_drops_query() {
        let url = SourceUrl::parse("https://github.com/kcl-lang/konfig?tag=v0.4.0")
            .unwrap()
            .unwrap();
        assert_eq!(url.with_scheme(GIT_SCHEME), "git://github.com/kcl-lang/konfig");
        assert_eq!(url.without_query(), "https://github.com/kcl-lang/konfig");
    }

    #[test]
    fn test_looks_like_git_repository() {
        let forge = SourceUrl::parse("https://github.com/kcl-lang/konfig").unwrap().unwrap();
        assert!(forge.looks_like_git_repository());

        let dot_git = SourceUrl::parse("https://example.com/team/repo.git").unwrap().unwrap();
        assert!(dot_git.looks_like_git_repository());

        let registry = SourceUrl::parse("https://ghcr.io/kcl-lang/helloworld").unwrap().unwrap();
        assert!(!registry.looks_like_git_repository());
    }

    #[test]
    fn test_is_scp_like() {
        assert!(is_scp_like("git@github.com:kcl-lang/konfig.git"));
        assert!(!is_scp_like("ssh://git@github.com/kcl-lang/konfig.git"));
        assert!(!is_scp_like("k8s:1.28"));
        assert!(!is_scp_like("./dir/user@host:x"));
    }

    #[test]
    fn test_invalid_scheme_chars() {
        assert!(split_scheme("1oci://host/repo").is_none());
        assert!(split_scheme("://host/repo").is_none());
    }
}
