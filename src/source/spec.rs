//! Registry package specs
//!
//! The shorthand `name` or `name:version` form used to refer to a package in the
//! default registry, e.g. `k8s` or `k8s:1.28`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{KclError, Result};

/// `NAME[:VERSION]`. Names never contain `/`, `.` or a second `:`, so paths and
/// urls such as `oci://host:5000/repo` can never match.
static MOD_SPEC_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_-]*)(?::([A-Za-z0-9][A-Za-z0-9_.+-]*))?$").unwrap()
});

/// A package name with an optional version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModSpec {
    pub name: String,
    pub version: Option<String>,
}

impl ModSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Parse `name` or `name:version`
    pub fn parse(input: &str) -> Result<Self> {
        let captures = MOD_SPEC_RE
            .captures(input)
            .ok_or_else(|| KclError::InvalidSpec {
                input: input.to_string(),
            })?;

        Ok(Self {
            name: captures[1].to_string(),
            version: captures.get(2).map(|m| m.as_str().to_string()),
        })
    }

    /// Whether the input has the shape of a spec at all
    pub fn matches(input: &str) -> bool {
        MOD_SPEC_RE.is_match(input)
    }

    /// Version or the empty string
    pub fn version_str(&self) -> &str {
        self.version.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for ModSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
