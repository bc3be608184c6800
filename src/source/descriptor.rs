//! Source descriptors
//!
//! A [`Source`] is the single, normalized answer to "where does this package
//! come from". Exactly one variant is active; refinements (tag, commit, branch)
//! live inside the variant they refine.

use std::fmt;
use std::path::PathBuf;

use super::spec::ModSpec;
use super::url::{BRANCH_KEY, COMMIT_KEY, GIT_SCHEME, HTTPS_SCHEME, OCI_SCHEME, TAG_KEY};

/// A git reference refinement. At most one is ever set on a git source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
    Tag(String),
    Commit(String),
    Branch(String),
}

impl GitRef {
    /// Query key / manifest field name for this reference
    pub fn kind(&self) -> &'static str {
        match self {
            GitRef::Tag(_) => TAG_KEY,
            GitRef::Commit(_) => COMMIT_KEY,
            GitRef::Branch(_) => BRANCH_KEY,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            GitRef::Tag(v) | GitRef::Commit(v) | GitRef::Branch(v) => v,
        }
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.value())
    }
}

/// Package on the local file system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSource {
    /// Path as given by the user (relative or absolute)
    pub path: PathBuf,
    /// Sub-package selected within the directory
    pub package: Option<ModSpec>,
}

/// Package in a git repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    /// Repository url without query parameters
    pub url: String,
    pub reference: Option<GitRef>,
    /// Sub-package selected within the repository
    pub package: Option<ModSpec>,
}

impl GitSource {
    pub fn tag(&self) -> Option<&str> {
        match &self.reference {
            Some(GitRef::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    pub fn commit(&self) -> Option<&str> {
        match &self.reference {
            Some(GitRef::Commit(commit)) => Some(commit),
            _ => None,
        }
    }

    pub fn branch(&self) -> Option<&str> {
        match &self.reference {
            Some(GitRef::Branch(branch)) => Some(branch),
            _ => None,
        }
    }

    /// Url handed to the git transport. `git://` is a source marker only and
    /// is fetched over https.
    pub fn clone_url(&self) -> String {
        match self.url.strip_prefix("git://") {
            Some(rest) => format!("{HTTPS_SCHEME}://{rest}"),
            None => self.url.clone(),
        }
    }

    /// Last url segment without `.git`, e.g. `konfig`
    pub fn repository_name(&self) -> String {
        last_segment(&self.url).trim_end_matches(".git").to_string()
    }
}

/// Package stored as an OCI artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciSource {
    /// Registry host, with port when given (e.g. `localhost:5001`)
    pub registry: String,
    /// Repository path within the registry (e.g. `kcl-lang/helloworld`)
    pub repository: String,
    pub tag: Option<String>,
    /// Sub-package selected within the artifact
    pub package: Option<ModSpec>,
}

impl OciSource {
    /// `oci://registry/repository` without tag
    pub fn reference(&self) -> String {
        format!("{OCI_SCHEME}://{}/{}", self.registry, self.repository)
    }

    /// Last repository segment, e.g. `helloworld`
    pub fn repository_name(&self) -> String {
        last_segment(&self.repository).to_string()
    }
}

/// The resolved origin of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(LocalSource),
    Git(GitSource),
    Oci(OciSource),
    /// Shorthand spec resolved through the default registry
    Registry(ModSpec),
}

impl Source {
    /// Human readable kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Local(_) => "local",
            Source::Git(_) => "git",
            Source::Oci(_) => "oci",
            Source::Registry(_) => "registry",
        }
    }

    /// Sub-package selected within the source, if any
    pub fn package(&self) -> Option<&ModSpec> {
        match self {
            Source::Local(local) => local.package.as_ref(),
            Source::Git(git) => git.package.as_ref(),
            Source::Oci(oci) => oci.package.as_ref(),
            Source::Registry(_) => None,
        }
    }

    /// Select `package` within the source; registry specs name their package already
    #[must_use]
    pub fn with_package(self, package: Option<ModSpec>) -> Self {
        let Some(package) = package else {
            return self;
        };
        match self {
            Source::Local(local) => Source::Local(LocalSource {
                package: Some(package),
                ..local
            }),
            Source::Git(git) => Source::Git(GitSource {
                package: Some(package),
                ..git
            }),
            Source::Oci(oci) => Source::Oci(OciSource {
                package: Some(package),
                ..oci
            }),
            registry @ Source::Registry(_) => registry,
        }
    }

    /// Canonical url form of the source
    ///
    /// - local: the path as given
    /// - git: `git://host/repo?tag=v1` (ssh and SCP urls keep their form)
    /// - oci: `oci://registry/repo?tag=0.1.0`
    /// - registry: `name` or `name:version`
    pub fn to_url(&self) -> String {
        match self {
            Source::Local(local) => local.path.display().to_string(),
            Source::Git(git) => {
                let base = match git.url.split_once("://") {
                    Some((scheme, rest))
                        if scheme.eq_ignore_ascii_case("http")
                            || scheme.eq_ignore_ascii_case(HTTPS_SCHEME) =>
                    {
                        format!("{GIT_SCHEME}://{rest}")
                    }
                    _ => git.url.clone(),
                };
                match &git.reference {
                    Some(reference) => {
                        format!("{base}?{}={}", reference.kind(), reference.value())
                    }
                    None => base,
                }
            }
            Source::Oci(oci) => match &oci.tag {
                Some(tag) => format!("{}?{TAG_KEY}={tag}", oci.reference()),
                None => oci.reference(),
            },
            Source::Registry(spec) => spec.to_string(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(path)
}
