//! Source resolution from positional arguments and flags
//!
//! Turns the loose command line inputs of `kcl mod add` / `kcl mod pull`
//! (`k8s:1.28`, `./local`, `oci://ghcr.io/kcl-lang/helloworld`, `--git URL --tag v1`,
//! ...) into exactly one [`Source`].
//!
//! Positional arguments are classified one at a time, in this order:
//! 1. an existing file or directory is a local source
//! 2. `name[:version]` is a registry spec
//! 3. a url with a scheme (or an SCP-style ssh address) is a git, oci or local source
//!
//! Without a positional source, `--git`, `--oci` and `--path` supply one. A
//! registry spec next to a concrete source names the sub-package within that
//! source. Any second source-shaped input is an error.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{KclError, Result};

use super::descriptor::{GitRef, GitSource, LocalSource, OciSource, Source};
use super::spec::ModSpec;
use super::url::{
    self, BRANCH_KEY, COMMIT_KEY, FILE_SCHEME, GIT_SCHEME, HTTP_SCHEME, HTTPS_SCHEME, OCI_SCHEME,
    SSH_SCHEME, SourceUrl, TAG_KEY,
};

const ONLY_ONE_SOURCE: &str = "only one source is allowed";
const ONLY_ONE_MODSPEC: &str = "only one modspec is allowed";

/// Source flags as given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFlags {
    pub git: Option<String>,
    pub oci: Option<String>,
    pub path: Option<String>,
    pub tag: Option<String>,
    pub commit: Option<String>,
    pub branch: Option<String>,
}

impl SourceFlags {
    fn git(&self) -> Option<&str> {
        non_empty(self.git.as_deref())
    }

    fn oci(&self) -> Option<&str> {
        non_empty(self.oci.as_deref())
    }

    /// `--path ""` is kept so it can be reported as an empty local path
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn refinements(&self) -> Vec<GitRef> {
        let mut refs = Vec::new();
        if let Some(tag) = non_empty(self.tag.as_deref()) {
            refs.push(GitRef::Tag(tag.to_string()));
        }
        if let Some(commit) = non_empty(self.commit.as_deref()) {
            refs.push(GitRef::Commit(commit.to_string()));
        }
        if let Some(branch) = non_empty(self.branch.as_deref()) {
            refs.push(GitRef::Branch(branch.to_string()));
        }
        refs
    }
}

/// A classified positional argument
#[derive(Debug)]
enum Positional {
    Spec(ModSpec),
    Source(Source),
}

/// Resolve positional arguments and flags into exactly one source
pub fn resolve<S: AsRef<str>>(positional: &[S], flags: &SourceFlags) -> Result<Source> {
    let mut located: Option<Source> = None;
    let mut spec: Option<ModSpec> = None;

    for arg in positional {
        match classify(arg.as_ref())? {
            Positional::Spec(found) => {
                if spec.is_some() {
                    return Err(ambiguous(ONLY_ONE_MODSPEC));
                }
                spec = Some(found);
            }
            Positional::Source(found) => {
                if located.is_some() {
                    return Err(ambiguous(ONLY_ONE_SOURCE));
                }
                located = Some(found);
            }
        }
    }

    let from_flags = source_from_flags(flags)?;
    let source = match (located, from_flags) {
        (Some(_), Some(_)) => return Err(ambiguous(ONLY_ONE_SOURCE)),
        (Some(source), None) | (None, Some(source)) => source.with_package(spec),
        (None, None) => match spec {
            Some(spec) => Source::Registry(spec),
            None => return Err(KclError::NoSource),
        },
    };

    let source = refine(source, &flags.refinements())?;
    debug!(kind = source.kind(), source = %source, "resolved package source");
    Ok(source)
}

fn classify(arg: &str) -> Result<Positional> {
    if arg.is_empty() {
        return Err(KclError::EmptyLocalPath);
    }

    if Path::new(arg).exists() {
        return Ok(Positional::Source(Source::Local(LocalSource {
            path: PathBuf::from(arg),
            package: None,
        })));
    }

    if ModSpec::matches(arg) {
        return ModSpec::parse(arg).map(Positional::Spec);
    }

    if let Some(parsed) = SourceUrl::parse(arg)? {
        return source_from_url(arg, &parsed).map(Positional::Source);
    }

    if url::is_scp_like(arg) {
        return Ok(Positional::Source(Source::Git(GitSource {
            url: arg.to_string(),
            reference: None,
            package: None,
        })));
    }

    if looks_like_path(arg) {
        return Err(KclError::PathNotExist {
            path: arg.to_string(),
        });
    }

    Err(KclError::InvalidSpec {
        input: arg.to_string(),
    })
}

/// Interpret a positional url by its scheme
fn source_from_url(input: &str, parsed: &SourceUrl) -> Result<Source> {
    match parsed.scheme.as_str() {
        GIT_SCHEME | SSH_SCHEME => git_from_url(input, parsed),
        OCI_SCHEME => oci_from_url(input, parsed),
        FILE_SCHEME => local_from_file_url(parsed),
        HTTP_SCHEME | HTTPS_SCHEME if parsed.looks_like_git_repository() => {
            git_from_url(input, parsed)
        }
        HTTP_SCHEME | HTTPS_SCHEME => oci_from_url(input, parsed),
        other => Err(KclError::InvalidUrl {
            url: input.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn source_from_flags(flags: &SourceFlags) -> Result<Option<Source>> {
    let given = [flags.git(), flags.oci(), flags.path()]
        .iter()
        .filter(|flag| flag.is_some())
        .count();
    if given > 1 {
        return Err(ambiguous(ONLY_ONE_SOURCE));
    }

    if let Some(git) = flags.git() {
        return git_from_flag(git).map(Some);
    }
    if let Some(oci) = flags.oci() {
        return oci_from_flag(oci).map(Some);
    }
    if let Some(path) = flags.path() {
        return local_from_flag(path).map(Some);
    }
    Ok(None)
}

fn git_from_flag(input: &str) -> Result<Source> {
    match SourceUrl::parse(input)? {
        Some(parsed) if parsed.scheme == OCI_SCHEME => Err(KclError::InvalidUrl {
            url: input.to_string(),
            reason: "invalid git url".to_string(),
        }),
        Some(parsed) => git_from_url(input, &parsed),
        None if url::is_scp_like(input) => Ok(Source::Git(GitSource {
            url: input.to_string(),
            reference: None,
            package: None,
        })),
        None => Err(KclError::InvalidUrl {
            url: input.to_string(),
            reason: "invalid git url".to_string(),
        }),
    }
}

fn oci_from_flag(input: &str) -> Result<Source> {
    match SourceUrl::parse(input)? {
        Some(parsed) if matches!(parsed.scheme.as_str(), OCI_SCHEME | HTTP_SCHEME | HTTPS_SCHEME) => {
            oci_from_url(input, &parsed)
        }
        Some(_) => Err(KclError::InvalidUrl {
            url: input.to_string(),
            reason: "invalid oci url".to_string(),
        }),
        None => {
            // Scheme-less `registry/repository`
            let with_scheme = format!("{OCI_SCHEME}://{input}");
            match SourceUrl::parse(&with_scheme)? {
                Some(parsed) => oci_from_url(input, &parsed),
                None => Err(KclError::InvalidUrl {
                    url: input.to_string(),
                    reason: "invalid oci url".to_string(),
                }),
            }
        }
    }
}

fn local_from_flag(path: &str) -> Result<Source> {
    if path.is_empty() {
        return Err(KclError::EmptyLocalPath);
    }
    if !Path::new(path).exists() {
        return Err(KclError::PathNotExist {
            path: path.to_string(),
        });
    }
    Ok(Source::Local(LocalSource {
        path: PathBuf::from(path),
        package: None,
    }))
}

fn git_from_url(input: &str, parsed: &SourceUrl) -> Result<Source> {
    let missing_host = parsed.host.is_empty() && parsed.scheme != FILE_SCHEME;
    if missing_host || parsed.path.is_empty() {
        return Err(KclError::InvalidUrl {
            url: input.to_string(),
            reason: "invalid git url".to_string(),
        });
    }

    let mut reference = None;
    for (key, value) in &parsed.query {
        let found = match key.as_str() {
            TAG_KEY => GitRef::Tag(value.clone()),
            COMMIT_KEY => GitRef::Commit(value.clone()),
            BRANCH_KEY => GitRef::Branch(value.clone()),
            _ => continue,
        };
        if !value.is_empty() {
            reference = merge_git_ref(reference, found)?;
        }
    }

    Ok(Source::Git(GitSource {
        url: parsed.without_query(),
        reference,
        package: None,
    }))
}

fn oci_from_url(input: &str, parsed: &SourceUrl) -> Result<Source> {
    if parsed.host.is_empty() {
        return Err(KclError::InvalidUrl {
            url: input.to_string(),
            reason: "missing registry host".to_string(),
        });
    }
    if parsed.path.is_empty() {
        return Err(KclError::InvalidUrl {
            url: input.to_string(),
            reason: "missing repository".to_string(),
        });
    }
    for key in [COMMIT_KEY, BRANCH_KEY] {
        if parsed.query_value(key).is_some() {
            return Err(KclError::UnsupportedRefinement {
                refinement: key.to_string(),
                kind: "oci".to_string(),
            });
        }
    }

    Ok(Source::Oci(OciSource {
        registry: parsed.host.clone(),
        repository: parsed.path.clone(),
        tag: parsed.query_value(TAG_KEY).map(str::to_string),
        package: None,
    }))
}

fn local_from_file_url(parsed: &SourceUrl) -> Result<Source> {
    let path = match (parsed.host.as_str(), parsed.path.as_str()) {
        ("", "") => String::new(),
        ("", path) => format!("/{path}"),
        (host, "") => host.to_string(),
        (host, path) => format!("{host}/{path}"),
    };
    local_from_flag(&path)
}

/// Attach tag/commit/branch flags to the selected source
fn refine(source: Source, refinements: &[GitRef]) -> Result<Source> {
    match source {
        Source::Git(mut git) => {
            for reference in refinements {
                git.reference = merge_git_ref(git.reference.take(), reference.clone())?;
            }
            Ok(Source::Git(git))
        }
        Source::Oci(mut oci) => {
            for reference in refinements {
                match reference {
                    GitRef::Tag(tag) => oci.tag = merge_tag(oci.tag.take(), tag, "tag")?,
                    other => return Err(unsupported(other, "oci")),
                }
            }
            Ok(Source::Oci(oci))
        }
        Source::Registry(mut spec) => {
            for reference in refinements {
                match reference {
                    GitRef::Tag(tag) => spec.version = merge_tag(spec.version.take(), tag, "version")?,
                    other => return Err(unsupported(other, "registry")),
                }
            }
            Ok(Source::Registry(spec))
        }
        Source::Local(local) => match refinements.first() {
            Some(reference) => Err(unsupported(reference, "local")),
            None => Ok(Source::Local(local)),
        },
    }
}

fn merge_git_ref(current: Option<GitRef>, incoming: GitRef) -> Result<Option<GitRef>> {
    match current {
        None => Ok(Some(incoming)),
        Some(current) if current == incoming => Ok(Some(current)),
        Some(current) => Err(KclError::ConflictingRefinement {
            first: current.to_string(),
            second: incoming.to_string(),
        }),
    }
}

fn merge_tag(current: Option<String>, incoming: &str, current_kind: &str) -> Result<Option<String>> {
    match current {
        None => Ok(Some(incoming.to_string())),
        Some(current) if current == incoming => Ok(Some(current)),
        Some(current) => Err(KclError::ConflictingRefinement {
            first: format!("{current_kind} '{current}'"),
            second: GitRef::Tag(incoming.to_string()).to_string(),
        }),
    }
}

fn unsupported(reference: &GitRef, kind: &str) -> KclError {
    KclError::UnsupportedRefinement {
        refinement: reference.kind().to_string(),
        kind: kind.to_string(),
    }
}

fn ambiguous(message: &str) -> KclError {
    KclError::AmbiguousSource {
        message: message.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn looks_like_path(arg: &str) -> bool {
    arg.contains(['/', '\\'])
        || arg.starts_with('.')
        || arg.starts_with('~')
        || Path::new(arg).is_absolute()
        || (!arg.contains(':') && Path::new(arg).extension().is_some())
}
