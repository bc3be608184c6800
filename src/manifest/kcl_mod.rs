//! Package manifest (kcl.mod)
//!
//! ```toml
//! [package]
//! name = "demo"
//! edition = "v0.11.2"
//! version = "0.0.1"
//!
//! [dependencies]
//! k8s = "1.28"
//! konfig = { git = "https://github.com/kcl-lang/konfig.git", tag = "v0.4.0" }
//! shared = { path = "../shared" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{KclError, Result};
use crate::source::{GitRef, ModSpec, Source, SourceFlags, resolve};

/// Edition written by `kcl mod init`
pub const DEFAULT_EDITION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Version written by `kcl mod init`
pub const DEFAULT_VERSION: &str = "0.0.1";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default)]
    pub edition: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Table form of a dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedDependency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oci: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

/// A `[dependencies]` entry: either `name = "1.28"` or `name = { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Version(String),
    Detailed(DetailedDependency),
}

impl DependencySpec {
    /// Manifest entry for a resolved source
    pub fn from_source(source: &Source, settings: &Settings) -> Self {
        let package = source.package().map(|p| p.name.clone());
        match source {
            Source::Local(local) => Self::Detailed(DetailedDependency {
                path: Some(local.path.display().to_string()),
                package,
                ..DetailedDependency::default()
            }),
            Source::Git(git) => {
                let mut detail = DetailedDependency {
                    git: Some(git.url.clone()),
                    package,
                    ..DetailedDependency::default()
                };
                match &git.reference {
                    Some(GitRef::Tag(tag)) => detail.tag = Some(tag.clone()),
                    Some(GitRef::Commit(commit)) => detail.commit = Some(commit.clone()),
                    Some(GitRef::Branch(branch)) => detail.branch = Some(branch.clone()),
                    None => {}
                }
                Self::Detailed(detail)
            }
            Source::Oci(oci) => Self::Detailed(DetailedDependency {
                oci: Some(oci.reference()),
                tag: oci.tag.clone(),
                package,
                ..DetailedDependency::default()
            }),
            Source::Registry(spec) => match &spec.version {
                Some(version) => Self::Version(version.clone()),
                None => Self::Detailed(DetailedDependency {
                    oci: Some(settings.registry_url(spec)),
                    ..DetailedDependency::default()
                }),
            },
        }
    }

    /// Source the entry `name` was recorded from, relative paths taken from `root`
    pub fn to_source(&self, name: &str, root: &Path) -> Result<Source> {
        let detail = match self {
            Self::Version(version) => {
                return Ok(Source::Registry(
                    ModSpec::new(name).with_version(version.as_str()),
                ));
            }
            Self::Detailed(detail) => detail,
        };

        if detail.git.is_none() && detail.oci.is_none() && detail.path.is_none() {
            let spec = ModSpec::new(detail.package.as_deref().unwrap_or(name));
            return Ok(Source::Registry(match &detail.version {
                Some(version) => spec.with_version(version.as_str()),
                None => spec,
            }));
        }

        let flags = SourceFlags {
            git: detail.git.clone(),
            oci: detail.oci.clone(),
            path: detail
                .path
                .as_deref()
                .map(|path| root.join(path).display().to_string()),
            tag: detail.tag.clone(),
            commit: detail.commit.clone(),
            branch: detail.branch.clone(),
        };
        let package = detail.package.as_deref().map(ModSpec::new);
        Ok(resolve::<&str>(&[], &flags)?.with_package(package))
    }

    /// Version, tag, commit or branch of the dependency, whichever is set first
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Version(version) => Some(version),
            Self::Detailed(detail) => detail
                .version
                .as_deref()
                .or(detail.tag.as_deref())
                .or(detail.commit.as_deref())
                .or(detail.branch.as_deref()),
        }
    }

    pub fn local_path(&self) -> Option<&str> {
        match self {
            Self::Detailed(detail) => detail.path.as_deref(),
            Self::Version(_) => None,
        }
    }

    /// Real package name of a renamed dependency
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::Detailed(detail) => detail.package.as_deref(),
            Self::Version(_) => None,
        }
    }
}

/// Parsed `kcl.mod`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub package: PackageInfo,
    /// Dependencies in file order
    pub dependencies: Vec<(String, DependencySpec)>,
    /// Other top-level sections, kept as-is
    pub extra: toml::Table,
}

impl Manifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            package: PackageInfo {
                name: name.into(),
                edition: DEFAULT_EDITION.to_string(),
                version: DEFAULT_VERSION.to_string(),
                description: None,
            },
            dependencies: Vec::new(),
            extra: toml::Table::new(),
        }
    }

    /// Parse manifest text; `path` is used in error messages only
    pub fn from_toml(content: &str, path: &str) -> Result<Self> {
        let parse_failed = |reason: String| KclError::ManifestParseFailed {
            path: path.to_string(),
            reason,
        };

        let mut table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            parse_failed(e.message().to_string())
        })?;

        let package = match table.remove("package") {
            Some(value) => value
                .try_into::<PackageInfo>()
                .map_err(|e| parse_failed(e.message().to_string()))?,
            None => return Err(parse_failed("missing [package] section".to_string())),
        };

        let mut dependencies = Vec::new();
        match table.remove("dependencies") {
            Some(toml::Value::Table(deps)) => {
                for (name, value) in deps {
                    let spec = value.try_into::<DependencySpec>().map_err(|e| {
                        parse_failed(format!("dependency '{name}': {}", e.message()))
                    })?;
                    dependencies.push((name, spec));
                }
            }
            Some(_) => return Err(parse_failed("[dependencies] must be a table".to_string())),
            None => {}
        }

        Ok(Self {
            package,
            dependencies,
            extra: table,
        })
    }

    /// Render with dependencies as inline tables
    pub fn to_toml(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Header<'a> {
            package: &'a PackageInfo,
        }

        let mut out = toml::to_string(&Header {
            package: &self.package,
        })?;

        out.push_str("\n[dependencies]\n");
        for (name, spec) in &self.dependencies {
            let mut value = String::new();
            spec.serialize(toml::ser::ValueSerializer::new(&mut value))?;
            out.push_str(&format!("{} = {}\n", toml_key(name), value));
        }

        if !self.extra.is_empty() {
            out.push('\n');
            out.push_str(&toml::to_string(&self.extra)?);
        }
        Ok(out)
    }

    #[cfg(test)]
    pub fn dependency(&self, name: &str) -> Option<&DependencySpec> {
        self.dependencies
            .iter()
            .find(|(dep, _)| dep == name)
            .map(|(_, spec)| spec)
    }

    /// Insert a dependency, replacing an existing entry of the same name in place
    pub fn add_dependency(&mut self, name: &str, spec: DependencySpec) {
        match self.dependencies.iter_mut().find(|(dep, _)| dep == name) {
            Some(entry) => entry.1 = spec,
            None => self.dependencies.push((name.to_string(), spec)),
        }
    }
}

fn toml_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        format!("{key:?}")
    }
}
