//! Lock file (kcl.mod.lock)
//!
//! Records the exact origin of every dependency and, for content that is
//! available locally, a BLAKE3 checksum:
//!
//! ```toml
//! [dependencies]
//!   [dependencies.k8s]
//!     name = "k8s"
//!     full_name = "k8s_1.28"
//!     version = "1.28"
//!     reg = "ghcr.io"
//!     repo = "kcl-lang/k8s"
//!     oci_tag = "1.28"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{KclError, Result};
use crate::source::{GitRef, Source};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedDependency {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<String>,

    // git
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    // oci
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oci_tag: Option<String>,

    // local
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl LockedDependency {
    /// Lock entry for a resolved source
    pub fn from_source(
        name: &str,
        version: &str,
        source: &Source,
        sum: Option<String>,
        settings: &Settings,
    ) -> Self {
        let mut locked = Self {
            name: name.to_string(),
            full_name: full_name(name, version),
            version: version.to_string(),
            sum,
            package: source.package().map(|p| p.name.clone()),
            ..Self::default()
        };

        match source {
            Source::Local(local) => locked.path = Some(local.path.display().to_string()),
            Source::Git(git) => {
                locked.url = Some(git.url.clone());
                match &git.reference {
                    Some(GitRef::Tag(tag)) => locked.git_tag = Some(tag.clone()),
                    Some(GitRef::Commit(commit)) => locked.commit = Some(commit.clone()),
                    Some(GitRef::Branch(branch)) => locked.branch = Some(branch.clone()),
                    None => {}
                }
            }
            Source::Oci(oci) => {
                locked.reg = Some(oci.registry.clone());
                locked.repo = Some(oci.repository.clone());
                locked.oci_tag = oci.tag.clone();
            }
            Source::Registry(spec) => {
                locked.reg = Some(settings.default_oci_registry.clone());
                locked.repo = Some(format!("{}/{}", settings.default_oci_repo, spec.name));
                locked.oci_tag = spec.version.clone();
            }
        }
        locked
    }
}

/// `name_version`, or just `name` when the version is unknown
pub fn full_name(name: &str, version: &str) -> String {
    if version.is_empty() {
        name.to_string()
    } else {
        format!("{name}_{version}")
    }
}

/// Parsed `kcl.mod.lock`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockFile {
    /// Locked dependencies in file order
    pub dependencies: Vec<LockedDependency>,
}

impl LockFile {
    pub fn from_toml(content: &str, path: &str) -> Result<Self> {
        let parse_failed = |reason: String| KclError::ManifestParseFailed {
            path: path.to_string(),
            reason,
        };

        let mut table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| parse_failed(e.message().to_string()))?;

        let mut dependencies = Vec::new();
        if let Some(toml::Value::Table(deps)) = table.remove("dependencies") {
            for (name, value) in deps {
                let locked = value.try_into::<LockedDependency>().map_err(|e| {
                    parse_failed(format!("dependency '{name}': {}", e.message()))
                })?;
                dependencies.push(locked);
            }
        }
        Ok(Self { dependencies })
    }

    pub fn to_toml(&self) -> Result<String> {
        let mut deps = toml::Table::new();
        for locked in &self.dependencies {
            deps.insert(locked.name.clone(), toml::Value::try_from(locked)?);
        }
        let mut root = toml::Table::new();
        root.insert("dependencies".to_string(), toml::Value::Table(deps));
        Ok(toml::to_string(&root)?)
    }

    pub fn dependency(&self, name: &str) -> Option<&LockedDependency> {
        self.dependencies.iter().find(|dep| dep.name == name)
    }

    /// Insert or replace the entry with the same name
    pub fn upsert(&mut self, locked: LockedDependency) {
        match self.dependencies.iter_mut().find(|dep| dep.name == locked.name) {
            Some(entry) => *entry = locked,
            None => self.dependencies.push(locked),
        }
    }
}
