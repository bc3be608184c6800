//! `kcl mod add`

use std::path::Path;

use tracing::{debug, info};

use crate::common::fs::{CopyOptions, copy_dir_recursive};
use crate::error::{KclError, Result};
use crate::hash;
use crate::manifest::{DependencySpec, DetailedDependency, LockedDependency, Package};
use crate::source::{LocalSource, ModSpec, Source};

use super::ModClient;
use super::fetch::{load_local_package, locate_package};

#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Name to record the dependency under
    pub rename: Option<String>,
    /// Skip recording a content sum in kcl.mod.lock
    pub no_sum_check: bool,
}

/// What is known about the dependency after inspecting its source
pub(super) struct Inspected {
    /// Package name declared by the fetched kcl.mod, if any
    pub(super) name: Option<String>,
    pub(super) version: String,
    pub(super) sum: Option<String>,
    /// Commit a git source resolved to
    pub(super) commit: Option<String>,
}

impl Inspected {
    /// Lock entry for `source` recorded under `name`
    pub(super) fn lock_entry(
        self,
        client: &ModClient,
        name: &str,
        source: &Source,
    ) -> LockedDependency {
        let mut locked =
            LockedDependency::from_source(name, &self.version, source, self.sum, client.settings());
        if locked.commit.is_none() {
            locked.commit = self.commit;
        }
        locked
    }
}

impl ModClient {
    /// Add `source` as a dependency of `pkg` and save kcl.mod and kcl.mod.lock
    ///
    /// Returns the name the dependency was recorded under.
    pub fn add_dependency(
        &self,
        pkg: &mut Package,
        source: &Source,
        options: &AddOptions,
    ) -> Result<String> {
        let url = self.canonical_url(source);
        self.reporter().report(&format!("adding dependency '{url}'"));

        // A local sub-package is recorded by the directory it was found in
        let located;
        let source = match source {
            Source::Local(local) => {
                let dir = locate_package(&local.path, local.package.as_ref(), &url)?;
                if same_dir(&dir, &pkg.root) {
                    return Err(KclError::AddItselfAsDep {
                        name: pkg.name().to_string(),
                    });
                }
                located = Source::Local(LocalSource {
                    path: dir,
                    package: local.package.clone(),
                });
                &located
            }
            other => other,
        };

        let inspected = self.inspect(source, &url, options)?;
        let package_name = default_name(source, inspected.name.as_deref());
        let name = options
            .rename
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| package_name.clone());

        if name == pkg.name() {
            return Err(KclError::AddItselfAsDep { name });
        }

        let mut spec = DependencySpec::from_source(source, self.settings());
        if name != package_name {
            spec = renamed(self, spec, source, &package_name);
        }

        let version = inspected.version.clone();
        let locked = inspected.lock_entry(self, &name, source);

        debug!(dependency = %name, version = %version, "recording dependency");
        pkg.manifest.add_dependency(&name, spec);
        pkg.lock.upsert(locked);
        pkg.save()?;

        let shown = if version.is_empty() {
            name.clone()
        } else {
            format!("{name}:{version}")
        };
        info!(dependency = %shown, "added dependency");
        self.reporter()
            .report(&format!("add dependency '{shown}' successfully"));
        Ok(name)
    }

    /// Fetch what can be fetched to learn the dependency's name, version and sum
    pub(super) fn inspect(
        &self,
        source: &Source,
        url: &str,
        options: &AddOptions,
    ) -> Result<Inspected> {
        match source {
            Source::Local(local) => {
                let dir = locate_package(&local.path, local.package.as_ref(), url)?;
                let dep = load_local_package(&dir)?;
                let sum = if options.no_sum_check {
                    None
                } else {
                    Some(hash::hash_directory(&dir)?)
                };
                Ok(Inspected {
                    name: Some(dep.name().to_string()),
                    version: dep.version().to_string(),
                    sum,
                    commit: None,
                })
            }
            Source::Git(git) => {
                let checkout = self.fetch_git(git)?;
                let dir = locate_package(checkout.path(), git.package.as_ref(), url)?;
                let dep = load_local_package(&dir)?;
                let version = if dep.version().is_empty() {
                    git.reference
                        .as_ref()
                        .map(|r| r.value().to_string())
                        .unwrap_or_default()
                } else {
                    dep.version().to_string()
                };
                let sum = if options.no_sum_check {
                    None
                } else {
                    Some(hash::hash_directory(&dir)?)
                };

                let cached = self.cached_package_dir(dep.name(), &version);
                if !cached.exists() {
                    copy_dir_recursive(&dir, &cached, &CopyOptions::exclude_git())?;
                    debug!(path = %cached.display(), "cached git dependency");
                }

                Ok(Inspected {
                    name: Some(dep.name().to_string()),
                    version,
                    sum,
                    commit: Some(checkout.sha.clone()),
                })
            }
            Source::Oci(oci) => {
                self.reporter().warn(&format!(
                    "'{url}' is recorded without fetching; its content sum is not checked"
                ));
                Ok(Inspected {
                    name: None,
                    version: oci.tag.clone().unwrap_or_default(),
                    sum: None,
                    commit: None,
                })
            }
            Source::Registry(spec) => Ok(Inspected {
                name: None,
                version: spec.version_str().to_string(),
                sum: None,
                commit: None,
            }),
        }
    }
}

/// Name precedence after `--rename`: sub-package, registry spec name,
/// fetched kcl.mod name, last url or path segment
fn default_name(source: &Source, fetched: Option<&str>) -> String {
    if let Some(package) = source.package() {
        return package.name.clone();
    }
    if let Source::Registry(spec) = source {
        return spec.name.clone();
    }
    if let Some(name) = fetched {
        return name.to_string();
    }
    match source {
        Source::Registry(spec) => spec.name.clone(),
        Source::Git(git) => git.repository_name(),
        Source::Oci(oci) => oci.repository_name(),
        Source::Local(local) => local
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

/// Keep the real package name in the manifest when the dependency is renamed
fn renamed(
    client: &ModClient,
    spec: DependencySpec,
    source: &Source,
    package_name: &str,
) -> DependencySpec {
    let mut detail = match spec {
        DependencySpec::Detailed(detail) => detail,
        DependencySpec::Version(version) => {
            let oci = match source {
                Source::Registry(reg) => client
                    .settings()
                    .registry_url(&ModSpec::new(reg.name.as_str())),
                other => other.to_url(),
            };
            DetailedDependency {
                oci: Some(oci),
                tag: Some(version),
                ..DetailedDependency::default()
            }
        }
    };
    detail.package.get_or_insert_with(|| package_name.to_string());
    DependencySpec::Detailed(detail)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
