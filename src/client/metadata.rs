//! `kcl mod metadata`

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::manifest::{Package, lock_file};

use super::ModClient;

/// Directory dependencies are vendored into when vendor mode is on
pub const VENDOR_DIR: &str = "vendor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: String,
    pub manifest_path: PathBuf,
}

/// Where each dependency of a package lives on disk
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub packages: BTreeMap<String, PackageMetadata>,
}

impl Metadata {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ModClient {
    pub fn metadata(&self, package: &Package, vendor: bool) -> Metadata {
        let base = if vendor {
            package.root.join(VENDOR_DIR)
        } else {
            self.settings().home.clone()
        };

        let packages = package
            .manifest
            .dependencies
            .iter()
            .map(|(name, spec)| {
                let manifest_path = match package.local_dependency_dir(spec) {
                    Some(dir) => dunce::canonicalize(&dir).unwrap_or(dir),
                    None => {
                        let version = package
                            .lock
                            .dependency(name)
                            .map(|l| l.version.as_str())
                            .or_else(|| spec.version())
                            .unwrap_or_default();
                        base.join(lock_file::full_name(spec.package().unwrap_or(name), version))
                    }
                };
                let entry = PackageMetadata {
                    name: name.clone(),
                    manifest_path,
                };
                (name.clone(), entry)
            })
            .collect();

        Metadata { packages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use crate::manifest::{DependencySpec, DetailedDependency, LockFile, Manifest};
    use tempfile::TempDir;

    fn package(root: &std::path::Path) -> Package {
        let mut manifest = Manifest::new("app");
        manifest.add_dependency("k8s", DependencySpec::Version("1.28".to_string()));
        manifest.add_dependency(
            "shared",
            DependencySpec::Detailed(DetailedDependency {
                path: Some("shared".to_string()),
                ..DetailedDependency::default()
            }),
        );
        std::fs::create_dir_all(root.join("shared")).unwrap();
        Package {
            root: root.to_path_buf(),
            manifest,
            lock: LockFile::default(),
        }
    }

    #[test]
    fn test_metadata_uses_package_home() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        let metadata = client.metadata(&package(work.path()), false);
        assert_eq!(
            metadata.packages["k8s"].manifest_path,
            home.path().join("k8s_1.28")
        );
        assert_eq!(
            metadata.packages["shared"].manifest_path,
            dunce::canonicalize(work.path().join("shared")).unwrap()
        );
    }

    #[test]
    fn test_metadata_vendor_mode() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        let metadata = client.metadata(&package(work.path()), true);
        assert_eq!(
            metadata.packages["k8s"].manifest_path,
            work.path().join("vendor/k8s_1.28")
        );
    }

    #[test]
    fn test_metadata_json_shape() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        let json = client.metadata(&package(work.path()), false).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["packages"]["k8s"]["name"], "k8s");
        assert!(value["packages"]["shared"]["manifest_path"].is_string());
    }
}
