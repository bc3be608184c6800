//! `kcl mod update`

use tracing::{debug, info};

use crate::error::Result;
use crate::manifest::{LockFile, Package};

use super::{AddOptions, ModClient};

impl ModClient {
    /// Rebuild kcl.mod.lock from the dependencies declared in kcl.mod
    ///
    /// Git dependencies are fetched again and cached, local ones re-summed.
    /// Lock entries without a kcl.mod counterpart are dropped.
    pub fn update(&self, pkg: &mut Package, no_sum_check: bool) -> Result<()> {
        let options = AddOptions {
            no_sum_check,
            ..AddOptions::default()
        };

        let mut lock = LockFile::default();
        for (name, spec) in &pkg.manifest.dependencies {
            let source = spec.to_source(name, &pkg.root)?;
            let url = self.canonical_url(&source);
            self.reporter().report(&format!("updating '{url}'"));

            let mut locked = self.inspect(&source, &url, &options)?.lock_entry(self, name, &source);
            if let Some(path) = spec.local_path() {
                locked.path = Some(path.to_string());
            }
            debug!(dependency = %name, version = %locked.version, "locked dependency");
            lock.upsert(locked);
        }

        let dropped = pkg
            .lock
            .dependencies
            .iter()
            .filter(|old| lock.dependency(&old.name).is_none())
            .count();
        pkg.lock = lock;
        pkg.save()?;

        info!(package = %pkg.name(), dropped, "updated lock file");
        self.reporter()
            .report(&format!("package '{}' updated successfully", pkg.name()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use crate::git::tests::init_repo;
    use crate::hash;
    use crate::manifest::{DependencySpec, DetailedDependency, LockedDependency, Manifest};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_package(dir: &Path, name: &str, version: &str, deps: &[(&str, DependencySpec)]) {
        let mut manifest = Manifest::new(name);
        manifest.package.version = version.to_string();
        for (dep, spec) in deps {
            manifest.add_dependency(dep, spec.clone());
        }
        std::fs::create_dir_all(dir).unwrap();
        Package {
            root: dir.to_path_buf(),
            manifest,
            lock: LockFile::default(),
        }
        .save()
        .unwrap();
    }

    fn path_dep(path: &str) -> DependencySpec {
        DependencySpec::Detailed(DetailedDependency {
            path: Some(path.to_string()),
            ..DetailedDependency::default()
        })
    }

    #[test]
    fn test_update_rebuilds_lock_from_manifest() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, reporter) = client(home.path());

        write_package(&work.path().join("shared"), "shared", "0.2.0", &[]);
        let app = work.path().join("app");
        write_package(
            &app,
            "app",
            "0.1.0",
            &[
                ("shared", path_dep("../shared")),
                ("k8s", DependencySpec::Version("1.28".to_string())),
            ],
        );

        let mut pkg = Package::load(&app).unwrap();
        pkg.lock.upsert(LockedDependency {
            name: "stale".to_string(),
            full_name: "stale_0.0.1".to_string(),
            version: "0.0.1".to_string(),
            ..LockedDependency::default()
        });

        client.update(&mut pkg, false).unwrap();

        let reloaded = Package::load(&app).unwrap();
        let names: Vec<&str> = reloaded
            .lock
            .dependencies
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, ["shared", "k8s"]);

        let shared = reloaded.lock.dependency("shared").unwrap();
        assert_eq!(shared.version, "0.2.0");
        assert_eq!(shared.path.as_deref(), Some("../shared"));
        assert!(shared.sum.as_deref().unwrap().starts_with(hash::HASH_PREFIX));

        let k8s = reloaded.lock.dependency("k8s").unwrap();
        assert_eq!(k8s.full_name, "k8s_1.28");
        assert_eq!(k8s.oci_tag.as_deref(), Some("1.28"));

        assert_eq!(
            reporter.messages().last().unwrap(),
            "package 'app' updated successfully"
        );
    }

    #[test]
    fn test_update_without_sum_check() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        write_package(&work.path().join("shared"), "shared", "0.2.0", &[]);
        let app = work.path().join("app");
        write_package(&app, "app", "0.1.0", &[("shared", path_dep("../shared"))]);

        let mut pkg = Package::load(&app).unwrap();
        client.update(&mut pkg, true).unwrap();
        assert_eq!(pkg.lock.dependency("shared").unwrap().sum, None);
    }

    #[test]
    fn test_update_refreshes_changed_sum() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        let shared = work.path().join("shared");
        write_package(&shared, "shared", "0.2.0", &[]);
        let app = work.path().join("app");
        write_package(&app, "app", "0.1.0", &[("shared", path_dep("../shared"))]);

        let mut pkg = Package::load(&app).unwrap();
        client.update(&mut pkg, false).unwrap();
        let before = pkg.lock.dependency("shared").unwrap().sum.clone();

        std::fs::write(shared.join("main.k"), "a = 2\n").unwrap();
        client.update(&mut pkg, false).unwrap();
        let after = pkg.lock.dependency("shared").unwrap().sum.clone();
        assert_ne!(before, after);
    }

    #[test]
    fn test_update_fetches_git_dependency() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        let origin = work.path().join("origin");
        std::fs::create_dir_all(&origin).unwrap();
        let shas = init_repo(
            &origin,
            &[("kcl.mod", "[package]\nname = \"konfig\"\nversion = \"0.4.0\"\n")],
        );

        let app = work.path().join("app");
        write_package(
            &app,
            "app",
            "0.1.0",
            &[(
                "konfig",
                DependencySpec::Detailed(DetailedDependency {
                    git: Some(format!("file://{}", origin.display())),
                    tag: Some("v0.1.0".to_string()),
                    ..DetailedDependency::default()
                }),
            )],
        );

        let mut pkg = Package::load(&app).unwrap();
        client.update(&mut pkg, false).unwrap();

        let locked = pkg.lock.dependency("konfig").unwrap();
        assert_eq!(locked.version, "0.4.0");
        assert_eq!(locked.commit.as_deref(), Some(shas[0].as_str()));
        assert!(home.path().join("konfig_0.4.0/kcl.mod").is_file());
    }

    #[test]
    fn test_update_missing_local_dependency() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        write_package(work.path(), "app", "0.1.0", &[("gone", path_dep("gone"))]);
        let mut pkg = Package::load(work.path()).unwrap();
        let err = client.update(&mut pkg, false).unwrap_err();
        assert!(matches!(err, crate::error::KclError::PathNotExist { .. }));
    }
}
