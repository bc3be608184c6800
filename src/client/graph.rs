//! `kcl mod graph`

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::manifest::{MOD_FILE, Package};

use super::ModClient;

/// Dependency edges of a package, each node written as `name@version`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    pub edges: Vec<(String, String)>,
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (parent, child) in &self.edges {
            writeln!(f, "{parent} {child}")?;
        }
        Ok(())
    }
}

fn node(name: &str, version: &str) -> String {
    if version.is_empty() {
        name.to_string()
    } else {
        format!("{name}@{version}")
    }
}

impl ModClient {
    /// Breadth-first walk over `package` and the dependencies available on disk
    ///
    /// Local dependencies are followed through their path, fetched ones
    /// through the package home. Dependencies not present locally appear as
    /// leaves. Versions come from the lock, then kcl.mod, then the
    /// dependency's own kcl.mod.
    pub fn graph(&self, package: &Package) -> Result<DependencyGraph> {
        let mut graph = DependencyGraph::default();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        let root = node(package.name(), package.version());
        visited.insert(root.clone());
        queue.push_back((root, package.clone()));

        while let Some((parent, current)) = queue.pop_front() {
            for (name, spec) in &current.manifest.dependencies {
                let pinned = current
                    .lock
                    .dependency(name)
                    .map(|l| l.version.as_str())
                    .or_else(|| spec.version())
                    .unwrap_or_default();

                let dir = current.local_dependency_dir(spec).unwrap_or_else(|| {
                    self.cached_package_dir(spec.package().unwrap_or(name), pinned)
                });
                let dependency = load_if_present(dir)?;

                let version = match &dependency {
                    Some(dep) if pinned.is_empty() => dep.version(),
                    _ => pinned,
                };
                let child = node(name, version);
                graph.edges.push((parent.clone(), child.clone()));

                if let Some(dependency) = dependency {
                    if visited.insert(child.clone()) {
                        queue.push_back((child, dependency));
                    }
                }
            }
        }

        debug!(package = %package.name(), edges = graph.edges.len(), "built dependency graph");
        Ok(graph)
    }
}

fn load_if_present(dir: PathBuf) -> Result<Option<Package>> {
    if dir.join(MOD_FILE).is_file() {
        Package::load(&dir).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use crate::manifest::{DependencySpec, DetailedDependency, LockFile, Manifest};
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
    fn test_graph_follows_local_and_cached_dependencies() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        write_package(&home.path().join("k8s_1.28"), "k8s", "1.28", &[]);
        write_package(
            &work.path().join("shared"),
            "shared",
            "0.2.0",
            &[("k8s", DependencySpec::Version("1.28".to_string()))],
        );
        write_package(
            &work.path().join("app"),
            "app",
            "0.1.0",
            &[
                ("shared", path_dep("../shared")),
                ("k8s", DependencySpec::Version("1.28".to_string())),
            ],
        );

        let package = Package::load(&work.path().join("app")).unwrap();
        let graph = client.graph(&package).unwrap();

        assert_eq!(
            graph.to_string(),
            "app@0.1.0 shared@0.2.0\napp@0.1.0 k8s@1.28\nshared@0.2.0 k8s@1.28\n"
        );
    }

    #[test]
    fn test_graph_prefers_locked_version() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        write_package(work.path(), "app", "0.1.0", &[("shared", path_dep("shared"))]);
        write_package(&work.path().join("shared"), "shared", "0.3.0", &[]);

        let mut package = Package::load(work.path()).unwrap();
        package.lock.upsert(crate::manifest::LockedDependency {
            name: "shared".to_string(),
            full_name: "shared_0.3.0".to_string(),
            version: "0.3.0".to_string(),
            path: Some("shared".to_string()),
            ..Default::default()
        });

        let graph = client.graph(&package).unwrap();
        assert_eq!(
            graph.edges,
            [("app@0.1.0".to_string(), "shared@0.3.0".to_string())]
        );
    }

    #[test]
    fn test_graph_without_dependencies() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());
        write_package(work.path(), "app", "0.1.0", &[]);

        let package = Package::load(work.path()).unwrap();
        assert_eq!(client.graph(&package).unwrap().to_string(), "");
    }

    #[test]
    fn test_graph_tolerates_cycles() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let (client, _) = client(home.path());

        write_package(&work.path().join("a"), "a", "", &[("b", path_dep("../b"))]);
        write_package(&work.path().join("b"), "b", "", &[("a", path_dep("../a"))]);

        let package = Package::load(&work.path().join("a")).unwrap();
        let graph = client.graph(&package).unwrap();
        assert_eq!(graph.to_string(), "a b\nb a\n");
    }
}
