//! Fetching package content for git and local sources

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{KclError, Result};
use crate::git;
use crate::manifest::{MOD_FILE, Manifest, Package};
use crate::source::{GitSource, ModSpec};
use crate::temp;

use super::ModClient;

/// A git checkout in a scratch directory, removed on drop
pub struct Checkout {
    scratch: TempDir,
    pub sha: String,
}

impl Checkout {
    pub fn path(&self) -> &Path {
        self.scratch.path()
    }
}

impl ModClient {
    /// Clone a git source and check out its ref
    pub(crate) fn fetch_git(&self, source: &GitSource) -> Result<Checkout> {
        let scratch = temp::scratch_dir("git")?;
        let url = source.clone_url();

        let spinner = self.reporter().fetching(&url);
        let repo = git::clone(&url, scratch.path(), self.git)?;
        let sha = git::checkout(&repo, source.reference.as_ref())?;
        spinner.finish();

        debug!(url = %url, sha = %sha, "fetched git source");
        Ok(Checkout { scratch, sha })
    }
}

/// Package directory inside `root`: `root` itself without a sub-package,
/// otherwise the directory whose `kcl.mod` declares that package name
pub fn locate_package(root: &Path, package: Option<&ModSpec>, source_url: &str) -> Result<PathBuf> {
    let Some(spec) = package else {
        return Ok(root.to_path_buf());
    };

    let found = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == MOD_FILE)
        .find_map(|e| {
            let content = std::fs::read_to_string(e.path()).ok()?;
            let manifest = Manifest::from_toml(&content, &e.path().display().to_string()).ok()?;
            let dir = e.path().parent()?;
            (manifest.package.name == spec.name).then(|| dir.to_path_buf())
        });

    found.ok_or_else(|| KclError::SubPackageNotFound {
        name: spec.name.clone(),
        source_url: source_url.to_string(),
    })
}

/// Load the package at `dir`, reporting a missing path before a missing kcl.mod
pub fn load_local_package(dir: &Path) -> Result<Package> {
    if !dir.exists() {
        return Err(KclError::PathNotExist {
            path: dir.display().to_string(),
        });
    }
    Package::load(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_package(dir: &Path, name: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            dir.join(MOD_FILE),
            format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\n"),
        )
        .unwrap();
    }

    #[test]
    fn test_locate_root_package() {
        let temp = TempDir::new().unwrap();
        assert_eq!(locate_package(temp.path(), None, "x").unwrap(), temp.path());
    }

    #[test]
    fn test_locate_sub_package() {
        let temp = TempDir::new().unwrap();
        write_package(temp.path(), "modules");
        write_package(&temp.path().join("pkgs/helloworld"), "helloworld");

        let found = locate_package(temp.path(), Some(&ModSpec::new("helloworld")), "x").unwrap();
        assert_eq!(found, temp.path().join("pkgs/helloworld"));
    }

    #[test]
    fn test_locate_missing_sub_package() {
        let temp = TempDir::new().unwrap();
        write_package(temp.path(), "modules");

        let err = locate_package(temp.path(), Some(&ModSpec::new("nope")), "git://h/r").unwrap_err();
        assert!(matches!(err, KclError::SubPackageNotFound { .. }));
    }

    #[test]
    fn test_load_local_package_missing_path() {
        let err = load_local_package(Path::new("/nonexistent/kcl/pkg")).unwrap_err();
        assert!(matches!(err, KclError::PathNotExist { .. }));
    }
}
