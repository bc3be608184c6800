//! KCL packages on disk
//!
//! A package is a directory holding `kcl.mod` and, once it has dependencies,
//! `kcl.mod.lock`.

pub mod kcl_mod;
pub mod lock_file;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{KclError, Result};

pub use kcl_mod::{DependencySpec, DetailedDependency, Manifest};
pub use lock_file::{LockFile, LockedDependency};

pub const MOD_FILE: &str = "kcl.mod";
pub const LOCK_FILE: &str = "kcl.mod.lock";
pub const MAIN_FILE: &str = "main.k";

/// A loaded package: its root directory, manifest and lock file
#[derive(Debug, Clone)]
pub struct Package {
    pub root: PathBuf,
    pub manifest: Manifest,
    pub lock: LockFile,
}

impl Package {
    /// Load the package rooted at `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let mod_path = dir.join(MOD_FILE);
        if !mod_path.is_file() {
            return Err(KclError::ManifestNotFound {
                path: dir.display().to_string(),
            });
        }

        let manifest = Manifest::from_toml(&read(&mod_path)?, &mod_path.display().to_string())?;

        let lock_path = dir.join(LOCK_FILE);
        let lock = if lock_path.is_file() {
            LockFile::from_toml(&read(&lock_path)?, &lock_path.display().to_string())?
        } else {
            LockFile::default()
        };

        debug!(
            package = %manifest.package.name,
            root = %dir.display(),
            dependencies = manifest.dependencies.len(),
            "loaded package"
        );

        Ok(Self {
            root: dir.to_path_buf(),
            manifest,
            lock,
        })
    }

    /// Write `kcl.mod` and `kcl.mod.lock`
    pub fn save(&self) -> Result<()> {
        write(&self.root.join(MOD_FILE), &self.manifest.to_toml()?)?;
        write(&self.root.join(LOCK_FILE), &self.lock.to_toml()?)
    }

    pub fn name(&self) -> &str {
        &self.manifest.package.name
    }

    pub fn version(&self) -> &str {
        &self.manifest.package.version
    }

    /// Absolute directory of a local dependency, relative paths taken from the package root
    pub fn local_dependency_dir(&self, spec: &DependencySpec) -> Option<PathBuf> {
        let path = Path::new(spec.local_path()?);
        Some(if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        })
    }
}

/// Walk up from `start` to the nearest directory holding `kcl.mod`
pub fn find_package_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MOD_FILE).is_file())
        .map(Path::to_path_buf)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| KclError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| KclError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
