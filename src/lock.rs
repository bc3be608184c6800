//! Package cache lock
//!
//! `kcl mod add`, `pull`, `update` and `graph` hold an exclusive OS file
//! lock on `<pkg home>/package-cache.lock` for their whole run, so two kcl
//! processes never mutate the package cache at once.
//!
//! Acquisition is non-blocking: a held lock fails immediately with
//! [`KclError::PackageCacheLocked`]. The lock is released on drop.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{KclError, Result};

#[derive(Debug)]
pub struct PackageCacheLock {
    path: PathBuf,
    /// Open handle while the lock is held
    file: Option<File>,
}

impl PackageCacheLock {
    /// Acquire the lock file at `path`, creating it and its parent when needed
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| KclError::LockFailed {
                reason: format!("cannot create {}: {}", parent.display(), e),
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| KclError::LockFailed {
                reason: format!("cannot open {}: {}", path.display(), e),
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %path.display(), "acquired package cache lock");
                Ok(Self {
                    path: path.to_path_buf(),
                    file: Some(file),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(KclError::PackageCacheLocked {
                    path: path.display().to_string(),
                })
            }
            Err(e) => Err(KclError::LockFailed {
                reason: e.to_string(),
            }),
        }
    }
}

impl Drop for PackageCacheLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if file.unlock().is_ok() {
                debug!(path = %self.path.display(), "released package cache lock");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("home/package-cache.lock");

        let lock = PackageCacheLock::acquire(&path).unwrap();
        assert!(lock.file.is_some());
        assert!(path.exists());
        assert_eq!(lock.path, path);
    }

    #[test]
    fn test_second_acquire_fails_fast() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package-cache.lock");

        let _held = PackageCacheLock::acquire(&path).unwrap();
        let err = PackageCacheLock::acquire(&path).unwrap_err();
        assert!(matches!(err, KclError::PackageCacheLocked { .. }));
    }

    #[test]
    fn test_released_on_drop() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package-cache.lock");

        {
            let _lock = PackageCacheLock::acquire(&path).unwrap();
        }
        assert!(PackageCacheLock::acquire(&path).is_ok());
    }
}
