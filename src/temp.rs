//! Scratch directories for fetches
//!
//! Temp dirs are always created under an absolute base, never under the
//! current directory (e.g. when `TMPDIR=tmp`).

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::{KclError, Result};

/// Absolute directory to create temporary directories in
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        return t;
    }
    #[cfg(windows)]
    {
        env::var("TEMP")
            .or_else(|_| env::var("TMP"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/tmp")
    }
}

/// Create a `kcl-<purpose>-*` directory, removed on drop
pub fn scratch_dir(purpose: &str) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(&format!("kcl-{purpose}-"))
        .tempdir_in(temp_dir_base())
        .map_err(|e| KclError::IoError {
            message: format!("failed to create temporary directory: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_base_is_absolute() {
        assert!(temp_dir_base().is_absolute());
    }

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let dir = scratch_dir("test").unwrap();
        let path = dir.path().to_path_buf();
        assert!(path.is_dir());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("kcl-test-")
        );
        drop(dir);
        assert!(!path.exists());
    }
}
