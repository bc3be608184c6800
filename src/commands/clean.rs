//! Clean command implementation
//!
//! Removes the compiler build cache (`.kclvm/cache`) around a directory and
//! its package root, then the module cache in the package home.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CleanArgs;
use crate::config;
use crate::error::{KclError, Result};
use crate::manifest::find_package_root;
use crate::ui::prompt;

const BUILD_CACHE_DIRS: [&str; 2] = [".kclvm/cache", "__main__/.kclvm/cache"];

pub fn run(args: CleanArgs) -> Result<()> {
    let dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    if confirmed("Are you sure you want to clean the build cache?", args.yes)? {
        for removed in remove_dirs(&build_cache_paths(&dir))? {
            println!("{} removed", removed.display());
        }
    }

    if confirmed("Are you sure you want to clean the module cache?", args.yes)? {
        let home = config::pkg_home()?;
        for removed in remove_dirs(&[home])? {
            println!("{} removed", removed.display());
        }
    }

    Ok(())
}

fn confirmed(message: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let ok = prompt::confirm(message, false)?;
    if !ok {
        println!("Aborted.");
    }
    Ok(ok)
}

/// Build cache directories under `dir` and under its enclosing package root
fn build_cache_paths(dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![dir.to_path_buf()];
    if let Some(root) = find_package_root(dir).filter(|root| root != dir) {
        roots.push(root);
    }
    roots
        .iter()
        .flat_map(|root| BUILD_CACHE_DIRS.iter().map(move |cache| root.join(cache)))
        .collect()
}

/// Remove the directories that exist, returning those removed
fn remove_dirs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for path in paths.iter().filter(|p| p.is_dir()) {
        std::fs::remove_dir_all(path).map_err(|e| KclError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "removed cache directory");
        removed.push(path.clone());
    }
    Ok(removed)
}
