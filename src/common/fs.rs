//! Common file system operations with unified error handling

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{KclError, Result};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

#[derive(Default, Clone)]
pub struct CopyOptions {
    pub exclude: Vec<String>,
}

impl CopyOptions {
    pub fn exclude_git() -> Self {
        Self {
            exclude: vec![".git".to_string()],
        }
    }
}

/// Copy a directory recursively, skipping excluded entry names at any depth
pub fn copy_dir_recursive(src: &Path, dst: &Path, options: &CopyOptions) -> Result<()> {
    let copy_failed = |path: &Path, e: std::io::Error| KclError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    fs::create_dir_all(dst).map_err(|e| copy_failed(dst, e))?;

    for entry in fs::read_dir(src).map_err(|e| copy_failed(src, e))? {
        let entry = entry.map_err(|e| copy_failed(src, e))?;
        let file_name = entry.file_name();
        if options
            .exclude
            .iter()
            .any(|excluded| file_name.to_str() == Some(excluded.as_str()))
        {
            continue;
        }

        let entry_path = entry.path();
        let dst_path = dst.join(&file_name);
        if entry_path.is_dir() {
            copy_dir_recursive(&entry_path, &dst_path, options)?;
        } else {
            fs::copy(&entry_path, &dst_path).map_err(|e| copy_failed(&dst_path, e))?;
        }
    }

    Ok(())
}

/// Whether `path` is missing or an empty directory
pub fn is_empty_or_missing(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => !path.exists(),
    }
}

/// Expand run entries: existing paths are kept, anything else is a glob pattern
///
/// A pattern that matches nothing fails with [`KclError::PathNotExist`].
pub fn expand_input_files(entries: &[String]) -> Result<Vec<String>> {
    let mut expanded = Vec::new();
    for entry in entries {
        if Path::new(entry).exists() {
            expanded.push(entry.clone());
            continue;
        }

        let matches = expand_pattern(entry)?;
        if matches.is_empty() {
            return Err(KclError::PathNotExist {
                path: entry.clone(),
            });
        }
        expanded.extend(matches);
    }
    Ok(expanded)
}

fn expand_pattern(pattern: &str) -> Result<Vec<String>> {
    if !pattern.contains(GLOB_META) {
        return Ok(Vec::new());
    }

    let normalized = pattern.strip_prefix("./").unwrap_or(pattern).replace('\\', "/");
    let glob = Glob::new(&normalized).map_err(|e| KclError::InvalidSpec {
        input: format!("{pattern}: {e}"),
    })?;

    let root = literal_prefix(&normalized);
    let walk_root = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.clone()
    };

    let mut matches: Vec<String> = WalkDir::new(&walk_root)
        .min_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| {
            let path = if root.as_os_str().is_empty() {
                entry.path().strip_prefix(".").unwrap_or(entry.path()).to_path_buf()
            } else {
                entry.path().to_path_buf()
            };
            let candidate_text = path.to_string_lossy().replace('\\', "/");
            let candidate = CandidatePath::from(candidate_text.as_str());
            glob.matched(&candidate).is_some().then_some(candidate_text)
        })
        .collect();
    matches.sort();
    Ok(matches)
}

/// Leading path components without glob metacharacters
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    let mut segments = pattern.split('/').peekable();
    if pattern.starts_with('/') {
        prefix.push("/");
        segments.next();
    }
    for segment in segments {
        if segment.contains(GLOB_META) {
            break;
        }
        prefix.push(segment);
    }
    prefix
}
