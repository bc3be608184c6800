//! BLAKE3 content sums for package directories

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::{KclError, Result};
use crate::manifest::LOCK_FILE;

/// Prefix of every recorded sum
pub const HASH_PREFIX: &str = "blake3:";

/// Directories never part of a package's content
const SKIPPED_DIRS: &[&str] = &[".git", ".kclvm"];

/// Hash every file below `path`, sorted by relative path
///
/// `kcl.mod.lock` and VCS/cache directories are excluded, so adding a
/// dependency to the package does not change its own sum.
pub fn hash_directory(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return Err(KclError::PathNotExist {
            path: path.display().to_string(),
        });
    }

    let mut files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
        })
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() != LOCK_FILE)
        .collect();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    let mut hasher = Hasher::new();
    for entry in files {
        let file_path = entry.path();
        let relative_path = file_path
            .strip_prefix(path)
            .unwrap_or(file_path)
            .to_string_lossy()
            .replace('\\', "/");
        hasher.update(relative_path.as_bytes());
        hasher.update(b"\0");
        hash_file_into(&mut hasher, file_path)?;
        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

fn hash_file_into(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let read_failed = |e: std::io::Error| KclError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let mut reader = BufReader::new(File::open(path).map_err(read_failed)?);
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_failed)?;
        if bytes_read == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..bytes_read]);
    }
}
