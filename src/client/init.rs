//! `kcl mod init`

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{KclError, Result};
use crate::manifest::{LOCK_FILE, LockFile, MAIN_FILE, MOD_FILE, Manifest, Package};

use super::ModClient;

const MAIN_CONTENT: &str = "The_first_kcl_program = 'Hello World!'\n";

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub name: String,
    pub path: PathBuf,
}

impl InitOptions {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(KclError::InvalidInitOptions);
        }
        Ok(())
    }
}

impl ModClient {
    /// Create `kcl.mod`, `kcl.mod.lock` and `main.k` under `options.path`,
    /// leaving any that already exist untouched
    pub fn init_package(&self, options: &InitOptions) -> Result<Package> {
        options.validate()?;
        std::fs::create_dir_all(&options.path)?;

        let manifest = Manifest::new(options.name.clone()).to_toml()?;
        let lock = LockFile::default().to_toml()?;
        for (file, content) in [
            (MOD_FILE, manifest.as_str()),
            (LOCK_FILE, lock.as_str()),
            (MAIN_FILE, MAIN_CONTENT),
        ] {
            let path = options.path.join(file);
            if path.exists() {
                self.reporter()
                    .report(&format!("'{}' already exists", path.display()));
            } else {
                write_new(&path, content)?;
                self.reporter()
                    .report(&format!("creating new :{}", path.display()));
            }
        }

        let package = Package::load(&options.path)?;
        info!(package = %package.name(), path = %options.path.display(), "initialized package");
        self.reporter()
            .report(&format!("package '{}' init finished", package.name()));
        Ok(package)
    }
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| KclError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
