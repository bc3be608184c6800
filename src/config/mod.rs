//! Configuration for the KCL CLI
//!
//! Everything is rooted at the package home (`KCL_PKG_PATH`, default `~/.kcl/kpm`):
//! - `<home>/.kpm/config/kpm.json` - default OCI registry settings
//! - `<home>/.kpm/config/config.json` - registry credentials
//! - `<home>/package-cache.lock` - cross-process package cache lock

pub mod credentials;
pub mod settings;

use std::path::{Path, PathBuf};

use crate::error::{KclError, Result};

pub use credentials::CredentialStore;
pub use settings::Settings;

/// Package home override
pub const PKG_PATH_ENV: &str = "KCL_PKG_PATH";

/// Default OCI registry override
pub const REGISTRY_ENV: &str = "KPM_REG";

/// Default OCI repository override
pub const REPOSITORY_ENV: &str = "KPM_REPO";

/// Compiler executable override
pub const COMPILER_ENV: &str = "KCL_COMPILER";

/// Compiler executable used when `KCL_COMPILER` is unset
pub const DEFAULT_COMPILER: &str = "kclvm_cli";

const DEFAULT_PKG_HOME: &[&str] = &[".kcl", "kpm"];
const CONFIG_DIR: &[&str] = &[".kpm", "config"];
const SETTINGS_FILE: &str = "kpm.json";
const CREDENTIALS_FILE: &str = "config.json";
const PACKAGE_CACHE_LOCK_FILE: &str = "package-cache.lock";

/// Get the package home directory
///
/// Uses `KCL_PKG_PATH` when set and non-empty, otherwise `~/.kcl/kpm`.
pub fn pkg_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(PKG_PATH_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let base = dirs::home_dir().ok_or(KclError::HomeNotFound)?;
    Ok(DEFAULT_PKG_HOME
        .iter()
        .fold(base, |path, segment| path.join(segment)))
}

/// `<home>/.kpm/config`
pub fn config_dir(home: &Path) -> PathBuf {
    CONFIG_DIR
        .iter()
        .fold(home.to_path_buf(), |path, segment| path.join(segment))
}

pub fn settings_file(home: &Path) -> PathBuf {
    config_dir(home).join(SETTINGS_FILE)
}

pub fn credentials_file(home: &Path) -> PathBuf {
    config_dir(home).join(CREDENTIALS_FILE)
}

pub fn package_cache_lock_file(home: &Path) -> PathBuf {
    home.join(PACKAGE_CACHE_LOCK_FILE)
}

/// Compiler executable from `KCL_COMPILER`, or `kclvm_cli`
pub fn compiler_program() -> String {
    std::env::var(COMPILER_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_COMPILER.to_string())
}
