//! Package manager settings (kpm.json)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KclError, Result};
use crate::source::ModSpec;

pub const DEFAULT_OCI_REGISTRY: &str = "ghcr.io";
pub const DEFAULT_OCI_REPO: &str = "kcl-lang";

/// On-disk shape of `kpm.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(rename = "DefaultOciRegistry", default, skip_serializing_if = "Option::is_none")]
    default_oci_registry: Option<String>,
    #[serde(rename = "DefaultOciRepo", default, skip_serializing_if = "Option::is_none")]
    default_oci_repo: Option<String>,
    #[serde(rename = "DefaultOciPlainHttp", default, skip_serializing_if = "Option::is_none")]
    default_oci_plain_http: Option<bool>,
}

/// Resolved settings for one CLI invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Package home directory
    pub home: PathBuf,
    pub default_oci_registry: String,
    pub default_oci_repo: String,
    pub default_oci_plain_http: bool,
}

impl Settings {
    /// Load settings for the package home from the environment
    pub fn load() -> Result<Self> {
        let home = super::pkg_home()?;
        let mut settings = Self::load_from(&home)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Load `kpm.json` under `home`, falling back to defaults when absent
    pub fn load_from(home: &Path) -> Result<Self> {
        let path = super::settings_file(home);
        let file = if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|e| KclError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            serde_json::from_str::<SettingsFile>(&content).map_err(|e| {
                KclError::ConfigParseFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?
        } else {
            debug!(path = %path.display(), "no settings file, using defaults");
            SettingsFile::default()
        };

        Ok(Self {
            home: home.to_path_buf(),
            default_oci_registry: file
                .default_oci_registry
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_OCI_REGISTRY.to_string()),
            default_oci_repo: file
                .default_oci_repo
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_OCI_REPO.to_string()),
            default_oci_plain_http: file.default_oci_plain_http.unwrap_or(false),
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Some(registry) = env_non_empty(super::REGISTRY_ENV) {
            self.default_oci_registry = registry;
        }
        if let Some(repo) = env_non_empty(super::REPOSITORY_ENV) {
            self.default_oci_repo = repo;
        }
    }

    /// `<registry>/<repo>` of the default registry
    pub fn default_oci_ref(&self) -> String {
        format!("{}/{}", self.default_oci_registry, self.default_oci_repo)
    }

    /// Canonical OCI url of a registry spec in the default registry
    pub fn registry_url(&self, spec: &ModSpec) -> String {
        let base = format!("oci://{}/{}", self.default_oci_ref(), spec.name);
        match &spec.version {
            Some(version) => format!("{base}?tag={version}"),
            None => base,
        }
    }

    pub fn credentials_file(&self) -> PathBuf {
        super::credentials_file(&self.home)
    }

    pub fn package_cache_lock_file(&self) -> PathBuf {
        super::package_cache_lock_file(&self.home)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load_from(temp.path()).unwrap();
        assert_eq!(settings.default_oci_registry, "ghcr.io");
        assert_eq!(settings.default_oci_repo, "kcl-lang");
        assert!(!settings.default_oci_plain_http);
        assert_eq!(settings.default_oci_ref(), "ghcr.io/kcl-lang");
    }

    #[test]
    fn test_load_settings_file() {
        let temp = TempDir::new().unwrap();
        let path = crate::config::settings_file(temp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"DefaultOciRegistry":"localhost:5001","DefaultOciRepo":"test","DefaultOciPlainHttp":true}"#,
        )
        .unwrap();

        let settings = Settings::load_from(temp.path()).unwrap();
        assert_eq!(settings.default_oci_registry, "localhost:5001");
        assert_eq!(settings.default_oci_repo, "test");
        assert!(settings.default_oci_plain_http);
    }

    #[test]
    fn test_invalid_settings_file() {
        let temp = TempDir::new().unwrap();
        let path = crate::config::settings_file(temp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let err = Settings::load_from(temp.path()).unwrap_err();
        assert!(matches!(err, KclError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_registry_url() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load_from(temp.path()).unwrap();
        assert_eq!(
            settings.registry_url(&ModSpec::new("k8s").with_version("1.28")),
            "oci://ghcr.io/kcl-lang/k8s?tag=1.28"
        );
        assert_eq!(
            settings.registry_url(&ModSpec::new("k8s")),
            "oci://ghcr.io/kcl-lang/k8s"
        );
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let temp = TempDir::new().unwrap();
        let original_home = std::env::var_os(crate::config::PKG_PATH_ENV);
        unsafe {
            std::env::set_var(crate::config::PKG_PATH_ENV, temp.path());
            std::env::set_var(crate::config::REGISTRY_ENV, "localhost:5001");
            std::env::set_var(crate::config::REPOSITORY_ENV, "test");
        }

        let settings = Settings::load().unwrap();
        assert_eq!(settings.home, temp.path());
        assert_eq!(settings.default_oci_ref(), "localhost:5001/test");

        unsafe {
            std::env::remove_var(crate::config::REGISTRY_ENV);
            std::env::remove_var(crate::config::REPOSITORY_ENV);
            match original_home {
                Some(o) => std::env::set_var(crate::config::PKG_PATH_ENV, o),
                None => std::env::remove_var(crate::config::PKG_PATH_ENV),
            }
        }
    }
}
