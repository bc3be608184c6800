//! Registry credentials (docker-style `config.json`)
//!
//! ```json
//! { "auths": { "ghcr.io": { "auth": "<base64 user:password>" } } }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KclError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Credential file contents plus its location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStore {
    #[serde(default)]
    pub auths: BTreeMap<String, AuthEntry>,

    /// Other docker config keys (`credsStore`, `HttpHeaders`, ...) kept as read
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,

    #[serde(skip)]
    path: PathBuf,
}

impl CredentialStore {
    /// Load the credential file, or an empty store when it does not exist yet
    pub fn load(path: &Path) -> Result<Self> {
        let mut store = if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|e| KclError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            if content.trim().is_empty() {
                Self::default()
            } else {
                serde_json::from_str(&content).map_err(|e| KclError::ConfigParseFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
        } else {
            Self::default()
        };
        store.path = path.to_path_buf();
        Ok(store)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| KclError::FileWriteFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.path, json).map_err(|e| KclError::FileWriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Store credentials for `registry`, replacing any previous entry
    pub fn login(&mut self, registry: &str, username: &str, password: &str) -> Result<()> {
        let host = normalize_registry(registry)?;
        let auth = STANDARD.encode(format!("{username}:{password}"));
        debug!(registry = %host, "storing registry credentials");
        self.auths.insert(
            host,
            AuthEntry {
                auth,
                ..AuthEntry::default()
            },
        );
        Ok(())
    }

    /// Remove the credentials for `registry`
    pub fn logout(&mut self, registry: &str) -> Result<()> {
        let host = normalize_registry(registry)?;
        if self.auths.remove(&host).is_none() {
            return Err(KclError::NotLoggedIn { registry: host });
        }
        Ok(())
    }

    /// Decoded `(username, password)` for `registry`
    #[cfg(test)]
    pub fn credentials(&self, registry: &str) -> Option<(String, String)> {
        let host = normalize_registry(registry).ok()?;
        let entry = self.auths.get(&host)?;
        let decoded = STANDARD.decode(&entry.auth).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, password) = decoded.split_once(':')?;
        Some((user.to_string(), password.to_string()))
    }
}

/// Reduce `https://host:port/` style input to the `host:port` key
pub fn normalize_registry(registry: &str) -> Result<String> {
    let trimmed = registry.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    let host = without_scheme.split('/').next().unwrap_or_default();

    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(KclError::InvalidRegistry {
            registry: registry.to_string(),
        });
    }
    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> CredentialStore {
        CredentialStore::load(&temp.path().join(".kpm/config/config.json")).unwrap()
    }

    #[test]
    fn test_login_then_reload() {
        let temp = TempDir::new().unwrap();
        let mut creds = store(&temp);
        creds.login("ghcr.io", "alice", "s3cret").unwrap();
        creds.save().unwrap();

        let reloaded = store(&temp);
        assert_eq!(
            reloaded.credentials("ghcr.io"),
            Some(("alice".to_string(), "s3cret".to_string()))
        );
        assert_eq!(reloaded.auths["ghcr.io"].auth, "YWxpY2U6czNjcmV0");
    }

    #[test]
    fn test_login_keeps_other_config_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"auths":{"docker.io":{},"quay.io":{"auth":"dTpw"}},"credsStore":"desktop","HttpHeaders":{"User-Agent":"kcl"}}"#,
        )
        .unwrap();

        let mut creds = CredentialStore::load(&path).unwrap();
        creds.login("ghcr.io", "alice", "s3cret").unwrap();
        creds.save().unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["credsStore"], "desktop");
        assert_eq!(saved["HttpHeaders"]["User-Agent"], "kcl");
        assert_eq!(saved["auths"]["docker.io"], serde_json::json!({}));
        assert_eq!(saved["auths"]["quay.io"]["auth"], "dTpw");
        assert!(saved["auths"]["ghcr.io"].is_object());
    }

    #[test]
    fn test_login_normalizes_registry() {
        let temp = TempDir::new().unwrap();
        let mut creds = store(&temp);
        creds.login("https://localhost:5001/", "u", "p").unwrap();
        assert!(creds.auths.contains_key("localhost:5001"));
        assert!(creds.credentials("localhost:5001").is_some());
    }

    #[test]
    fn test_logout() {
        let temp = TempDir::new().unwrap();
        let mut creds = store(&temp);
        creds.login("ghcr.io", "u", "p").unwrap();
        creds.logout("ghcr.io").unwrap();
        assert!(creds.credentials("ghcr.io").is_none());
    }

    #[test]
    fn test_logout_unknown_registry() {
        let temp = TempDir::new().unwrap();
        let mut creds = store(&temp);
        let err = creds.logout("ghcr.io").unwrap_err();
        assert!(matches!(err, KclError::NotLoggedIn { .. }));
    }

    #[test]
    fn test_invalid_registry() {
        assert!(normalize_registry("").is_err());
        assert!(normalize_registry("https://").is_err());
        assert_eq!(normalize_registry("ghcr.io").unwrap(), "ghcr.io");
    }
}
