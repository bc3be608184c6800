//! Module client
//!
//! [`ModClient`] is the single entry point behind the `kcl mod` and
//! `kcl registry` commands. It owns the resolved settings, the progress
//! reporter and git transport options:
//!
//! - `init.rs`: `kcl mod init`
//! - `add.rs`: `kcl mod add`
//! - `pull.rs`: `kcl mod pull`
//! - `update.rs`: `kcl mod update`
//! - `graph.rs`: `kcl mod graph`
//! - `metadata.rs`: `kcl mod metadata`
//! - `fetch.rs`: cloning git sources and locating sub-packages
//!
//! Registry credentials and the package cache lock live here directly.

pub mod add;
pub mod fetch;
pub mod graph;
pub mod init;
pub mod metadata;
pub mod pull;
pub mod update;

use std::path::{Path, PathBuf};

use crate::config::{CredentialStore, Settings};
use crate::error::Result;
use crate::git::GitOptions;
use crate::lock::PackageCacheLock;
use crate::manifest::{Package, lock_file};
use crate::source::Source;
use crate::ui::{self, Reporter};

pub use add::AddOptions;
pub use init::InitOptions;

pub struct ModClient {
    settings: Settings,
    reporter: Box<dyn Reporter>,
    git: GitOptions,
}

impl ModClient {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            reporter: ui::reporter(false),
            git: GitOptions::default(),
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_git_options(mut self, git: GitOptions) -> Self {
        self.git = git;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn load_package(&self, dir: &Path) -> Result<Package> {
        Package::load(dir)
    }

    /// Take the cross-process package cache lock; released when the guard drops
    pub fn acquire_package_cache_lock(&self) -> Result<PackageCacheLock> {
        PackageCacheLock::acquire(&self.settings.package_cache_lock_file())
    }

    /// Directory a fetched dependency is cached in: `<pkg home>/<name>_<version>`
    pub fn cached_package_dir(&self, name: &str, version: &str) -> PathBuf {
        self.settings.home.join(lock_file::full_name(name, version))
    }

    /// Canonical url of a source, registry specs expanded to the default registry
    pub fn canonical_url(&self, source: &Source) -> String {
        match source {
            Source::Registry(spec) => self.settings.registry_url(spec),
            other => other.to_url(),
        }
    }

    pub fn login(&self, registry: &str, username: &str, password: &str) -> Result<()> {
        let mut store = CredentialStore::load(&self.settings.credentials_file())?;
        store.login(registry, username, password)?;
        store.save()?;
        self.reporter.report(&format!("Login succeeded for '{registry}'"));
        Ok(())
    }

    pub fn logout(&self, registry: &str) -> Result<()> {
        let mut store = CredentialStore::load(&self.settings.credentials_file())?;
        store.logout(registry)?;
        store.save()?;
        self.reporter.report(&format!("Logout succeeded for '{registry}'"));
        Ok(())
    }
}
