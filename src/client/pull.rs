//! `kcl mod pull`

use std::path::{Path, PathBuf};

use tracing::info;

use crate::common::fs::{CopyOptions, copy_dir_recursive, is_empty_or_missing};
use crate::error::{KclError, Result};
use crate::source::Source;

use super::ModClient;
use super::fetch::locate_package;

impl ModClient {
    /// Download `source` into `<local_path>/<package name>` and return that directory
    ///
    /// Git sources are cloned at their ref, local sources copied. OCI artifacts
    /// and registry specs need the registry transport and fail with
    /// [`KclError::UnsupportedTransport`].
    pub fn pull(&self, source: &Source, local_path: &Path) -> Result<PathBuf> {
        let url = self.canonical_url(source);

        let (name, content) = match source {
            Source::Git(git) => {
                let name = git
                    .package
                    .as_ref()
                    .map_or_else(|| git.repository_name(), |p| p.name.clone());
                let target = pull_target(local_path, &name)?;
                self.reporter().report(&format!("pulling '{url}'"));

                let checkout = self.fetch_git(git)?;
                let dir = locate_package(checkout.path(), git.package.as_ref(), &url)?;
                copy_dir_recursive(&dir, &target, &CopyOptions::exclude_git())?;
                (name, target)
            }
            Source::Local(local) => {
                let dir = locate_package(&local.path, local.package.as_ref(), &url)?;
                let name = match &local.package {
                    Some(package) => package.name.clone(),
                    None => dunce::canonicalize(&dir)
                        .ok()
                        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
                        .unwrap_or_else(|| "package".to_string()),
                };
                let target = pull_target(local_path, &name)?;
                self.reporter().report(&format!("pulling '{url}'"));

                copy_dir_recursive(&dir, &target, &CopyOptions::exclude_git())?;
                (name, target)
            }
            Source::Oci(_) | Source::Registry(_) => {
                return Err(KclError::UnsupportedTransport { url });
            }
        };

        info!(package = %name, path = %content.display(), "pulled package");
        self.reporter().report(&format!(
            "pulled '{url}' in '{}' successfully",
            content.display()
        ));
        Ok(content)
    }
}

fn pull_target(local_path: &Path, name: &str) -> Result<PathBuf> {
    let target = local_path.join(name);
    if !is_empty_or_missing(&target) {
        return Err(KclError::PullTargetExists {
            path: target.display().to_string(),
        });
    }
    Ok(target)
}
