//! Git operations for git package sources
//!
//! This module handles:
//! - Cloning repositories (HTTPS, SSH and local `file://`)
//! - Resolving a tag, branch or commit to an exact SHA
//! - Checking out that SHA as a detached HEAD
//!
//! Authentication is delegated to git's native system: SSH agent, keys in
//! `~/.ssh/` and git credential helpers.

use std::borrow::Cow;
use std::path::Path;

use git2::{
    CertificateCheckStatus, Cred, CredentialType, ErrorClass, FetchOptions, RemoteCallbacks,
    Repository, build::RepoBuilder,
};
use tracing::{debug, warn};

use crate::error::{KclError, Result};
use crate::source::GitRef;

/// Transport options for git fetches
#[derive(Debug, Clone, Copy, Default)]
pub struct GitOptions {
    /// Accept any TLS certificate presented by the server
    pub insecure_skip_tls_verify: bool,
}

/// Clone `url` into `target`
///
/// Clones are full (not shallow) so any tag, branch or commit can be checked out.
pub fn clone(url: &str, target: &Path, options: GitOptions) -> Result<Repository> {
    let mut callbacks = RemoteCallbacks::new();
    setup_callbacks(&mut callbacks, options);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    let url_to_clone = normalize_ssh_url_for_clone(url);
    debug!(url = %url_to_clone, target = %target.display(), "cloning git repository");

    builder
        .clone(url_to_clone.as_ref(), target)
        .map_err(|e| KclError::GitCloneFailed {
            url: url.to_string(),
            reason: interpret_git_error(&e),
        })
}

/// Check out `reference` (or the remote HEAD when `None`) and return its SHA
pub fn checkout(repo: &Repository, reference: Option<&GitRef>) -> Result<String> {
    let sha = match reference {
        Some(reference) => resolve_reference(repo, reference)?.id().to_string(),
        None => head_sha(repo)?,
    };
    checkout_commit(repo, &sha)?;
    debug!(sha = %sha, "checked out commit");
    Ok(sha)
}

fn head_sha(repo: &Repository) -> Result<String> {
    let head_failed = |e: git2::Error| KclError::GitRefResolveFailed {
        git_ref: "HEAD".to_string(),
        reason: e.message().to_string(),
    };
    let commit = repo
        .head()
        .map_err(head_failed)?
        .peel_to_commit()
        .map_err(head_failed)?;
    Ok(commit.id().to_string())
}

/// Resolve a tag, branch or commit to a commit
fn resolve_reference<'a>(repo: &'a Repository, reference: &GitRef) -> Result<git2::Commit<'a>> {
    let name = reference.value();
    let candidates: Vec<String> = match reference {
        GitRef::Tag(tag) => vec![format!("refs/tags/{tag}")],
        GitRef::Branch(branch) => vec![
            format!("refs/remotes/origin/{branch}"),
            format!("refs/heads/{branch}"),
        ],
        GitRef::Commit(_) => Vec::new(),
    };

    for candidate in &candidates {
        if let Ok(found) = repo.find_reference(candidate) {
            if let Ok(commit) = found.peel_to_commit() {
                return Ok(commit);
            }
        }
    }

    if let GitRef::Commit(sha) = reference {
        if let Ok(oid) = git2::Oid::from_str(sha) {
            if let Ok(commit) = repo.find_commit(oid) {
                return Ok(commit);
            }
        }
        // Abbreviated SHA
        if let Ok(obj) = repo.revparse_single(sha) {
            if let Ok(commit) = obj.peel_to_commit() {
                return Ok(commit);
            }
        }
    }

    Err(KclError::GitRefResolveFailed {
        git_ref: reference.to_string(),
        reason: format!("'{name}' was not found in the repository"),
    })
}

/// Detach HEAD at `sha` and force the working tree to match
fn checkout_commit(repo: &Repository, sha: &str) -> Result<()> {
    let checkout_failed = |e: git2::Error| KclError::GitCheckoutFailed {
        sha: sha.to_string(),
        reason: e.message().to_string(),
    };

    let oid = git2::Oid::from_str(sha).map_err(checkout_failed)?;
    let commit = repo.find_commit(oid).map_err(checkout_failed)?;
    repo.set_head_detached(commit.id()).map_err(checkout_failed)?;

    let mut checkout_builder = git2::build::CheckoutBuilder::new();
    checkout_builder.force();
    repo.checkout_head(Some(&mut checkout_builder))
        .map_err(checkout_failed)
}

/// Rewrite SCP-style `git@host:path` to `ssh://git@host/path` for libgit2
fn normalize_ssh_url_for_clone(url: &str) -> Cow<'_, str> {
    if url.contains("://") || !crate::source::url::is_scp_like(url) {
        return Cow::Borrowed(url);
    }
    match url.split_once(':') {
        Some((user_host, path)) => {
            let path = path.strip_prefix('/').unwrap_or(path);
            Cow::Owned(format!("ssh://{user_host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Map a git2 error to a short user facing reason
fn interpret_git_error(err: &git2::Error) -> String {
    let class = err.class();
    let message = err.message().to_lowercase();

    if message.contains("not found") || message.contains("404") {
        "repository not found".to_string()
    } else if message.contains("too many redirects") || message.contains("authentication replays") {
        "repository not found".to_string()
    } else if message.contains("authentication") || message.contains("credentials") {
        "authentication failed".to_string()
    } else if message.contains("permission denied") || message.contains("access denied") {
        "permission denied".to_string()
    } else if message.contains("certificate") {
        "certificate error (use --insecure-skip-tls-verify to skip verification)".to_string()
    } else if message.contains("connection")
        || message.contains("network")
        || message.contains("timed out")
    {
        "network error".to_string()
    } else if class == ErrorClass::Http {
        format!("HTTP error: {}", err.message())
    } else if class == ErrorClass::Ssh {
        format!("SSH error: {}", err.message())
    } else {
        err.message().to_string()
    }
}

fn setup_callbacks(callbacks: &mut RemoteCallbacks, options: GitOptions) {
    if options.insecure_skip_tls_verify {
        warn!("TLS certificate verification is disabled for git fetches");
        callbacks.certificate_check(|_cert, _host| Ok(CertificateCheckStatus::CertificateOk));
    }

    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(username) = username_from_url {
                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");
                for key_name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let private_key = ssh_dir.join(key_name);
                    if !private_key.exists() {
                        continue;
                    }
                    let public_key = ssh_dir.join(format!("{key_name}.pub"));
                    let public_key = public_key.exists().then_some(public_key.as_path());
                    if let Ok(cred) = Cred::ssh_key(username, public_key, &private_key, None) {
                        return Ok(cred);
                    }
                }
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(config) = git2::Config::open_default() {
                if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
                    return Ok(cred);
                }
            }
            // Anonymous access for public https repositories
            if let Ok(cred) = Cred::userpass_plaintext(username_from_url.unwrap_or(""), "") {
                return Ok(cred);
            }
        }

        Err(git2::Error::new(
            git2::ErrorCode::Auth,
            ErrorClass::Http,
            "authentication failed",
        ))
    });
}
