//! Package source handling
//!
//! Parses and resolves where a package comes from:
//! - Local paths: `./shared`, `/abs/pkg`, `file:///abs/pkg`
//! - Git repositories: `git://github.com/kcl-lang/konfig`, `ssh://...`, `git@host:org/repo.git`
//! - OCI artifacts: `oci://ghcr.io/kcl-lang/helloworld?tag=0.1.0`
//! - Registry specs: `k8s`, `k8s:1.28`
//!
//! ## Module Organization
//!
//! - `spec.rs`: `name[:version]` grammar
//! - `url.rs`: scheme/host/path/query splitting
//! - `descriptor.rs`: the resolved [`Source`] model and its canonical url
//! - `resolve.rs`: positional arguments + flags → [`Source`]

pub mod descriptor;
pub mod resolve;
pub mod spec;
pub mod url;

pub use descriptor::{GitRef, GitSource, LocalSource, Source};
pub use resolve::{SourceFlags, resolve};
pub use spec::ModSpec;
