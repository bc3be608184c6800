//! Error types and handling for the KCL CLI
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostics codes and help text.
//!
//! Variants are grouped by the layer that raises them:
//! - source resolution (positional arguments and source flags)
//! - package manifests (`kcl.mod`, `kcl.mod.lock`)
//! - module client operations (add, pull, graph, cache lock)
//! - registry credentials
//! - run command and output formatting
//! - file system

use miette::Diagnostic;
use thiserror::Error;


/// Main error type for CLI operations
#[derive(Error, Diagnostic, Debug)]
pub enum KclError {
    // Source resolution errors
    #[error("{message}")]
    #[diagnostic(
        code(kcl::source::ambiguous),
        help("Specify a single package source: a path, a url, a name[:version] or one of --git/--oci/--path")
    )]
    AmbiguousSource { message: String },

    #[error("invalid package spec '{input}'")]
    #[diagnostic(
        code(kcl::source::invalid_spec),
        help("Package specs have the form <name> or <name>:<version>, e.g. k8s:1.28")
    )]
    InvalidSpec { input: String },

    #[error("invalid url '{url}': {reason}")]
    #[diagnostic(
        code(kcl::source::invalid_url),
        help("Valid formats: git://host/repo, ssh://host/repo, oci://registry/repo, https://host/repo")
    )]
    InvalidUrl { url: String, reason: String },

    #[error("path '{path}' does not exist")]
    #[diagnostic(code(kcl::source::path_not_exist))]
    PathNotExist { path: String },

    #[error("the local path is empty")]
    #[diagnostic(code(kcl::source::empty_local_path))]
    EmptyLocalPath,

    #[error("conflicting {first} and {second}: only one of tag, commit or branch may be set")]
    #[diagnostic(code(kcl::source::conflicting_refinement))]
    ConflictingRefinement { first: String, second: String },

    #[error("{refinement} is not supported for {kind} sources")]
    #[diagnostic(
        code(kcl::source::unsupported_refinement),
        help("--commit and --branch apply to git sources only; --tag applies to git, oci and registry sources")
    )]
    UnsupportedRefinement { refinement: String, kind: String },

    #[error("no package source specified")]
    #[diagnostic(
        code(kcl::source::none),
        help("Pass a package spec, path or url, or use --git, --oci or --path")
    )]
    NoSource,

    // Manifest errors
    #[error("could not load 'kcl.mod' in '{path}'")]
    #[diagnostic(
        code(kcl::manifest::not_found),
        help("Run 'kcl mod init' to create a new module")
    )]
    ManifestNotFound { path: String },

    #[error("failed to parse '{path}': {reason}")]
    #[diagnostic(code(kcl::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error("package '{name}' not found in '{source_url}'")]
    #[diagnostic(
        code(kcl::manifest::sub_package_not_found),
        help("The sub-package name must match the [package] name of a kcl.mod inside the source")
    )]
    SubPackageNotFound { name: String, source_url: String },

    // Module client errors
    #[error("invalid 'kcl mod init' options: the package name is empty")]
    #[diagnostic(code(kcl::module::invalid_init_options))]
    InvalidInitOptions,

    #[error("cannot add '{name}' as a dependency to itself")]
    #[diagnostic(code(kcl::module::add_itself))]
    AddItselfAsDep { name: String },

    #[error("'{path}' already exists and is not empty")]
    #[diagnostic(
        code(kcl::module::target_exists),
        help("Remove the directory or pull into a different local path")
    )]
    PullTargetExists { path: String },

    #[error("fetching '{url}' is not supported by this client")]
    #[diagnostic(
        code(kcl::module::unsupported_transport),
        help("OCI artifacts are fetched by the registry client; git and local sources are supported here")
    )]
    UnsupportedTransport { url: String },

    #[error("the package cache at '{path}' is locked by another kcl process")]
    #[diagnostic(
        code(kcl::module::cache_locked),
        help("Wait for the other process to finish, then retry")
    )]
    PackageCacheLocked { path: String },

    #[error("failed to lock the package cache: {reason}")]
    #[diagnostic(code(kcl::module::lock_failed))]
    LockFailed { reason: String },

    // Git errors
    #[error("failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(kcl::git::clone_failed),
        help("Check that the url is correct and you have access to the repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(kcl::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("failed to checkout commit '{sha}': {reason}")]
    #[diagnostic(code(kcl::git::checkout_failed))]
    GitCheckoutFailed { sha: String, reason: String },

    // Registry errors
    #[error("not logged in to '{registry}'")]
    #[diagnostic(code(kcl::registry::not_logged_in))]
    NotLoggedIn { registry: String },

    #[error("invalid registry '{registry}'")]
    #[diagnostic(
        code(kcl::registry::invalid),
        help("Pass a registry host such as ghcr.io or https://localhost:5001")
    )]
    InvalidRegistry { registry: String },

    #[error("failed to read configuration file '{path}': {reason}")]
    #[diagnostic(code(kcl::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("could not determine the home directory")]
    #[diagnostic(
        code(kcl::config::no_home),
        help("Set KCL_PKG_PATH to choose the package home explicitly")
    )]
    HomeNotFound,

    // Run and output errors
    #[error("invalid output format, expected one of [yaml, json, toml, xml], got '{format}'")]
    #[diagnostic(code(kcl::run::invalid_format))]
    InvalidOutputFormat { format: String },

    #[error("failed to load '{path}', no such file or directory")]
    #[diagnostic(code(kcl::run::settings_not_found))]
    SettingsFileNotFound { path: String },

    #[error("compiler '{program}' could not be started: {reason}")]
    #[diagnostic(
        code(kcl::run::compiler_not_found),
        help("Install the KCL compiler or point KCL_COMPILER at its executable")
    )]
    CompilerNotFound { program: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(kcl::run::compile_failed))]
    CompileFailed { message: String },

    #[error("failed to format output: {reason}")]
    #[diagnostic(code(kcl::format::failed))]
    FormatFailed { reason: String },

    // File system errors
    #[error("failed to read file: {path}: {reason}")]
    #[diagnostic(code(kcl::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("failed to write file: {path}: {reason}")]
    #[diagnostic(code(kcl::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(kcl::fs::io_error))]
    IoError { message: String },

    #[error("unknown shell '{shell}'")]
    #[diagnostic(
        code(kcl::completions::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    #[error("prompt failed: {reason}")]
    #[diagnostic(code(kcl::ui::prompt_failed))]
    PromptFailed { reason: String },
}

impl From<std::io::Error> for KclError {
    fn from(err: std::io::Error) -> Self {
        KclError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for KclError {
    fn from(err: serde_yaml::Error) -> Self {
        KclError::FormatFailed {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for KclError {
    fn from(err: serde_json::Error) -> Self {
        KclError::FormatFailed {
            reason: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for KclError {
    fn from(err: toml::ser::Error) -> Self {
        KclError::FormatFailed {
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for KclError {
    fn from(err: inquire::InquireError) -> Self {
        KclError::PromptFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, KclError>;
