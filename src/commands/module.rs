//! `kcl mod` command implementations
//!
//! Each subcommand builds a [`ModClient`] from the loaded settings, takes the
//! package cache lock where it touches the cache, and works on the package in
//! the current directory (`mod update` accepts another one).

use std::path::{Path, PathBuf};

use crate::cli::{
    AddArgs, GraphArgs, InitArgs, MetadataArgs, ModArgs, ModCommand, PullArgs, UpdateArgs,
};
use crate::client::{AddOptions, InitOptions, ModClient};
use crate::config::Settings;
use crate::error::Result;
use crate::git::GitOptions;
use crate::source::{SourceFlags, resolve};
use crate::ui;

pub fn run(args: ModArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let client = ModClient::new(Settings::load()?).with_reporter(ui::reporter(args.quiet));

    match args.command {
        ModCommand::Init(init_args) => init(&client, &cwd, init_args),
        ModCommand::Add(add_args) => add(client, &cwd, add_args),
        ModCommand::Pull(pull_args) => pull(client, &cwd, pull_args),
        ModCommand::Update(update_args) => update(client, &cwd, update_args),
        ModCommand::Graph(graph_args) => graph(client, &cwd, &graph_args),
        ModCommand::Metadata(metadata_args) => metadata(&client, &cwd, &metadata_args),
    }
}

/// Without a name the current directory becomes the package, named after it
fn init_options(cwd: &Path, name: Option<String>) -> InitOptions {
    match name {
        Some(name) => InitOptions {
            path: cwd.join(&name),
            name,
        },
        None => InitOptions {
            name: cwd
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            path: cwd.to_path_buf(),
        },
    }
}

fn init(client: &ModClient, cwd: &Path, args: InitArgs) -> Result<()> {
    client.init_package(&init_options(cwd, args.name))?;
    Ok(())
}

fn add(client: ModClient, cwd: &Path, args: AddArgs) -> Result<()> {
    let client = client.with_git_options(GitOptions {
        insecure_skip_tls_verify: args.insecure_skip_tls_verify,
    });
    let _lock = client.acquire_package_cache_lock()?;

    let source = resolve(&args.sources, &SourceFlags::from(&args.source))?;
    let mut package = client.load_package(cwd)?;
    let options = AddOptions {
        rename: args.rename,
        no_sum_check: args.no_sum_check,
    };
    client.add_dependency(&mut package, &source, &options)?;
    Ok(())
}

fn pull(client: ModClient, cwd: &Path, args: PullArgs) -> Result<()> {
    let client = client.with_git_options(GitOptions {
        insecure_skip_tls_verify: args.insecure_skip_tls_verify,
    });
    let _lock = client.acquire_package_cache_lock()?;

    let positional: Vec<String> = args.source.into_iter().collect();
    let source = resolve(&positional, &SourceFlags::from(&args.flags))?;
    let local_path = under_cwd(cwd, args.local_path);
    client.pull(&source, &local_path)?;
    Ok(())
}

fn under_cwd(cwd: &Path, local_path: Option<PathBuf>) -> PathBuf {
    match local_path {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd.to_path_buf(),
    }
}

fn update(client: ModClient, cwd: &Path, args: UpdateArgs) -> Result<()> {
    let client = client.with_git_options(GitOptions {
        insecure_skip_tls_verify: args.insecure_skip_tls_verify,
    });
    let _lock = client.acquire_package_cache_lock()?;

    let mut package = client.load_package(&under_cwd(cwd, args.path))?;
    client.update(&mut package, args.no_sum_check)
}

fn graph(client: ModClient, cwd: &Path, args: &GraphArgs) -> Result<()> {
    let client = client.with_git_options(GitOptions {
        insecure_skip_tls_verify: args.insecure_skip_tls_verify,
    });
    let _lock = client.acquire_package_cache_lock()?;

    let package = client.load_package(cwd)?;
    print!("{}", client.graph(&package)?);
    Ok(())
}

fn metadata(client: &ModClient, cwd: &Path, args: &MetadataArgs) -> Result<()> {
    let package = client.load_package(cwd)?;
    println!("{}", client.metadata(&package, args.vendor).to_json()?);
    Ok(())
}
