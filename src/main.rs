//! KCL - command line front end for the KCL configuration language
//!
//! Runs KCL programs through the KCL compiler and manages KCL modules:
//! dependencies from registries, OCI artifacts, git repositories and local
//! paths, registry credentials and the local package cache.

use clap::Parser;
use miette::Diagnostic;

mod cli;
mod client;
mod commands;
mod common;
mod compiler;
mod config;
mod error;
mod format;
mod git;
mod hash;
mod lock;
mod logging;
mod manifest;
mod source;
mod temp;
mod ui;

use cli::{Cli, Commands};
use error::KclError;

fn report(err: &KclError) {
    eprintln!("Error: {err}");
    if let Some(help) = err.help() {
        eprintln!("  help: {help}");
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Mod(args) => commands::module::run(args),
        Commands::Registry(args) => commands::registry::run(args),
        Commands::Clean(args) => commands::clean::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}
