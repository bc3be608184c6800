//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - run: Run command arguments
//! - module: `kcl mod` subcommands and the shared package source flags
//! - registry: `kcl registry` subcommands
//! - clean: Clean command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod clean;
pub mod completions;
pub mod module;
pub mod registry;
pub mod run;

pub use clean::CleanArgs;
pub use completions::CompletionsArgs;
pub use module::{
    AddArgs, GraphArgs, InitArgs, MetadataArgs, ModArgs, ModCommand, PullArgs, UpdateArgs,
};
pub use registry::{LoginArgs, LogoutArgs, RegistryArgs, RegistryCommand};
pub use run::RunArgs;

/// The KCL Command Line Interface
///
/// Run KCL code and manage KCL modules and registries.
#[derive(Parser, Debug)]
#[command(
    name = "kcl",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "The KCL Command Line Interface (CLI).",
    long_about = "KCL is an open-source, constraint-based record and functional language that \
                  enhances the writing of complex configurations, including those for cloud-native \
                  scenarios.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  kcl run main.k                          \x1b[90m# Run a file and print YAML\x1b[0m\n   \
                  kcl run main.k --format json            \x1b[90m# Print JSON instead\x1b[0m\n   \
                  kcl mod init demo                       \x1b[90m# Create a new module\x1b[0m\n   \
                  kcl mod add k8s:1.28                    \x1b[90m# Add a registry dependency\x1b[0m\n   \
                  kcl mod add --git https://github.com/kcl-lang/konfig --tag v0.4.0\n   \
                  kcl registry login ghcr.io              \x1b[90m# Store registry credentials\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run KCL codes
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// KCL module management
    #[command(name = "mod")]
    Mod(ModArgs),

    /// KCL registry management
    #[command(visible_alias = "reg")]
    Registry(RegistryArgs),

    /// Remove the build and module caches
    Clean(CleanArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["kcl", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_verbose() {
        let cli = Cli::try_parse_from(["kcl", "mod", "graph", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_run_alias() {
        let cli = Cli::try_parse_from(["kcl", "r", "main.k"]).unwrap();
        match cli.command {
            Commands::Run(args) => assert_eq!(args.entries, ["main.k"]),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_registry_alias() {
        let cli = Cli::try_parse_from(["kcl", "reg", "logout", "ghcr.io"]).unwrap();
        assert!(matches!(cli.command, Commands::Registry(_)));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["kcl", "completions", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell, "bash");
            }
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
