use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::source::SourceFlags;

/// Arguments for the mod command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Initialize a new module:\n    kcl mod init my_module\n\n\
                  Add a dependency from the default registry:\n    kcl mod add k8s:1.28\n\n\
                  Pull a package into the current directory:\n    kcl mod pull --git https://github.com/kcl-lang/konfig\n\n\
                  Refresh kcl.mod.lock from kcl.mod:\n    kcl mod update\n\n\
                  Print the dependency graph:\n    kcl mod graph")]
pub struct ModArgs {
    /// Set the quiet mode (no output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: ModCommand,
}

#[derive(Subcommand, Debug)]
pub enum ModCommand {
    /// Initialize new module in current directory
    Init(InitArgs),

    /// Add new dependency
    Add(AddArgs),

    /// Pull a kcl package into a local directory
    Pull(PullArgs),

    /// Update dependencies listed in kcl.mod.lock based on kcl.mod
    Update(UpdateArgs),

    /// Print the dependency graph, one `package@version dependency@version` edge per line
    Graph(GraphArgs),

    /// Output the resolved dependencies of a package
    Metadata(MetadataArgs),
}

/// Package source flags shared by `mod add` and `mod pull`
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Git repository url
    #[arg(long)]
    pub git: Option<String>,

    /// OCI repository url
    #[arg(long)]
    pub oci: Option<String>,

    /// Local package path
    #[arg(long)]
    pub path: Option<String>,

    /// Git or OCI repository tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Git repository commit
    #[arg(long)]
    pub commit: Option<String>,

    /// Git repository branch
    #[arg(long)]
    pub branch: Option<String>,
}

impl From<&SourceArgs> for SourceFlags {
    fn from(args: &SourceArgs) -> Self {
        SourceFlags {
            git: args.git.clone(),
            oci: args.oci.clone(),
            path: args.path.clone(),
            tag: args.tag.clone(),
            commit: args.commit.clone(),
            branch: args.branch.clone(),
        }
    }
}

/// Arguments for the mod init command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Init one kcl module with the current folder name:\n    kcl mod init\n\n\
                  Init one kcl module with the name:\n    kcl mod init package-name")]
pub struct InitArgs {
    /// Package name; a directory of that name is created under the current directory
    pub name: Option<String>,
}

/// Arguments for the mod add command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Add the module dependency named \"k8s\":\n    kcl mod add k8s\n\n\
                  Add \"k8s\" with the version \"1.28\":\n    kcl mod add k8s:1.28\n\n\
                  Add a dependency from GitHub by git url:\n    kcl mod add git://github.com/kcl-lang/konfig --tag v0.4.0\n\n\
                  Add a dependency from an OCI registry by oci url:\n    kcl mod add oci://ghcr.io/kcl-lang/helloworld --tag 0.1.0\n\n\
                  Add a sub-package of a git repository:\n    kcl mod add helloworld --git https://github.com/kcl-lang/modules --tag v0.1.0\n\n\
                  Add a local dependency:\n    kcl mod add /path/to/another_module\n    \
                  kcl mod add --path /path/to/another_module")]
pub struct AddArgs {
    /// Package spec (name[:version]), url or local path
    pub sources: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Rename the dependency
    #[arg(long)]
    pub rename: Option<String>,

    /// Do not check the checksum of the package and update kcl.mod.lock
    #[arg(long = "no_sum_check")]
    pub no_sum_check: bool,

    /// Skip TLS certificate verification when fetching over https
    #[arg(long = "insecure-skip-tls-verify")]
    pub insecure_skip_tls_verify: bool,
}

/// Arguments for the mod pull command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Pull a git repository at a tag:\n    kcl mod pull --git https://github.com/kcl-lang/konfig --tag v0.4.0\n\n\
                  Pull a sub-package into a local path:\n    kcl mod pull helloworld --git https://github.com/kcl-lang/modules /tmp/pkgs\n\n\
                  Pull from a git url:\n    kcl mod pull git://github.com/kcl-lang/konfig?tag=v0.4.0")]
pub struct PullArgs {
    /// Package spec, url or local path
    pub source: Option<String>,

    /// Directory to pull into (defaults to the current directory)
    pub local_path: Option<PathBuf>,

    #[command(flatten)]
    pub flags: SourceArgs,

    /// Skip TLS certificate verification when fetching over https
    #[arg(long = "insecure-skip-tls-verify")]
    pub insecure_skip_tls_verify: bool,
}

/// Arguments for the mod update command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Update the current module:\n    kcl mod update\n\n\
                  Update the module at a path:\n    kcl mod update path/to/package")]
pub struct UpdateArgs {
    /// Package directory (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Do not check the checksum of the package and update kcl.mod.lock
    #[arg(long = "no_sum_check")]
    pub no_sum_check: bool,

    /// Skip TLS certificate verification when fetching over https
    #[arg(long = "insecure-skip-tls-verify")]
    pub insecure_skip_tls_verify: bool,
}

/// Arguments for the mod graph command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Print the current module dependency graph:\n    kcl mod graph")]
pub struct GraphArgs {
    /// Skip TLS certificate verification when fetching over https
    #[arg(long = "insecure-skip-tls-verify")]
    pub insecure_skip_tls_verify: bool,
}

/// Arguments for the mod metadata command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Output the resolved dependencies of the current module:\n    kcl mod metadata\n\n\
                  Output them in vendor mode:\n    kcl mod metadata --vendor")]
pub struct MetadataArgs {
    /// Run in vendor mode
    #[arg(long)]
    pub vendor: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    fn parse(args: &[&str]) -> ModArgs {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Mod(args) => args,
            _ => panic!("Expected Mod command"),
        }
    }

    #[test]
    fn test_mod_add_with_flags() {
        let args = parse(&[
            "kcl",
            "mod",
            "add",
            "helloworld",
            "--git",
            "https://github.com/kcl-lang/modules",
            "--tag",
            "v0.1.0",
            "--rename",
            "hello",
            "-q",
        ]);
        assert!(args.quiet);
        match args.command {
            ModCommand::Add(add) => {
                assert_eq!(add.sources, ["helloworld"]);
                assert_eq!(add.rename.as_deref(), Some("hello"));
                let flags = SourceFlags::from(&add.source);
                assert_eq!(flags.git.as_deref(), Some("https://github.com/kcl-lang/modules"));
                assert_eq!(flags.tag.as_deref(), Some("v0.1.0"));
                assert!(flags.oci.is_none());
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_mod_add_underscore_flags() {
        let args = parse(&["kcl", "mod", "add", "k8s", "--no_sum_check"]);
        match args.command {
            ModCommand::Add(add) => assert!(add.no_sum_check),
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_mod_pull_local_path() {
        let args = parse(&["kcl", "mod", "pull", "k8s:1.28", "/tmp/pkgs"]);
        match args.command {
            ModCommand::Pull(pull) => {
                assert_eq!(pull.source.as_deref(), Some("k8s:1.28"));
                assert_eq!(pull.local_path, Some(PathBuf::from("/tmp/pkgs")));
            }
            _ => panic!("Expected Pull command"),
        }
    }

    #[test]
    fn test_mod_update_path_and_flags() {
        let args = parse(&["kcl", "mod", "update", "pkgs/app", "--no_sum_check"]);
        match args.command {
            ModCommand::Update(update) => {
                assert_eq!(update.path, Some(PathBuf::from("pkgs/app")));
                assert!(update.no_sum_check);
                assert!(!update.insecure_skip_tls_verify);
            }
            _ => panic!("Expected Update command"),
        }
    }

    #[test]
    fn test_mod_init_without_name() {
        let args = parse(&["kcl", "mod", "init"]);
        assert!(matches!(args.command, ModCommand::Init(InitArgs { name: None })));
    }

    #[test]
    fn test_mod_metadata_vendor() {
        let args = parse(&["kcl", "mod", "metadata", "--vendor"]);
        assert!(matches!(
            args.command,
            ModCommand::Metadata(MetadataArgs { vendor: true })
        ));
    }
}
