use std::path::PathBuf;

use clap::Parser;

/// Arguments for the clean command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Clean the build and module cache:\n    kcl clean\n\n\
                  Clean without prompts:\n    kcl clean -y")]
pub struct CleanArgs {
    /// Directory whose build cache is removed (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Automatically say yes to prompts
    #[arg(long, short = 'y')]
    pub yes: bool,
}
