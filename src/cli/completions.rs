use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    kcl completions bash > ~/.bash_completion.d/kcl\n\n\
                  Generate zsh completions:\n    kcl completions zsh > ~/.zfunc/_kcl\n\n\
                  Generate fish completions:\n    kcl completions fish > ~/.config/fish/completions/kcl.fish\n\n\
                  Generate PowerShell completions:\n    kcl completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
