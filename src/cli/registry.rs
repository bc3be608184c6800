use clap::{Parser, Subcommand};

/// Arguments for the registry command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Login to a registry:\n    kcl registry login -u <username> -p <password> ghcr.io\n\n\
                  Logout from a registry:\n    kcl registry logout ghcr.io")]
pub struct RegistryArgs {
    /// Set the quiet mode (no output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: RegistryCommand,
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommand {
    /// Login to a registry
    Login(LoginArgs),

    /// Logout from a registry
    Logout(LogoutArgs),
}

/// Arguments for the registry login command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Login with a username and password:\n    kcl registry login -u <username> -p <password> ghcr.io\n\n\
                  Login and be prompted for the credentials:\n    kcl registry login ghcr.io")]
pub struct LoginArgs {
    /// Registry host, e.g. ghcr.io
    pub registry: String,

    /// Registry username
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Registry password or identity token
    #[arg(long, short = 'p')]
    pub password: Option<String>,
}

/// Arguments for the registry logout command
#[derive(Parser, Debug)]
pub struct LogoutArgs {
    /// Registry host, e.g. ghcr.io
    pub registry: String,
}
