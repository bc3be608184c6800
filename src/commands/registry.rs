//! `kcl registry` command implementations

use crate::cli::{LoginArgs, LogoutArgs, RegistryArgs, RegistryCommand};
use crate::client::ModClient;
use crate::config::Settings;
use crate::error::Result;
use crate::ui::{self, prompt};

pub fn run(args: RegistryArgs) -> Result<()> {
    let client = ModClient::new(Settings::load()?).with_reporter(ui::reporter(args.quiet));
    match args.command {
        RegistryCommand::Login(login_args) => login(&client, login_args),
        RegistryCommand::Logout(logout_args) => logout(&client, &logout_args),
    }
}

/// Missing credentials are asked for interactively
fn login(client: &ModClient, args: LoginArgs) -> Result<()> {
    let username = match args.username {
        Some(username) => username,
        None => prompt::username()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt::password()?,
    };
    client.login(&args.registry, &username, &password)
}

fn logout(client: &ModClient, args: &LogoutArgs) -> Result<()> {
    client.logout(&args.registry)
}
