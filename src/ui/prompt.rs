//! Interactive prompts

use inquire::{Confirm, Password, PasswordDisplayMode, Text};

use crate::error::Result;

/// Ask a yes/no question
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new(message)
        .with_default(default)
        .with_help_message("Press Enter to confirm, or 'n' to skip")
        .prompt()?)
}

pub fn username() -> Result<String> {
    Ok(Text::new("Username:").prompt()?)
}

pub fn password() -> Result<String> {
    Ok(Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()?)
}
