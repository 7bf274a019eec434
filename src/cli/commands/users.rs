use clap::Subcommand;
use serde_json::json;

use crate::cli::config::open_console;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Set a user's password")]
    Password {
        #[arg(help = "User ID")]
        id: String,
        #[arg(long, help = "New password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Confirmation (will prompt if not provided)")]
        confirm: Option<String>,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (console, _store) = open_console()?;

    match cmd {
        UserCommands::Password { id, password, confirm } => {
            let password = match password {
                Some(password) => password,
                None => prompt_line("New password")?,
            };
            let confirm = match confirm {
                Some(confirm) => confirm,
                None => prompt_line("Confirm password")?,
            };

            console
                .client
                .change_password(&id, &password, &confirm)
                .await
                .map_err(|e| api_failure(&output_format, e))?;

            output_success(
                &output_format,
                &format!("Password changed for user {}", id),
                Some(json!({ "user_id": id })),
            )
        }
    }
}
