use clap::Subcommand;
use serde_json::json;

use crate::auth::{Claims, PermissionGroup, PermissionId};
use crate::cli::config::open_console;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::store::CredentialStore;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and clear the stored credential")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show the decoded claims of the current session")]
    Whoami,

    #[command(about = "List permissions granted to the current session")]
    Permissions,

    #[command(about = "Check one or more permission ids (exit code 1 if any is denied)")]
    Check {
        #[arg(required = true, help = "Permission ids or catalogue names")]
        permissions: Vec<PermissionId>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (console, store) = open_console()?;

    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_line("Password")?,
            };

            let claims = console
                .client
                .login(&username, &password, &console.decoder)
                .await
                .map_err(|e| api_failure(&output_format, e))?;

            let data = claims.as_ref().map(|claims| {
                json!({
                    "user_id": claims.user_id,
                    "permissions": claims.permissions,
                })
            });
            output_success(&output_format, &format!("Logged in as {}", username), data)?;

            if claims.is_none() {
                eprintln!("Warning: the stored token could not be decoded; all permission checks will deny");
            }
            Ok(())
        }
        AuthCommands::Logout => {
            console.client.logout()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let record = store.record().ok().flatten();
            let claims = console.gate.claims();

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "logged_in": store.is_present(),
                        "decodable": claims.is_some(),
                        "credential_expires_at": record.as_ref().map(|r| r.expires_at),
                        "token_expires_at": claims.as_ref().and_then(|c| c.expires_at()),
                        "user_id": claims.as_ref().and_then(|c| c.user_id),
                    }))?);
                }
                OutputFormat::Text => {
                    if !store.is_present() {
                        println!("Not logged in");
                        return Ok(());
                    }
                    match &claims {
                        Some(Claims { user_id: Some(id), .. }) => println!("Logged in as user {}", id),
                        Some(_) => println!("Logged in, but the token carries no user id"),
                        None => println!("Logged in, but the stored token cannot be decoded"),
                    }
                    if let Some(record) = record {
                        println!("Credential expires: {}", record.expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                    if let Some(exp) = claims.as_ref().and_then(|c| c.expires_at()) {
                        println!("Token exp claim:    {}", exp.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Whoami => {
            let claims = console
                .gate
                .claims()
                .ok_or_else(|| anyhow::anyhow!("No decodable credential stored. Use 'innohub auth login' first"))?;
            output_value(&output_format, &serde_json::to_value(&claims)?)
        }
        AuthCommands::Permissions => {
            let permissions = console
                .gate
                .claims()
                .map(|claims| claims.permissions)
                .unwrap_or_default();

            match output_format {
                OutputFormat::Json => {
                    let items: Vec<_> = permissions
                        .iter()
                        .map(|id| json!({
                            "id": id.value(),
                            "name": id.name(),
                            "group": id.group(),
                        }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json!({ "permissions": items }))?);
                }
                OutputFormat::Text => {
                    if permissions.is_empty() {
                        println!("No permissions granted");
                        return Ok(());
                    }
                    for (title, group) in [("Navigation", PermissionGroup::Navigation), ("Actions", PermissionGroup::Action)] {
                        let ids: Vec<_> = permissions.in_group(group).collect();
                        if ids.is_empty() {
                            continue;
                        }
                        println!("{}:", title);
                        for id in ids {
                            println!("  {}", id);
                        }
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Check { permissions } => {
            let results: Vec<_> = permissions
                .iter()
                .map(|id| (*id, console.gate.has_access(*id)))
                .collect();

            match output_format {
                OutputFormat::Json => {
                    let items: Vec<_> = results
                        .iter()
                        .map(|(id, allowed)| json!({ "id": id.value(), "allowed": allowed }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json!({ "checks": items }))?);
                }
                OutputFormat::Text => {
                    for (id, allowed) in &results {
                        println!("{} {}", if *allowed { "allow" } else { "deny " }, id);
                    }
                }
            }

            if results.iter().all(|(_, allowed)| *allowed) {
                Ok(())
            } else {
                Err(anyhow::anyhow!("One or more permissions are not granted"))
            }
        }
    }
}
