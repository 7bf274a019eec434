use clap::Subcommand;

use crate::auth::{PermissionId, RouteDecision};
use crate::cli::config::open_console;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum RouteCommands {
    #[command(about = "Decide whether a detail route opens or redirects to its read-only view")]
    Check {
        #[arg(help = "Current path or URL, e.g. /ideas/edit/42")]
        path: String,
        #[arg(long, help = "Permission id or catalogue name the route requires")]
        permission: PermissionId,
    },
}

pub async fn handle(cmd: RouteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (console, _store) = open_console()?;

    match cmd {
        RouteCommands::Check { path, permission } => {
            let decision = console.guard.check(&path, permission);

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&decision)?),
                OutputFormat::Text => match &decision {
                    RouteDecision::Allow => println!("allow {}", path),
                    RouteDecision::Redirect(target) => println!("redirect {}", target),
                },
            }
            Ok(())
        }
    }
}
