use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::open_console;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AttachmentCommands {
    #[command(about = "Download an attachment, naming it from the server or its content")]
    Download {
        #[arg(help = "Attachment path on the API, e.g. /api/tickets/5/attachments/2")]
        path: String,
        #[arg(long, short, default_value = ".", help = "Directory to write into")]
        output: PathBuf,
    },
}

pub async fn handle(cmd: AttachmentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (console, _store) = open_console()?;

    match cmd {
        AttachmentCommands::Download { path, output } => {
            let attachment = console
                .client
                .download_attachment(&path)
                .await
                .map_err(|e| api_failure(&output_format, e))?;

            if !output.exists() {
                fs::create_dir_all(&output)?;
            }
            let target = output.join(&attachment.file_name);
            fs::write(&target, &attachment.bytes)?;

            output_success(
                &output_format,
                &format!(
                    "Saved {} ({}, {} bytes)",
                    target.display(),
                    attachment.mime_type,
                    attachment.len()
                ),
                Some(json!({
                    "path": target.display().to_string(),
                    "mime_type": attachment.mime_type,
                    "bytes": attachment.len(),
                })),
            )
        }
    }
}
