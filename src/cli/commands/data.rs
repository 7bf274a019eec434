use clap::Subcommand;
use serde_json::json;

use crate::api::Resource;
use crate::auth::PermissionId;
use crate::cli::config::open_console;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List records of a resource")]
    List {
        #[arg(help = "Resource (users, roles, calls, ideas, tickets, blogs, news, pages, menus)")]
        resource: Resource,
        #[arg(long = "query", short = 'q', help = "Query parameter as key=value (repeatable)")]
        query: Vec<String>,
        #[arg(long, help = "Permission required to view this list")]
        require: Option<PermissionId>,
    },

    #[command(about = "Show one record")]
    Get {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Record ID")]
        id: String,
        #[arg(long, help = "Permission required to view this record")]
        require: Option<PermissionId>,
    },

    #[command(about = "Create record from stdin")]
    Create {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(long, help = "Permission required to create")]
        require: Option<PermissionId>,
    },

    #[command(about = "Update record from stdin")]
    Update {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Record ID to update")]
        id: String,
        #[arg(long, help = "Permission required to update")]
        require: Option<PermissionId>,
    },

    #[command(about = "Delete record")]
    Delete {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Record ID to delete")]
        id: String,
        #[arg(long, help = "Permission required to delete")]
        require: Option<PermissionId>,
    },

    #[command(about = "Change the workflow status of a record (tickets, ideas, calls)")]
    Status {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Record ID")]
        id: String,
        #[arg(help = "New status")]
        status: String,
        #[arg(long, help = "Permission required to change status")]
        require: Option<PermissionId>,
    },
}

pub async fn handle(cmd: DataCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (console, _store) = open_console()?;
    let client = &console.client;

    match cmd {
        DataCommands::List { resource, query, require } => {
            gate_action(&console.gate, require, &output_format)?;
            let query = parse_query(&query)?;
            let records = client
                .list(resource, &query)
                .await
                .map_err(|e| api_failure(&output_format, e))?;
            output_value(&output_format, &records)
        }
        DataCommands::Get { resource, id, require } => {
            gate_action(&console.gate, require, &output_format)?;
            let record = client
                .get(resource, &id)
                .await
                .map_err(|e| api_failure(&output_format, e))?;
            output_value(&output_format, &record)
        }
        DataCommands::Create { resource, require } => {
            gate_action(&console.gate, require, &output_format)?;
            let body = read_stdin_json()?;
            let created = client
                .create(resource, &body)
                .await
                .map_err(|e| api_failure(&output_format, e))?;
            output_success(
                &output_format,
                &format!("Created {} record", resource),
                Some(json!({ "record": created })),
            )
        }
        DataCommands::Update { resource, id, require } => {
            gate_action(&console.gate, require, &output_format)?;
            let body = read_stdin_json()?;
            let updated = client
                .update(resource, &id, &body)
                .await
                .map_err(|e| api_failure(&output_format, e))?;
            output_success(
                &output_format,
                &format!("Updated {} record {}", resource, id),
                Some(json!({ "record": updated })),
            )
        }
        DataCommands::Delete { resource, id, require } => {
            gate_action(&console.gate, require, &output_format)?;
            client
                .delete(resource, &id)
                .await
                .map_err(|e| api_failure(&output_format, e))?;
            output_success(
                &output_format,
                &format!("Deleted {} record {}", resource, id),
                Some(json!({ "id": id })),
            )
        }
        DataCommands::Status { resource, id, status, require } => {
            gate_action(&console.gate, require, &output_format)?;
            let updated = client
                .set_status(resource, &id, &status)
                .await
                .map_err(|e| api_failure(&output_format, e))?;
            output_success(
                &output_format,
                &format!("Set {} record {} to '{}'", resource, id, status),
                Some(json!({ "record": updated })),
            )
        }
    }
}
