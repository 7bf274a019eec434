use clap::Subcommand;
use serde_json::json;

use crate::cli::config::get_config_dir;
use crate::cli::OutputFormat;
use crate::config::{self, DEFAULT_CIPHER_KEY};

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show effective configuration (the cipher key is masked)")]
    Show,
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = config::config();
            let config_dir = get_config_dir()?;
            let key_source = if config.token.cipher_key == DEFAULT_CIPHER_KEY {
                "built-in"
            } else {
                "environment"
            };

            let mut value = serde_json::to_value(config)?;
            value["token"]["cipher_key"] = json!(format!("<{} bytes, {}>", config.token.cipher_key.len(), key_source));
            value["cli_config_dir"] = json!(config_dir.display().to_string());

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&value)?),
                OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&value)?),
            }
            Ok(())
        }
    }
}
