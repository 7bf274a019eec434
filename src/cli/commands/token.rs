use clap::Subcommand;
use serde_json::json;

use crate::auth::TokenDecoder;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Decrypt and decode a sealed token without storing it")]
    Decode {
        #[arg(help = "Sealed token (base64)")]
        token: String,
    },

    #[command(about = "Seal a JWT with the configured key, for fixtures and local testing")]
    Seal {
        #[arg(help = "JWT to seal")]
        jwt: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let decoder = TokenDecoder::from_config(&config::config().token)?;

    match cmd {
        TokenCommands::Decode { token } => {
            let claims = decoder.decode(&token)?;
            output_value(&output_format, &serde_json::to_value(&claims)?)
        }
        TokenCommands::Seal { jwt } => {
            let sealed = decoder.cipher().seal(&jwt)?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "token": sealed }))?)
                }
                OutputFormat::Text => println!("{}", sealed),
            }
            Ok(())
        }
    }
}
