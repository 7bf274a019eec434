use clap::Parser;
use innohub_admin::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so INNOHUB_API_URL, INNOHUB_TOKEN_KEY, etc. are picked up
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = innohub_admin::config::config();
    tracing::debug!("Using {:?} profile against {}", config.environment, config.api.base_url);
    if innohub_admin::is_production!() && config.token.cipher_key == innohub_admin::config::DEFAULT_CIPHER_KEY {
        tracing::warn!("Production profile is using the built-in token key; set INNOHUB_TOKEN_KEY");
    }

    let cli = Cli::parse();

    if let Err(e) = innohub_admin::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
