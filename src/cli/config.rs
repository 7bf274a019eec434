use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config;
use crate::store::FileStore;
use crate::Console;

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("INNOHUB_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("innohub").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Credential store backing the CLI session
pub fn credential_store() -> anyhow::Result<FileStore> {
    Ok(FileStore::from_config(get_config_dir()?, &config::config().token))
}

/// Console wired to the CLI's persisted credential
pub fn open_console() -> anyhow::Result<(Console, Arc<FileStore>)> {
    let store = Arc::new(credential_store()?);
    let console = Console::new(config::config(), store.clone())?;
    Ok((console, store))
}
