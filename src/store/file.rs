use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{CredentialStore, StoreError};
use crate::config::TokenConfig;

const COOKIE_FILE: &str = "credential.json";
const MIRROR_FILE: &str = "local.json";

/// Cookie-like record holding the credential and its expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredCredential {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Credential persisted under a config directory.
///
/// The primary copy is an expiring cookie record; a plain name/value mirror
/// sits next to it for convenience reads. Both are written by `set` and
/// removed by `clear`; when the second step fails the first is rolled back.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    name: String,
    expiry_days: i64,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>, expiry_days: i64) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            expiry_days,
        }
    }

    pub fn from_config(dir: impl Into<PathBuf>, config: &TokenConfig) -> Self {
        Self::new(dir, config.credential_name.clone(), config.expiry_days)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn cookie_path(&self) -> PathBuf {
        self.dir.join(COOKIE_FILE)
    }

    fn mirror_path(&self) -> PathBuf {
        self.dir.join(MIRROR_FILE)
    }

    /// Full cookie record, expired or not
    pub fn record(&self) -> Result<Option<StoredCredential>, StoreError> {
        let path = self.cookie_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let record: StoredCredential = serde_json::from_str(&content)?;
        if record.name != self.name {
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Value from the secondary copy
    pub fn mirror_value(&self) -> Option<String> {
        self.load_mirror().ok()?.remove(&self.name)
    }

    pub fn set_with_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        if token.trim().is_empty() {
            return Err(StoreError::EmptyCredential);
        }
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let record = StoredCredential {
            name: self.name.clone(),
            value: token.to_string(),
            created_at: Utc::now(),
            expires_at,
        };
        let mut mirror = self.load_mirror().unwrap_or_default();
        mirror.insert(self.name.clone(), token.to_string());
        let cookie_json = serde_json::to_string_pretty(&record)?;
        let mirror_json = serde_json::to_string_pretty(&mirror)?;

        let cookie = self.cookie_path();
        let previous = fs::read_to_string(&cookie).ok();
        write_atomic(&cookie, &cookie_json)?;

        if let Err(e) = write_atomic(&self.mirror_path(), &mirror_json) {
            let restored = match previous {
                Some(content) => write_atomic(&cookie, &content),
                None => fs::remove_file(&cookie).map_err(StoreError::from),
            };
            if let Err(rollback) = restored {
                tracing::error!("Could not roll back credential at {}: {}", cookie.display(), rollback);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Expiry for a credential stored now
    fn expires_from_now(&self) -> Result<DateTime<Utc>, StoreError> {
        Duration::try_days(self.expiry_days)
            .and_then(|expiry| Utc::now().checked_add_signed(expiry))
            .ok_or(StoreError::InvalidExpiry(self.expiry_days))
    }

    fn load_mirror(&self) -> Result<HashMap<String, String>, StoreError> {
        let path = self.mirror_path();
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl CredentialStore for FileStore {
    fn get(&self) -> Option<String> {
        match self.record() {
            Ok(Some(record)) if !record.is_expired(Utc::now()) => Some(record.value),
            Ok(Some(_)) => {
                tracing::debug!("Stored credential '{}' has expired", self.name);
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable credential at {}: {}", self.dir.display(), e);
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        self.set_with_expiry(token, self.expires_from_now()?)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mirror_path = self.mirror_path();
        let previous = fs::read_to_string(&mirror_path).ok();

        let mut mirror = self.load_mirror().unwrap_or_default();
        if mirror.remove(&self.name).is_some() {
            if mirror.is_empty() {
                fs::remove_file(&mirror_path)?;
            } else {
                write_atomic(&mirror_path, &serde_json::to_string_pretty(&mirror)?)?;
            }
        }

        let cookie = self.cookie_path();
        if cookie.exists() {
            if let Err(e) = fs::remove_file(&cookie) {
                if let Some(content) = previous {
                    if let Err(rollback) = write_atomic(&mirror_path, &content) {
                        tracing::error!("Could not restore {}: {}", mirror_path.display(), rollback);
                    }
                }
                return Err(e.into());
            }
        }

        Ok(())
    }
}

// Readers never observe a half-written file.
fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(tmp, path)?;
    Ok(())
}
