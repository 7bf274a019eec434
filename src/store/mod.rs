pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Refusing to store an empty credential")]
    EmptyCredential,

    #[error("Credential expiry of {0} days is out of range")]
    InvalidExpiry(i64),
}

/// Single-slot holder of the session credential.
///
/// One active credential at a time; `set` replaces it and `clear` drops it
/// from every copy the store keeps. `get` never errors: an unreadable or
/// expired credential reads as absent.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;

    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}
