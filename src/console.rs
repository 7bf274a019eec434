use std::sync::Arc;

use thiserror::Error;

use crate::api::ApiClient;
use crate::auth::{PermissionGate, RouteGuard, TokenDecoder, TokenError};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::store::CredentialStore;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Invalid token configuration: {0}")]
    Token(#[from] TokenError),

    #[error("Invalid API configuration: {0}")]
    Api(#[from] ApiError),
}

/// Everything a screen needs, built around one injected credential store
#[derive(Debug, Clone)]
pub struct Console {
    pub decoder: TokenDecoder,
    pub gate: PermissionGate,
    pub guard: RouteGuard,
    pub client: ApiClient,
}

impl Console {
    pub fn new(config: &AppConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ConsoleError> {
        let decoder = TokenDecoder::from_config(&config.token)?;
        let gate = PermissionGate::new(store.clone(), decoder.clone());
        let guard = RouteGuard::new(gate.clone(), config.routes.clone());
        let client = ApiClient::new(&config.api, config.paths.clone(), store)?;

        Ok(Self {
            decoder,
            gate,
            guard,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PermissionId;
    use crate::store::MemoryStore;

    #[test]
    fn test_parts_share_the_store() {
        let store = Arc::new(MemoryStore::new());
        let console = Console::new(&AppConfig::from_env(), store.clone()).unwrap();

        store.set("not-a-token").unwrap();
        assert!(console.gate.store().is_present());
        assert!(console.client.store().is_present());
        assert!(!console.gate.has_access(PermissionId(1)));
    }

    #[test]
    fn test_bad_key_is_reported() {
        let mut config = AppConfig::from_env();
        config.token.cipher_key = "too-short".to_string();
        let err = Console::new(&config, Arc::new(MemoryStore::new())).unwrap_err();
        assert!(matches!(err, ConsoleError::Token(TokenError::InvalidKeyLength(9))));
    }
}
