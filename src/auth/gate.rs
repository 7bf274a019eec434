use std::sync::Arc;

use super::{Claims, PermissionId, TokenDecoder};
use crate::store::CredentialStore;

/// Render-time permission check over the stored credential.
///
/// Every call re-reads the store and re-decodes the token. A missing
/// credential, or one that fails to decode, grants nothing.
#[derive(Clone)]
pub struct PermissionGate {
    store: Arc<dyn CredentialStore>,
    decoder: TokenDecoder,
}

impl PermissionGate {
    pub fn new(store: Arc<dyn CredentialStore>, decoder: TokenDecoder) -> Self {
        Self { store, decoder }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Claims of the current session, `None` when absent or undecodable
    pub fn claims(&self) -> Option<Claims> {
        let token = self.store.get()?;
        match self.decoder.decode(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::warn!("Stored credential could not be decoded, denying: {}", e);
                None
            }
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.claims().and_then(|claims| claims.user_id)
    }

    pub fn has_access(&self, required: PermissionId) -> bool {
        let allowed = self
            .claims()
            .map(|claims| claims.permissions.contains(required))
            .unwrap_or(false);
        tracing::debug!(permission = required.value(), allowed, "permission check");
        allowed
    }

    pub fn has_any(&self, required: &[PermissionId]) -> bool {
        self.claims()
            .map(|claims| claims.permissions.contains_any(required))
            .unwrap_or(false)
    }

    pub fn has_all(&self, required: &[PermissionId]) -> bool {
        self.claims()
            .map(|claims| claims.permissions.contains_all(required))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}
