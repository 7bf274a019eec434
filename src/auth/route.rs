use serde::Serialize;
use url::Url;

use super::{PermissionGate, PermissionId};
use crate::config::RouteConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

impl RouteDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RouteDecision::Allow)
    }
}

/// Guards detail routes, sending denied users to the read-only view of the
/// same resource.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    gate: PermissionGate,
    routes: RouteConfig,
}

impl RouteGuard {
    pub fn new(gate: PermissionGate, routes: RouteConfig) -> Self {
        Self { gate, routes }
    }

    pub fn check(&self, current_path: &str, required: PermissionId) -> RouteDecision {
        if self.gate.has_access(required) {
            return RouteDecision::Allow;
        }

        let target = self.read_only_target(current_path);
        tracing::debug!(path = current_path, target = %target, "route denied");
        RouteDecision::Redirect(target)
    }

    /// Read-only route for the resource addressed by `current_path`
    pub fn read_only_target(&self, current_path: &str) -> String {
        match trailing_segment(current_path) {
            Some(id) => self.routes.read_only_template.replace("{id}", &id),
            None => self.routes.fallback_route.clone(),
        }
    }
}

/// Last non-empty path segment, ignoring query and fragment
pub fn trailing_segment(current_path: &str) -> Option<String> {
    let path = match Url::parse(current_path) {
        Ok(url) => url.path().to_string(),
        Err(_) => current_path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TokenCipher, TokenDecoder};
    use crate::config::DEFAULT_CIPHER_KEY;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn guard(token: Option<&str>) -> RouteGuard {
        let store = match token {
            Some(token) => MemoryStore::with_token(token),
            None => MemoryStore::new(),
        };
        let decoder = TokenDecoder::new(TokenCipher::with_zero_iv(DEFAULT_CIPHER_KEY).unwrap());
        RouteGuard::new(PermissionGate::new(Arc::new(store), decoder), RouteConfig::default())
    }

    #[test]
    fn test_trailing_segment() {
        assert_eq!(trailing_segment("/ideas/edit/42").as_deref(), Some("42"));
        assert_eq!(trailing_segment("/ideas/edit/42/").as_deref(), Some("42"));
        assert_eq!(trailing_segment("/ideas/edit/42?tab=2#top").as_deref(), Some("42"));
        assert_eq!(
            trailing_segment("https://admin.example.com/calls/edit/9?x=1").as_deref(),
            Some("9")
        );
        assert_eq!(trailing_segment("/"), None);
        assert_eq!(trailing_segment(""), None);
    }

    #[test]
    fn test_absent_credential_redirects_to_read_only_view() {
        let decision = guard(None).check("/ideas/edit/42", PermissionId(4201));
        assert_eq!(decision, RouteDecision::Redirect("/ideas/view/42".to_string()));
        assert!(!decision.is_allowed());
    }

    #[test]
    fn test_corrupted_credential_redirects() {
        let decision = guard(Some("corrupted")).check("/ideas/edit/7", PermissionId(4201));
        assert_eq!(decision, RouteDecision::Redirect("/ideas/view/7".to_string()));
    }

    #[test]
    fn test_root_path_falls_back() {
        let decision = guard(None).check("/", PermissionId(4201));
        assert_eq!(decision, RouteDecision::Redirect("/".to_string()));
    }
}
