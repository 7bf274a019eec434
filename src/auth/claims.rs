use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::permission::{PermissionId, PermissionSet};

/// Decoded payload of the console token.
///
/// Only `userId` and `Permissions` are interpreted; every other claim
/// (`exp`, `iat`, names, roles) is kept verbatim in `extra`. A missing or
/// unreadable `userId` leaves `user_id` empty without touching permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(
        rename = "userId",
        default,
        deserialize_with = "lenient_user_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<i64>,

    #[serde(rename = "Permissions", default)]
    pub permissions: PermissionSet,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new(user_id: i64, permissions: PermissionSet) -> Self {
        Self {
            user_id: Some(user_id),
            permissions,
            extra: Map::new(),
        }
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn has_permission(&self, id: PermissionId) -> bool {
        self.permissions.contains(id)
    }

    /// `exp` claim as a timestamp, when present and numeric
    pub fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.extra
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }

    /// Lookup of a passthrough claim as a string
    pub fn claim_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

fn lenient_user_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    if parsed.is_none() {
        tracing::warn!("Ignoring unreadable userId claim: {}", value);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_names() {
        let claims: Claims = serde_json::from_value(json!({
            "userId": 17,
            "Permissions": [2001, 4205],
            "exp": 1900000000,
            "unique_name": "admin"
        }))
        .unwrap();

        assert_eq!(claims.user_id, Some(17));
        assert!(claims.has_permission(PermissionId(4205)));
        assert_eq!(claims.claim_str("unique_name"), Some("admin"));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1900000000);
    }

    #[test]
    fn test_string_user_id() {
        let claims: Claims = serde_json::from_value(json!({ "userId": "42" })).unwrap();
        assert_eq!(claims.user_id, Some(42));
        assert!(claims.permissions.is_empty());
    }

    #[test]
    fn test_whole_float_user_id() {
        let claims: Claims = serde_json::from_value(json!({ "userId": 7.0, "Permissions": [2001] })).unwrap();
        assert_eq!(claims.user_id, Some(7));
        assert!(claims.has_permission(PermissionId(2001)));
    }

    #[test]
    fn test_missing_or_odd_user_id_keeps_permissions() {
        let missing: Claims = serde_json::from_value(json!({ "nameid": "7", "Permissions": [2001] })).unwrap();
        assert_eq!(missing.user_id, None);
        assert!(missing.has_permission(PermissionId(2001)));
        assert_eq!(missing.claim_str("nameid"), Some("7"));

        let odd: Claims = serde_json::from_value(json!({ "userId": "abc", "Permissions": [4201] })).unwrap();
        assert_eq!(odd.user_id, None);
        assert!(odd.has_permission(PermissionId(4201)));

        let fraction: Claims = serde_json::from_value(json!({ "userId": 7.5 })).unwrap();
        assert_eq!(fraction.user_id, None);
    }

    #[test]
    fn test_serializes_back_to_wire_names() {
        let claims = Claims::new(5, PermissionSet::from([4201])).with_claim("role", json!("admin"));
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value, json!({ "userId": 5, "Permissions": [4201], "role": "admin" }));
    }
}
