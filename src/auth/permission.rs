use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Integer identifier of one gated capability.
///
/// The numeric values are shared with the backend and must not change.
/// Ids whose last three digits are below 200 gate navigation (menu entries,
/// pages); the rest gate individual actions (buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionGroup {
    Navigation,
    Action,
}

impl PermissionId {
    pub const VIEW_USER_LIST: PermissionId = PermissionId(2001);
    pub const ADD_NEW_ROLE_BUTTON: PermissionId = PermissionId(4201);
    pub const MANAGE_ROLE_PERMISSIONS_BUTTON: PermissionId = PermissionId(4202);

    const NAMED: &'static [(PermissionId, &'static str)] = &[
        (Self::VIEW_USER_LIST, "ViewUserList"),
        (Self::ADD_NEW_ROLE_BUTTON, "AddNewRoleButton"),
        (Self::MANAGE_ROLE_PERMISSIONS_BUTTON, "ManageRolePermissionsButton"),
    ];

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn group(self) -> PermissionGroup {
        if self.0 % 1000 < 200 {
            PermissionGroup::Navigation
        } else {
            PermissionGroup::Action
        }
    }

    /// Console name for catalogued ids
    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, name)| *name)
    }

    pub fn catalogue() -> impl Iterator<Item = (PermissionId, &'static str)> {
        Self::NAMED.iter().copied()
    }
}

impl From<u32> for PermissionId {
    fn from(value: u32) -> Self {
        PermissionId(value)
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for PermissionId {
    type Err = String;

    /// Accepts a number or a catalogued name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u32>() {
            return Ok(PermissionId(value));
        }
        Self::NAMED
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(id, _)| *id)
            .ok_or_else(|| format!("unknown permission '{}'", s))
    }
}

/// Flat set of granted permission ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<PermissionId>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: PermissionId) -> bool {
        self.0.contains(&id)
    }

    pub fn contains_any(&self, ids: &[PermissionId]) -> bool {
        ids.iter().any(|id| self.contains(*id))
    }

    pub fn contains_all(&self, ids: &[PermissionId]) -> bool {
        ids.iter().all(|id| self.contains(*id))
    }

    pub fn insert(&mut self, id: PermissionId) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PermissionId> + '_ {
        self.0.iter().copied()
    }

    pub fn in_group(&self, group: PermissionGroup) -> impl Iterator<Item = PermissionId> + '_ {
        self.iter().filter(move |id| id.group() == group)
    }
}

impl FromIterator<PermissionId> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionId>>(iter: I) -> Self {
        PermissionSet(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[u32; N]> for PermissionSet {
    fn from(values: [u32; N]) -> Self {
        values.into_iter().map(PermissionId).collect()
    }
}

// Issuers emit the claim as ints, numeric strings, or a lone scalar when only
// one permission is granted. Entries that are not ids are dropped so one bad
// value cannot revoke the rest of the set.
impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let items = match value {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            scalar => vec![scalar],
        };

        Ok(items
            .iter()
            .filter_map(|item| match permission_from_value(item) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!("Skipping permission claim entry: {}", e);
                    None
                }
            })
            .collect())
    }
}

fn permission_from_value(value: &Value) -> Result<PermissionId, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(PermissionId)
            .ok_or_else(|| format!("permission id out of range: {}", n)),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map(PermissionId)
            .map_err(|_| format!("permission id is not numeric: '{}'", s)),
        other => Err(format!("unsupported permission id: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_groups_follow_numeric_ranges() {
        assert_eq!(PermissionId(2001).group(), PermissionGroup::Navigation);
        assert_eq!(PermissionId(4201).group(), PermissionGroup::Action);
        assert_eq!(PermissionId(4199).group(), PermissionGroup::Navigation);
    }

    #[test]
    fn test_catalogue_names() {
        assert_eq!(PermissionId::ADD_NEW_ROLE_BUTTON.name(), Some("AddNewRoleButton"));
        assert_eq!(PermissionId(9999).name(), None);
        assert_eq!(PermissionId(4202).to_string(), "4202 (ManageRolePermissionsButton)");
    }

    #[test]
    fn test_parse_by_number_or_name() {
        assert_eq!("4201".parse::<PermissionId>().unwrap(), PermissionId(4201));
        assert_eq!("addnewrolebutton".parse::<PermissionId>().unwrap(), PermissionId(4201));
        assert!("Nope".parse::<PermissionId>().is_err());
    }

    #[test]
    fn test_set_ignores_order_and_duplicates() {
        let a: PermissionSet = serde_json::from_value(json!([4205, 2001, 2001])).unwrap();
        let b = PermissionSet::from([2001, 4205]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_set_accepts_strings_and_scalars() {
        let strings: PermissionSet = serde_json::from_value(json!(["2001", "4205"])).unwrap();
        assert!(strings.contains(PermissionId(4205)));

        let scalar: PermissionSet = serde_json::from_value(json!("4201")).unwrap();
        assert_eq!(scalar, PermissionSet::from([4201]));

        let null: PermissionSet = serde_json::from_value(json!(null)).unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn test_set_skips_unparseable_entries() {
        let set: PermissionSet =
            serde_json::from_value(json!([2001, "admin", -1, 4.5, { "id": 1 }, "4201"])).unwrap();
        assert_eq!(set, PermissionSet::from([2001, 4201]));

        let lone: PermissionSet = serde_json::from_value(json!("admin")).unwrap();
        assert!(lone.is_empty());
    }

    #[test]
    fn test_any_all() {
        let set = PermissionSet::from([2001, 4205]);
        assert!(set.contains_any(&[PermissionId(9999), PermissionId(2001)]));
        assert!(!set.contains_all(&[PermissionId(9999), PermissionId(2001)]));
        assert!(set.contains_all(&[]));
        assert!(!set.contains_any(&[]));
    }

    #[test]
    fn test_in_group() {
        let set = PermissionSet::from([2001, 4201, 4205]);
        let nav: Vec<_> = set.in_group(PermissionGroup::Navigation).collect();
        assert_eq!(nav, vec![PermissionId(2001)]);
    }
}
