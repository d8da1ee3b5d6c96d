//! Flat capability-string codec
//!
//! Converts a [`Policy`] to and from the `"<module>_<action>"` array the role
//! endpoint and the bulk checkbox grid work with.
//!
//! # Ordering
//!
//! [`flatten`] groups entries by module in insertion order, then by the
//! canonical [`Action`] order. Consumers treat the array as a set, but the
//! fixed order keeps snapshots and diffs deterministic.
//!
//! # Splitting
//!
//! Entries are split against the closed vocabulary (longest `_<action>`
//! suffix), never at the first underscore. Module names may themselves contain
//! underscores (`dian_chuan_shi`).

use crate::action::Action;
use crate::error::{PermissionError, PermissionResult};
use crate::policy::Policy;
use crate::scope::Scope;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A single decoded `"<module>_<action>"` entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionKey {
    /// Module name
    pub module: String,
    /// Capability on that module
    pub action: Action,
}

impl PermissionKey {
    /// Create a key
    #[inline]
    #[must_use]
    pub fn new(module: impl Into<String>, action: Action) -> Self {
        Self {
            module: module.into(),
            action,
        }
    }

    /// Decode a flat entry, `None` when no vocabulary action matches
    #[must_use]
    pub fn parse(entry: &str) -> Option<Self> {
        Action::split_entry(entry.trim()).map(|(module, action)| Self::new(module, action))
    }
}

impl Display for PermissionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.module, self.action)
    }
}

impl FromStr for PermissionKey {
    type Err = PermissionError;

    fn from_str(s: &str) -> PermissionResult<Self> {
        Self::parse(s).ok_or_else(|| PermissionError::MalformedEntry(s.to_string()))
    }
}

/// Flatten a policy into `"<module>_<action>"` strings
#[must_use]
pub fn flatten(policy: &Policy) -> Vec<String> {
    policy
        .iter()
        .flat_map(|(module, permission)| {
            permission
                .actions()
                .map(move |action| PermissionKey::new(module, action).to_string())
        })
        .collect()
}

/// Rebuild a policy from flat entries
///
/// Every module is created with `default_scope`. Entries without a recognised
/// action are dropped.
#[must_use]
pub fn unflatten<I>(flat: I, default_scope: Scope) -> Policy
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    unflatten_with_scopes(flat, &HashMap::new(), default_scope)
}

/// Rebuild a policy, taking each module's scope from `scopes`
///
/// Modules missing from `scopes` fall back to `default_scope`.
#[must_use]
pub fn unflatten_with_scopes<I>(
    flat: I,
    scopes: &HashMap<String, Scope>,
    default_scope: Scope,
) -> Policy
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut policy = Policy::new();
    let mut dropped = 0usize;

    for entry in flat {
        let entry = entry.as_ref();
        match PermissionKey::parse(entry) {
            Some(key) => {
                let scope = scopes.get(&key.module).copied().unwrap_or(default_scope);
                policy.grant(&key.module, key.action, scope);
            }
            None => {
                dropped += 1;
                tracing::debug!(entry, "dropping unrecognised permission entry");
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, modules = policy.len(), "unflattened with dropped entries");
    }

    policy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ModulePermission;
    use pretty_assertions::assert_eq;

    #[test]
    fn flatten_is_deterministic() {
        let policy = Policy::new().with_module(
            "umat",
            ModulePermission::new(Scope::Nasional)
                .with(Action::Delete)
                .with(Action::Create),
        );

        for _ in 0..10 {
            assert_eq!(flatten(&policy), vec!["umat_create", "umat_delete"]);
        }
    }

    #[test]
    fn flatten_groups_by_module_insertion_order() {
        let policy = Policy::new()
            .with_module("role", ModulePermission::new(Scope::Nasional).with(Action::EditRole))
            .with_module("event", ModulePermission::new(Scope::Wilayah))
            .with_module(
                "account",
                ModulePermission::new(Scope::Nasional)
                    .with(Action::DeleteRole)
                    .with(Action::Read),
            );

        assert_eq!(
            flatten(&policy),
            vec!["role_edit_role", "account_read", "account_delete_role"]
        );
    }

    #[test]
    fn unflatten_empty_is_empty() {
        let policy = unflatten(Vec::<String>::new(), Scope::Nasional);
        assert!(policy.is_empty());
    }

    #[test]
    fn unflatten_splits_on_vocabulary() {
        let policy = unflatten(["account_edit_role"], Scope::Wilayah);

        let account = policy.get("account").unwrap();
        assert_eq!(account.scope, Scope::Wilayah);
        assert_eq!(account.actions().collect::<Vec<_>>(), vec![Action::EditRole]);
        assert!(policy.get("account_edit").is_none());
    }

    #[test]
    fn unflatten_drops_unknown_actions() {
        let policy = unflatten(
            ["umat_create", "umat_approve", "garbage", "_read", "fotang_read_area"],
            Scope::Nasional,
        );

        assert_eq!(policy.module_names().collect::<Vec<_>>(), vec!["umat", "fotang"]);
        assert!(policy.allows("umat", Action::Create));
        assert!(policy.allows("fotang", Action::ReadArea));
    }

    #[test]
    fn unflatten_with_per_module_scopes() {
        let scopes = HashMap::from([("qiudao".to_string(), Scope::Wilayah)]);
        let policy = unflatten_with_scopes(
            ["qiudao_create", "umat_read"],
            &scopes,
            Scope::Nasional,
        );

        assert_eq!(policy.scope_of("qiudao"), Some(Scope::Wilayah));
        assert_eq!(policy.scope_of("umat"), Some(Scope::Nasional));
    }

    #[test]
    fn duplicate_entries_collapse() {
        let policy = unflatten(["umat_read", "umat_read"], Scope::Nasional);
        assert_eq!(flatten(&policy), vec!["umat_read"]);
    }

    #[test]
    fn permission_key_display_and_parse() {
        let key: PermissionKey = "dian_chuan_shi_create_type".parse().unwrap();
        assert_eq!(key, PermissionKey::new("dian_chuan_shi", Action::CreateType));
        assert_eq!(key.to_string(), "dian_chuan_shi_create_type");

        assert_eq!(
            "umat".parse::<PermissionKey>(),
            Err(PermissionError::MalformedEntry("umat".to_string()))
        );
    }
}
