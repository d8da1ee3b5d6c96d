//! Nested permission policy
//!
//! A [`Policy`] maps module names to a [`ModulePermission`]. Module order is
//! insertion order and survives serialization, which keeps flattened output and
//! role-editor rendering stable.
//!
//! The serde shape matches what the role-management endpoint stores:
//!
//! ```json
//! { "umat": { "scope": "nasional", "create": true, "delete": true } }
//! ```

use crate::action::Action;
use crate::scope::Scope;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capabilities granted on one module plus the breadth they apply at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ModulePermissionWire", into = "ModulePermissionWire")]
pub struct ModulePermission {
    /// Breadth of every capability in this module
    pub scope: Scope,
    /// Granted capabilities, iterated in canonical order
    pub capabilities: BTreeSet<Action>,
}

impl ModulePermission {
    /// Module permission with no capabilities
    #[inline]
    #[must_use]
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            capabilities: BTreeSet::new(),
        }
    }

    /// With an extra capability
    #[inline]
    #[must_use]
    pub fn with(mut self, action: Action) -> Self {
        self.capabilities.insert(action);
        self
    }

    /// With several extra capabilities
    #[must_use]
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.capabilities.extend(actions);
        self
    }

    /// Grant a capability; returns false if it was already present
    #[inline]
    pub fn insert(&mut self, action: Action) -> bool {
        self.capabilities.insert(action)
    }

    /// Remove a capability; returns false if it was absent
    #[inline]
    pub fn remove(&mut self, action: Action) -> bool {
        self.capabilities.remove(&action)
    }

    /// Check a capability
    #[inline]
    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        self.capabilities.contains(&action)
    }

    /// Granted capabilities in canonical order
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.capabilities.iter().copied()
    }

    /// True when nothing is granted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

/// Object form used on the wire: `scope` plus one boolean per action
#[derive(Serialize, Deserialize)]
struct ModulePermissionWire {
    scope: Scope,
    #[serde(flatten)]
    flags: IndexMap<String, bool>,
}

impl From<ModulePermissionWire> for ModulePermission {
    fn from(wire: ModulePermissionWire) -> Self {
        let capabilities = wire
            .flags
            .into_iter()
            .filter(|(_, granted)| *granted)
            .filter_map(|(token, _)| {
                let action = Action::from_token(&token);
                if action.is_none() {
                    tracing::debug!(%token, "ignoring unknown capability flag");
                }
                action
            })
            .collect();

        Self {
            scope: wire.scope,
            capabilities,
        }
    }
}

impl From<ModulePermission> for ModulePermissionWire {
    fn from(permission: ModulePermission) -> Self {
        Self {
            scope: permission.scope,
            flags: permission
                .capabilities
                .into_iter()
                .map(|a| (a.as_str().to_string(), true))
                .collect(),
        }
    }
}

/// Per-module permission policy of a role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policy {
    modules: IndexMap<String, ModulePermission>,
}

impl Policy {
    /// Empty policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a module permission appended (or replaced in place)
    #[inline]
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>, permission: ModulePermission) -> Self {
        self.modules.insert(module.into(), permission);
        self
    }

    /// Insert or replace a module permission, keeping its original position
    pub fn insert(
        &mut self,
        module: impl Into<String>,
        permission: ModulePermission,
    ) -> Option<ModulePermission> {
        self.modules.insert(module.into(), permission)
    }

    /// Permission of a module
    #[inline]
    #[must_use]
    pub fn get(&self, module: &str) -> Option<&ModulePermission> {
        self.modules.get(module)
    }

    /// Mutable permission of a module
    #[inline]
    pub fn get_mut(&mut self, module: &str) -> Option<&mut ModulePermission> {
        self.modules.get_mut(module)
    }

    /// Permission of a module, created with `scope` if absent
    pub fn module_or_insert(&mut self, module: &str, scope: Scope) -> &mut ModulePermission {
        self.modules
            .entry(module.to_string())
            .or_insert_with(|| ModulePermission::new(scope))
    }

    /// Grant `action` on `module`, creating the module with `scope` if absent
    ///
    /// An existing module keeps its scope.
    pub fn grant(&mut self, module: &str, action: Action, scope: Scope) -> bool {
        self.module_or_insert(module, scope).insert(action)
    }

    /// Revoke `action` on `module`; the module entry itself stays
    pub fn revoke(&mut self, module: &str, action: Action) -> bool {
        self.modules
            .get_mut(module)
            .is_some_and(|m| m.remove(action))
    }

    /// Remove a module entirely, preserving the order of the rest
    pub fn remove_module(&mut self, module: &str) -> Option<ModulePermission> {
        self.modules.shift_remove(module)
    }

    /// Check whether `action` is granted on `module`
    #[inline]
    #[must_use]
    pub fn allows(&self, module: &str, action: Action) -> bool {
        self.get(module).is_some_and(|m| m.contains(action))
    }

    /// Scope of a module
    #[inline]
    #[must_use]
    pub fn scope_of(&self, module: &str) -> Option<Scope> {
        self.get(module).map(|m| m.scope)
    }

    /// Modules in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModulePermission)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Module names in insertion order
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Number of modules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True when no module is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<(String, ModulePermission)> for Policy {
    fn from_iter<I: IntoIterator<Item = (String, ModulePermission)>>(iter: I) -> Self {
        Self {
            modules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Policy {
        Policy::new()
            .with_module(
                "umat",
                ModulePermission::new(Scope::Nasional)
                    .with(Action::Delete)
                    .with(Action::Create),
            )
            .with_module("fotang", ModulePermission::new(Scope::Wilayah).with(Action::Read))
    }

    #[test]
    fn capabilities_iterate_in_canonical_order() {
        let policy = sample();
        let actions: Vec<_> = policy.get("umat").unwrap().actions().collect();
        assert_eq!(actions, vec![Action::Create, Action::Delete]);
    }

    #[test]
    fn grant_keeps_existing_scope() {
        let mut policy = sample();
        assert!(policy.grant("fotang", Action::Update, Scope::Nasional));
        assert_eq!(policy.scope_of("fotang"), Some(Scope::Wilayah));
        assert!(policy.allows("fotang", Action::Update));

        assert!(policy.grant("event", Action::Import, Scope::Nasional));
        assert_eq!(policy.scope_of("event"), Some(Scope::Nasional));
        assert_eq!(policy.module_names().collect::<Vec<_>>(), vec!["umat", "fotang", "event"]);
    }

    #[test]
    fn revoke_and_remove() {
        let mut policy = sample();
        assert!(policy.revoke("umat", Action::Create));
        assert!(!policy.revoke("umat", Action::Create));
        assert!(!policy.revoke("missing", Action::Read));

        assert!(policy.remove_module("umat").is_some());
        assert_eq!(policy.module_names().collect::<Vec<_>>(), vec!["fotang"]);
    }

    #[test]
    fn serializes_to_flag_object() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "umat": { "scope": "nasional", "create": true, "delete": true },
                "fotang": { "scope": "wilayah", "read": true }
            })
        );
    }

    #[test]
    fn deserialize_drops_false_and_unknown_flags() {
        let policy: Policy = serde_json::from_str(
            r#"{
                "qiudao": { "scope": "wilayah", "create": true, "update": false, "approve": true },
                "account": { "scope": "nasional", "edit_role": true }
            }"#,
        )
        .unwrap();

        let qiudao = policy.get("qiudao").unwrap();
        assert_eq!(qiudao.scope, Scope::Wilayah);
        assert_eq!(qiudao.actions().collect::<Vec<_>>(), vec![Action::Create]);
        assert!(policy.allows("account", Action::EditRole));
        assert_eq!(policy.module_names().collect::<Vec<_>>(), vec!["qiudao", "account"]);
    }
}
