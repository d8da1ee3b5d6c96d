//! Closed action vocabulary
//!
//! [`Action`] is declared in canonical order; the derived `Ord` is what gives
//! flattened output its fixed per-module ordering.

use crate::error::PermissionError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A capability that can be granted on a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create records
    Create,
    /// Read records
    Read,
    /// Update records
    Update,
    /// Delete records
    Delete,
    /// Bulk import records
    Import,
    /// Read records across every area
    ReadNational,
    /// Read records of the user's own area
    ReadArea,
    /// Create record types
    CreateType,
    /// Create roles
    CreateRole,
    /// Edit roles
    EditRole,
    /// Delete roles
    DeleteRole,
}

impl Action {
    /// Every action, in canonical order
    pub const ALL: [Action; 11] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Import,
        Action::ReadNational,
        Action::ReadArea,
        Action::CreateType,
        Action::CreateRole,
        Action::EditRole,
        Action::DeleteRole,
    ];

    /// Token used in the flat form and on the wire
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Import => "import",
            Action::ReadNational => "read_national",
            Action::ReadArea => "read_area",
            Action::CreateType => "create_type",
            Action::CreateRole => "create_role",
            Action::EditRole => "edit_role",
            Action::DeleteRole => "delete_role",
        }
    }

    /// Look up an action by its exact token
    #[inline]
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == token)
    }

    /// Split `"<module>_<action>"` against the vocabulary
    ///
    /// Picks the longest action whose `_<token>` is a suffix of `entry` and
    /// leaves a non-empty module part. `account_edit_role` therefore yields
    /// `("account", EditRole)`, and `dian_chuan_shi_read` yields
    /// `("dian_chuan_shi", Read)`.
    #[must_use]
    pub fn split_entry(entry: &str) -> Option<(&str, Action)> {
        Self::ALL
            .into_iter()
            .filter_map(|action| {
                let module = entry.strip_suffix(action.as_str())?.strip_suffix('_')?;
                (!module.is_empty()).then_some((module, action))
            })
            .max_by_key(|(_, action)| action.as_str().len())
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| PermissionError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_ord() {
        let mut sorted = Action::ALL;
        sorted.sort();
        assert_eq!(sorted, Action::ALL);
    }

    #[test]
    fn tokens_roundtrip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
        assert!("approve".parse::<Action>().is_err());
    }

    #[test]
    fn split_prefers_multi_word_actions() {
        assert_eq!(
            Action::split_entry("account_edit_role"),
            Some(("account", Action::EditRole))
        );
        assert_eq!(
            Action::split_entry("umat_read_national"),
            Some(("umat", Action::ReadNational))
        );
        assert_eq!(
            Action::split_entry("event_create_type"),
            Some(("event", Action::CreateType))
        );
    }

    #[test]
    fn split_keeps_underscores_in_module() {
        assert_eq!(
            Action::split_entry("dian_chuan_shi_read"),
            Some(("dian_chuan_shi", Action::Read))
        );
        assert_eq!(
            Action::split_entry("dian_chuan_shi_read_area"),
            Some(("dian_chuan_shi", Action::ReadArea))
        );
    }

    #[test]
    fn split_rejects_malformed() {
        assert_eq!(Action::split_entry("create"), None);
        assert_eq!(Action::split_entry("_create"), None);
        assert_eq!(Action::split_entry("umat_approve"), None);
        assert_eq!(Action::split_entry("umatcreate"), None);
        assert_eq!(Action::split_entry(""), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Action::DeleteRole).unwrap();
        assert_eq!(json, "\"delete_role\"");
    }
}
