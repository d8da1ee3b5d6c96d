//! Location identifiers and nodes

use crate::level::LocationLevel;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Opaque location identifier (administrative code such as `"3501"`)
///
/// A blank identifier (empty or whitespace only) stands for "no value"; the
/// resolver never sends one to a source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Wrap an identifier, trimming surrounding whitespace
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Parse form input, `None` when blank
    #[inline]
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let id = Self::new(input);
        (!id.is_blank()).then_some(id)
    }

    /// True when the identifier carries no value
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LocationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LocationId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for LocationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A province, city, district or locality
///
/// `parent` names the node one level up; it is always `None` for provinces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationNode {
    /// Tier of this node
    pub level: LocationLevel,
    /// Identifier
    pub id: LocationId,
    /// Display name
    pub name: String,
    /// Identifier of the parent node
    pub parent: Option<LocationId>,
}

impl LocationNode {
    /// Province node
    #[inline]
    #[must_use]
    pub fn province(id: impl Into<LocationId>, name: impl Into<String>) -> Self {
        Self {
            level: LocationLevel::Province,
            id: id.into(),
            name: name.into(),
            parent: None,
        }
    }

    /// Node below the province tier, linked to `parent`
    #[inline]
    #[must_use]
    pub fn child(
        level: LocationLevel,
        id: impl Into<LocationId>,
        name: impl Into<String>,
        parent: impl Into<LocationId>,
    ) -> Self {
        Self {
            level,
            id: id.into(),
            name: name.into(),
            parent: Some(parent.into()),
        }
    }

    /// Parent identifier if present and not blank
    #[inline]
    #[must_use]
    pub fn parent_id(&self) -> Option<&LocationId> {
        self.parent.as_ref().filter(|p| !p.is_blank())
    }
}

/// Sort nodes by name, case-insensitively
///
/// Ties fall back to the raw name and then the identifier so the order is
/// total and repeatable.
pub fn sort_by_name(nodes: &mut [LocationNode]) {
    nodes.sort_by_cached_key(|n| (n.name.to_lowercase(), n.name.clone(), n.id.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids() {
        assert!(LocationId::new("").is_blank());
        assert!(LocationId::new("   ").is_blank());
        assert_eq!(LocationId::parse("  "), None);
        assert_eq!(LocationId::parse(" 11 "), Some(LocationId::new("11")));
    }

    #[test]
    fn parent_id_ignores_blank() {
        let mut node = LocationNode::child(LocationLevel::City, "1101", "Simeulue", "11");
        assert_eq!(node.parent_id(), Some(&LocationId::new("11")));

        node.parent = Some(LocationId::new(""));
        assert_eq!(node.parent_id(), None);
    }

    #[test]
    fn sort_is_case_insensitive() {
        let mut nodes = vec![
            LocationNode::province("3", "bali"),
            LocationNode::province("1", "Aceh"),
            LocationNode::province("2", "BANTEN"),
            LocationNode::province("4", "Bali"),
        ];
        sort_by_name(&mut nodes);

        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Aceh", "Bali", "bali", "BANTEN"]);
    }
}
