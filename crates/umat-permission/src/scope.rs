//! Access breadth attached to a module's permission set

use crate::error::PermissionError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Breadth of a module permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every area
    Nasional,
    /// The holder's own area only
    Wilayah,
}

impl Scope {
    /// Both scopes
    pub const ALL: [Scope; 2] = [Scope::Nasional, Scope::Wilayah];

    /// Wire token
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Scope::Nasional => "nasional",
            Scope::Wilayah => "wilayah",
        }
    }

    /// True for [`Scope::Nasional`]
    #[inline]
    #[must_use]
    pub const fn is_national(self) -> bool {
        matches!(self, Scope::Nasional)
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nasional" => Ok(Scope::Nasional),
            "wilayah" => Ok(Scope::Wilayah),
            _ => Err(PermissionError::UnknownScope(s.to_string())),
        }
    }
}
