//! Who is asking, and what they may see
//!
//! The console never reads the signed-in user from ambient state. Callers
//! build an [`AccessContext`] from a [`CurrentUser`] and that user's role
//! [`Policy`], and pass it to whatever needs an access decision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use umat_permission::{unflatten, Action, PermissionError, Policy, Scope};

/// Regional coordination area (Korwil)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Area {
    /// Korwil 1
    #[serde(rename = "Korwil_1")]
    Korwil1,
    /// Korwil 2
    #[serde(rename = "Korwil_2")]
    Korwil2,
    /// Korwil 3
    #[serde(rename = "Korwil_3")]
    Korwil3,
    /// Korwil 4
    #[serde(rename = "Korwil_4")]
    Korwil4,
    /// Korwil 5
    #[serde(rename = "Korwil_5")]
    Korwil5,
    /// Korwil 6
    #[serde(rename = "Korwil_6")]
    Korwil6,
}

impl Area {
    /// Every area in order
    pub const ALL: [Area; 6] = [
        Area::Korwil1,
        Area::Korwil2,
        Area::Korwil3,
        Area::Korwil4,
        Area::Korwil5,
        Area::Korwil6,
    ];

    /// Wire code (`Korwil_3`)
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Area::Korwil1 => "Korwil_1",
            Area::Korwil2 => "Korwil_2",
            Area::Korwil3 => "Korwil_3",
            Area::Korwil4 => "Korwil_4",
            Area::Korwil5 => "Korwil_5",
            Area::Korwil6 => "Korwil_6",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area code did not name a Korwil
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown area '{0}'")]
pub struct UnknownArea(pub String);

impl FromStr for Area {
    type Err = UnknownArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Area::ALL
            .into_iter()
            .find(|area| area.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownArea(s.to_string()))
    }
}

/// The signed-in user as far as access decisions care
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Role name
    pub role: String,
    /// Breadth of the user's assignment
    pub scope: Scope,
    /// Assigned area; national users usually have none
    #[serde(default, alias = "areaId")]
    pub area: Option<Area>,
}

impl CurrentUser {
    /// Create user
    #[inline]
    #[must_use]
    pub fn new(role: impl Into<String>, scope: Scope, area: Option<Area>) -> Self {
        Self {
            role: role.into(),
            scope,
            area,
        }
    }
}

/// Which records of a module a user may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaFilter {
    /// Every area
    All,
    /// Only this area
    Area(Area),
    /// Nothing
    Nothing,
}

impl AreaFilter {
    /// Check a record's area against the filter
    #[inline]
    #[must_use]
    pub fn allows(self, area: Area) -> bool {
        match self {
            AreaFilter::All => true,
            AreaFilter::Area(own) => own == area,
            AreaFilter::Nothing => false,
        }
    }
}

/// A user together with their role policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    user: CurrentUser,
    policy: Policy,
}

impl AccessContext {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(user: CurrentUser, policy: Policy) -> Self {
        Self { user, policy }
    }

    /// Create context from the flat permission list a role endpoint returns
    ///
    /// Modules take the user's scope.
    #[must_use]
    pub fn from_flat<I>(user: CurrentUser, flat: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let policy = unflatten(flat, user.scope);
        Self { user, policy }
    }

    /// Signed-in user
    #[inline]
    #[must_use]
    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    /// Role policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Check a single capability
    #[inline]
    #[must_use]
    pub fn can(&self, module: &str, action: Action) -> bool {
        self.policy.allows(module, action)
    }

    /// Check a capability written as text (`"read_area"`)
    ///
    /// # Errors
    /// [`PermissionError::UnknownAction`] for text outside the action vocabulary.
    pub fn can_str(&self, module: &str, action: &str) -> Result<bool, PermissionError> {
        Ok(self.can(module, action.parse()?))
    }

    /// Records of `module` this user may see
    ///
    /// National users holding a national grant see every area. Anyone else is
    /// limited to their own area, and sees nothing without one. A module the
    /// policy does not mention is hidden entirely.
    #[must_use]
    pub fn area_filter(&self, module: &str) -> AreaFilter {
        let Some(module_scope) = self.policy.scope_of(module) else {
            return AreaFilter::Nothing;
        };

        if self.user.scope.is_national() && module_scope.is_national() {
            return AreaFilter::All;
        }

        match self.user.area {
            Some(area) => AreaFilter::Area(area),
            None => AreaFilter::Nothing,
        }
    }
}
