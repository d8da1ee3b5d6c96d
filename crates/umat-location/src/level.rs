//! The four tiers of the geographic hierarchy

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A tier of the location chain, ordered from the top down
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationLevel {
    /// Top of the chain
    Province,
    /// Child of a province
    City,
    /// Child of a city
    District,
    /// Leaf of the chain
    Locality,
}

impl LocationLevel {
    /// Every level, top first
    pub const ALL: [LocationLevel; 4] = [
        LocationLevel::Province,
        LocationLevel::City,
        LocationLevel::District,
        LocationLevel::Locality,
    ];

    /// Zero-based position in [`LocationLevel::ALL`]
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            LocationLevel::Province => 0,
            LocationLevel::City => 1,
            LocationLevel::District => 2,
            LocationLevel::Locality => 3,
        }
    }

    /// One-based depth (Province = 1, Locality = 4)
    #[inline]
    #[must_use]
    pub const fn depth(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Level directly above, `None` for Province
    #[inline]
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            LocationLevel::Province => None,
            LocationLevel::City => Some(LocationLevel::Province),
            LocationLevel::District => Some(LocationLevel::City),
            LocationLevel::Locality => Some(LocationLevel::District),
        }
    }

    /// Level directly below, `None` for Locality
    #[inline]
    #[must_use]
    pub const fn child(self) -> Option<Self> {
        match self {
            LocationLevel::Province => Some(LocationLevel::City),
            LocationLevel::City => Some(LocationLevel::District),
            LocationLevel::District => Some(LocationLevel::Locality),
            LocationLevel::Locality => None,
        }
    }

    /// Levels strictly below this one, nearest first
    pub fn below(self) -> impl Iterator<Item = LocationLevel> {
        Self::ALL.into_iter().skip(self.index() + 1)
    }

    /// Levels strictly above this one, top first
    pub fn above(self) -> impl Iterator<Item = LocationLevel> {
        Self::ALL.into_iter().take(self.index())
    }

    /// Lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LocationLevel::Province => "province",
            LocationLevel::City => "city",
            LocationLevel::District => "district",
            LocationLevel::Locality => "locality",
        }
    }

    /// Key a node of this level uses to name its parent (`provinceId` for a city)
    #[inline]
    #[must_use]
    pub const fn parent_key(self) -> Option<&'static str> {
        match self {
            LocationLevel::Province => None,
            LocationLevel::City => Some("provinceId"),
            LocationLevel::District => Some("cityId"),
            LocationLevel::Locality => Some("districtId"),
        }
    }
}

impl Display for LocationLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
