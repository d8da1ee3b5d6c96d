//! Per-form location selection state
//!
//! [`LocationSelection::apply_selection`] is the only transition forms should
//! use: setting a level clears everything below it, so a new parent is never
//! paired with a stale child.

use crate::level::LocationLevel;
use crate::node::{LocationId, LocationNode};
use serde::{Deserialize, Serialize};

/// Selected identifier at each level of the chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSelection {
    /// Selected province
    pub province: Option<LocationId>,
    /// Selected city
    pub city: Option<LocationId>,
    /// Selected district
    pub district: Option<LocationId>,
    /// Selected locality
    pub locality: Option<LocationId>,
}

impl LocationSelection {
    /// Empty selection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection with every level set
    #[must_use]
    pub fn full(
        province: impl Into<LocationId>,
        city: impl Into<LocationId>,
        district: impl Into<LocationId>,
        locality: impl Into<LocationId>,
    ) -> Self {
        Self {
            province: Some(province.into()),
            city: Some(city.into()),
            district: Some(district.into()),
            locality: Some(locality.into()),
        }
    }

    /// Value at a level
    #[inline]
    #[must_use]
    pub fn get(&self, level: LocationLevel) -> Option<&LocationId> {
        match level {
            LocationLevel::Province => self.province.as_ref(),
            LocationLevel::City => self.city.as_ref(),
            LocationLevel::District => self.district.as_ref(),
            LocationLevel::Locality => self.locality.as_ref(),
        }
    }

    fn slot_mut(&mut self, level: LocationLevel) -> &mut Option<LocationId> {
        match level {
            LocationLevel::Province => &mut self.province,
            LocationLevel::City => &mut self.city,
            LocationLevel::District => &mut self.district,
            LocationLevel::Locality => &mut self.locality,
        }
    }

    /// Set `level` to `value` and clear every level below it
    ///
    /// A blank or `None` value clears `level` itself as well.
    #[must_use]
    pub fn apply_selection(&self, level: LocationLevel, value: Option<LocationId>) -> Self {
        let mut next = self.clone();
        *next.slot_mut(level) = value.filter(|v| !v.is_blank());
        next.clear_below(level);
        next
    }

    /// Clear every level strictly below `level`
    pub fn clear_below(&mut self, level: LocationLevel) {
        for lower in level.below() {
            *self.slot_mut(lower) = None;
        }
    }

    /// Deepest level holding a value
    #[must_use]
    pub fn deepest(&self) -> Option<LocationLevel> {
        LocationLevel::ALL
            .into_iter()
            .rev()
            .find(|level| self.get(*level).is_some())
    }

    /// Selected locality
    #[inline]
    #[must_use]
    pub fn leaf(&self) -> Option<&LocationId> {
        self.locality.as_ref()
    }

    /// True when nothing is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        LocationLevel::ALL.iter().all(|level| self.get(*level).is_none())
    }

    /// True when every level is selected
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        LocationLevel::ALL.iter().all(|level| self.get(*level).is_some())
    }

    /// True when no set level sits below an unset one
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        let deepest = match self.deepest() {
            Some(level) => level,
            None => return true,
        };
        deepest.above().all(|level| self.get(level).is_some())
    }
}

/// Check the parent linkage of a selection against known nodes
///
/// True only if the selection is contiguous and every selected city, district
/// and locality appears in `known` at its level with its parent equal to the
/// selection one level up. A selected province needs no linkage.
///
/// Callers run this before submitting a form; mutations do not enforce it
/// since a form may sit on an incomplete chain while the user is still picking.
#[must_use]
pub fn validate_chain<'a>(
    selection: &LocationSelection,
    known: impl IntoIterator<Item = &'a LocationNode>,
) -> bool {
    if !selection.is_contiguous() {
        return false;
    }

    let known: Vec<&LocationNode> = known.into_iter().collect();

    LocationLevel::ALL
        .into_iter()
        .filter_map(|level| Some((level, level.parent()?, selection.get(level)?)))
        .all(|(level, parent_level, id)| {
            let expected_parent = selection.get(parent_level);
            known.iter().any(|node| {
                node.level == level && &node.id == id && node.parent_id() == expected_parent
            })
        })
}
