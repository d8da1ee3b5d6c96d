//! Forward option fetching and reverse path resolution
//!
//! The resolver is stateless apart from its source and can be shared between
//! any number of forms. Per-form state lives in
//! [`LocationSelector`](crate::LocationSelector).

use crate::error::{LocationResolutionError, SourceError, SourceResult};
use crate::level::LocationLevel;
use crate::node::{sort_by_name, LocationId, LocationNode};
use crate::selection::LocationSelection;
use crate::source::LocationSource;
use std::fmt;
use std::sync::Arc;

/// Result of reconciling a stored leaf against a held selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResolution {
    /// Leaf was blank; nothing to resolve
    Empty,
    /// Resolved chain equals the held selection
    Unchanged,
    /// Resolved chain differs from the held selection
    Resolved(LocationSelection),
}

impl PathResolution {
    /// True when the caller has nothing to apply
    #[inline]
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Location lookups on top of a [`LocationSource`]
pub struct LocationResolver<S> {
    source: Arc<S>,
}

impl<S> Clone for LocationResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> fmt::Debug for LocationResolver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationResolver").finish_non_exhaustive()
    }
}

impl<S: LocationSource> LocationResolver<S> {
    /// Create resolver over a source
    #[inline]
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Create resolver over an already shared source
    #[inline]
    #[must_use]
    pub fn from_arc(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Underlying source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Options for a dropdown level, failing soft
    ///
    /// Returns an empty list, without calling the source, when a level below
    /// Province has no parent. Source failures are logged and also yield an
    /// empty list. Results are sorted by name.
    pub async fn fetch_options(
        &self,
        level: LocationLevel,
        parent: Option<&LocationId>,
    ) -> Vec<LocationNode> {
        match self.try_fetch_options(level, parent).await {
            Ok(nodes) => nodes,
            Err(error) => {
                tracing::warn!(%level, parent = ?parent, %error, "location options unavailable");
                Vec::new()
            }
        }
    }

    /// Options for a dropdown level, surfacing source failures
    ///
    /// Same short-circuit and ordering as [`fetch_options`](Self::fetch_options).
    ///
    /// # Errors
    /// Whatever the source returned.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn try_fetch_options(
        &self,
        level: LocationLevel,
        parent: Option<&LocationId>,
    ) -> SourceResult<Vec<LocationNode>> {
        let parent = match level.parent() {
            None => None,
            Some(_) => match parent.filter(|p| !p.is_blank()) {
                Some(parent) => Some(parent.clone()),
                None => return Ok(Vec::new()),
            },
        };

        let mut nodes = self.source.children(level, parent).await?;
        sort_by_name(&mut nodes);
        Ok(nodes)
    }

    async fn lookup(
        &self,
        level: LocationLevel,
        id: LocationId,
    ) -> Result<LocationNode, LocationResolutionError> {
        self.source
            .lookup(level, id)
            .await
            .map_err(|source| LocationResolutionError::lookup_failed(level, source))
    }

    /// Rebuild the full chain from a stored locality id
    ///
    /// Three sequential point lookups: locality, then its district, then that
    /// district's city. The province id is read off the city.
    ///
    /// Returns `Ok(None)` for a blank or missing id without touching the source.
    ///
    /// # Errors
    /// [`LocationResolutionError::LookupFailed`] naming the level whose lookup
    /// failed or whose node came back without a parent reference. Nothing
    /// partial is returned.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn resolve_full_path_from_leaf(
        &self,
        leaf: Option<&LocationId>,
    ) -> Result<Option<LocationSelection>, LocationResolutionError> {
        let Some(leaf) = leaf.filter(|id| !id.is_blank()) else {
            return Ok(None);
        };

        let locality = self.lookup(LocationLevel::Locality, leaf.clone()).await?;
        let district = self
            .lookup(LocationLevel::District, parent_of(&locality)?)
            .await?;
        let city = self.lookup(LocationLevel::City, parent_of(&district)?).await?;
        let province = parent_of(&city)?;

        Ok(Some(LocationSelection {
            province: Some(province),
            city: Some(city.id),
            district: Some(district.id),
            locality: Some(locality.id),
        }))
    }

    /// Resolve a stored leaf and compare it with what the caller holds
    ///
    /// # Errors
    /// Same as [`resolve_full_path_from_leaf`](Self::resolve_full_path_from_leaf).
    pub async fn reconcile(
        &self,
        current: &LocationSelection,
        leaf: Option<&LocationId>,
    ) -> Result<PathResolution, LocationResolutionError> {
        Ok(match self.resolve_full_path_from_leaf(leaf).await? {
            None => PathResolution::Empty,
            Some(resolved) if &resolved == current => PathResolution::Unchanged,
            Some(resolved) => PathResolution::Resolved(resolved),
        })
    }
}

fn parent_of(node: &LocationNode) -> Result<LocationId, LocationResolutionError> {
    node.parent_id().cloned().ok_or_else(|| {
        LocationResolutionError::lookup_failed(
            node.level,
            SourceError::MissingParent {
                level: node.level,
                id: node.id.clone(),
            },
        )
    })
}
