//! The I/O seam of the resolver
//!
//! A [`LocationSource`] answers two questions: "which nodes live under this
//! parent" and "what is this node". The HTTP backend, the read-through cache
//! and the test fixtures all implement it.

use crate::error::SourceResult;
use crate::level::LocationLevel;
use crate::node::{LocationId, LocationNode};
use async_trait::async_trait;
use std::sync::Arc;

/// Provider of location nodes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Nodes at `level` under `parent`
    ///
    /// `parent` is `None` for provinces. Order is unspecified; the resolver
    /// sorts.
    async fn children(
        &self,
        level: LocationLevel,
        parent: Option<LocationId>,
    ) -> SourceResult<Vec<LocationNode>>;

    /// Single node at `level`, including its parent reference
    async fn lookup(&self, level: LocationLevel, id: LocationId) -> SourceResult<LocationNode>;
}

/// Type-erased, shareable source
pub type SharedSource = Arc<dyn LocationSource>;

#[async_trait]
impl<T: LocationSource + ?Sized> LocationSource for Arc<T> {
    async fn children(
        &self,
        level: LocationLevel,
        parent: Option<LocationId>,
    ) -> SourceResult<Vec<LocationNode>> {
        (**self).children(level, parent).await
    }

    async fn lookup(
        &self,
        level: LocationLevel,
        id: LocationId,
    ) -> SourceResult<LocationNode> {
        (**self).lookup(level, id).await
    }
}
