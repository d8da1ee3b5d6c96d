//! Read-through location cache using moka
//!
//! Location data changes rarely while a form is open, but the same lists are
//! requested by every form that mounts a location picker. The cache wraps any
//! [`LocationSource`] and behaves exactly like it, except that successful
//! answers are reused. Failures are never cached.

use crate::error::SourceResult;
use crate::level::LocationLevel;
use crate::node::{LocationId, LocationNode};
use crate::source::LocationSource;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

type ListKey = (LocationLevel, Option<LocationId>);
type NodeKey = (LocationLevel, LocationId);

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Cached option lists
    pub list_entries: u64,
    /// Cached single nodes
    pub node_entries: u64,
}

/// Caching decorator over a location source
#[derive(Debug, Clone)]
pub struct CachedLocationSource<S> {
    inner: S,
    lists: Cache<ListKey, Arc<Vec<LocationNode>>>,
    nodes: Cache<NodeKey, LocationNode>,
}

impl<S: LocationSource> CachedLocationSource<S> {
    /// Create cache with max capacity per table
    #[inline]
    #[must_use]
    pub fn new(inner: S, max_capacity: u64) -> Self {
        Self {
            inner,
            lists: Cache::new(max_capacity),
            nodes: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(inner: S, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            lists: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            nodes: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Wrapped source
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached answer
    #[inline]
    pub fn invalidate_all(&self) {
        self.lists.invalidate_all();
        self.nodes.invalidate_all();
    }

    /// Flush pending maintenance so counts are exact
    pub async fn sync(&self) {
        self.lists.run_pending_tasks().await;
        self.nodes.run_pending_tasks().await;
    }

    /// Get cache statistics (approximate until [`sync`](Self::sync))
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            list_entries: self.lists.entry_count(),
            node_entries: self.nodes.entry_count(),
        }
    }
}

#[async_trait]
impl<S: LocationSource> LocationSource for CachedLocationSource<S> {
    async fn children(
        &self,
        level: LocationLevel,
        parent: Option<LocationId>,
    ) -> SourceResult<Vec<LocationNode>> {
        let key = (level, parent.clone());
        if let Some(hit) = self.lists.get(&key).await {
            tracing::debug!(%level, ?parent, "location list cache hit");
            return Ok(hit.as_ref().clone());
        }

        let nodes = self.inner.children(level, parent).await?;

        // A listed node answers later point lookups too.
        for node in &nodes {
            self.nodes
                .insert((node.level, node.id.clone()), node.clone())
                .await;
        }
        self.lists.insert(key, Arc::new(nodes.clone())).await;

        Ok(nodes)
    }

    async fn lookup(
        &self,
        level: LocationLevel,
        id: LocationId,
    ) -> SourceResult<LocationNode> {
        let key = (level, id);
        if let Some(hit) = self.nodes.get(&key).await {
            tracing::debug!(%level, id = %key.1, "location node cache hit");
            return Ok(hit);
        }

        let node = self.inner.lookup(level, key.1.clone()).await?;
        self.nodes.insert(key, node.clone()).await;
        Ok(node)
    }
}
