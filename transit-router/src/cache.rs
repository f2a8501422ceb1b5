//! Caching layer for route answers.
//!
//! The graph is immutable between reloads and the search is deterministic,
//! so answers can be reused. Keys include the graph generation, which keeps
//! a reload from ever serving a route computed on the previous graph.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::ModeMask;
use crate::planner::PathResult;
use crate::store::{GraphSnapshot, StoreError};

/// Cache key: (graph generation, start id, end id, allowed modes).
type RouteKey = (u64, String, String, ModeMask);

/// Configuration for the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

/// Cache of computed routes.
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<PathResult>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    /// Get the route from the cache, computing and storing it on a miss.
    ///
    /// The search runs on the blocking pool.
    pub async fn route(
        &self,
        snapshot: &GraphSnapshot,
        start: &str,
        end: &str,
        allowed: ModeMask,
    ) -> Result<Arc<PathResult>, StoreError> {
        let key = (
            snapshot.generation,
            start.to_string(),
            end.to_string(),
            allowed,
        );

        if let Some(hit) = self.routes.get(&key).await {
            trace!(start, end, ?allowed, "route cache hit");
            return Ok(hit);
        }

        let graph = Arc::clone(&snapshot.graph);
        let (from, to) = (key.1.clone(), key.2.clone());
        let result = tokio::task::spawn_blocking(move || graph.shortest_path(&from, &to, allowed))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?;

        let result = Arc::new(result);
        self.routes.insert(key, result.clone()).await;
        trace!(start, end, ?allowed, cached = self.entry_count(), "route cached");
        Ok(result)
    }

    /// Approximate number of cached routes.
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}
