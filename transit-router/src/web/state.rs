//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, RouteCache};
use crate::store::GraphStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Current graph, swappable on reload
    pub store: GraphStore,

    /// Memoised route answers
    pub routes: Arc<RouteCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: GraphStore, cache_config: &CacheConfig) -> Self {
        Self {
            store,
            routes: Arc::new(RouteCache::new(cache_config)),
        }
    }
}
