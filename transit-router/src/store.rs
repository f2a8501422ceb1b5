//! Shared, atomically swappable graph.
//!
//! Queries take a snapshot (an `Arc` clone) and run without holding any
//! lock. A reload builds a complete new graph first and only then swaps it
//! in, so in-flight queries see either the old graph or the new one.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::graph::{Graph, GraphError, MapData};

/// Where map data comes from.
#[derive(Debug, Clone)]
pub enum MapSource {
    /// A JSON map data file, re-read on every reload.
    File(PathBuf),

    /// In-memory map data.
    Inline(Arc<MapData>),
}

impl MapSource {
    /// Load and build a graph from this source.
    pub fn build(&self) -> Result<Graph, GraphError> {
        match self {
            MapSource::File(path) => Graph::load(path),
            MapSource::Inline(data) => Graph::from_map_data(MapData::clone(data)),
        }
    }
}

/// Errors from loading or reloading the shared graph.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The new graph could not be built
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A task on the blocking pool failed
    #[error("background task failed: {0}")]
    Task(String),
}

/// A graph together with the generation it was published as.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    pub graph: Arc<Graph>,

    /// Increments on every successful reload.
    pub generation: u64,
}

/// Thread-safe handle to the current graph.
#[derive(Debug, Clone)]
pub struct GraphStore {
    inner: Arc<RwLock<GraphSnapshot>>,
    source: MapSource,
}

impl GraphStore {
    /// Build the initial graph from `source`.
    ///
    /// Fails if the data cannot be loaded; there is no empty fallback.
    pub async fn open(source: MapSource) -> Result<Self, StoreError> {
        let graph = build_off_thread(source.clone()).await?;
        Ok(Self::with_graph(graph, source))
    }

    /// Wrap an already built graph.
    pub fn with_graph(graph: Graph, source: MapSource) -> Self {
        Self {
            inner: Arc::new(RwLock::new(GraphSnapshot {
                graph: Arc::new(graph),
                generation: 0,
            })),
            source,
        }
    }

    /// The current graph and its generation.
    pub async fn snapshot(&self) -> GraphSnapshot {
        self.inner.read().await.clone()
    }

    /// The current graph.
    pub async fn graph(&self) -> Arc<Graph> {
        self.inner.read().await.graph.clone()
    }

    /// Rebuild the graph from the source and publish it.
    ///
    /// On failure the current graph stays in place and the error is
    /// returned.
    pub async fn reload(&self) -> Result<GraphSnapshot, StoreError> {
        let graph = match build_off_thread(self.source.clone()).await {
            Ok(graph) => graph,
            Err(e) => {
                warn!(error = %e, "graph reload failed, keeping current graph");
                return Err(e);
            }
        };

        let mut guard = self.inner.write().await;
        let generation = guard.generation + 1;
        *guard = GraphSnapshot {
            graph: Arc::new(graph),
            generation,
        };

        info!(
            generation = guard.generation,
            nodes = guard.graph.node_count(),
            edges = guard.graph.edge_count(),
            "graph reloaded"
        );

        Ok(guard.clone())
    }
}

/// Parsing and building are CPU and IO bound; keep them off the async
/// workers.
async fn build_off_thread(source: MapSource) -> Result<Graph, StoreError> {
    tokio::task::spawn_blocking(move || source.build())
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
        .map_err(StoreError::from)
}
