//! The transportation graph.
//!
//! Built once from node and edge records, then shared read-only by every
//! routing query. Walk, bike and car connections are made two-way by
//! synthesising reverse edges; bus and subway edges stay one-way.

mod error;
mod records;

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

pub use error::GraphError;
pub use records::{EdgeRecord, MapData};

use crate::domain::{Edge, Mode, ModeMask, Node};
use crate::planner::PathResult;
use crate::spatial::{distance_between, haversine_distance};

/// Nodes plus an adjacency list of outgoing edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Nodes in insertion order.
    nodes: Vec<Node>,

    /// Node id → position in `nodes`.
    index: HashMap<String, usize>,

    /// Node id → outgoing edges. Edges may leave from ids with no node.
    adjacency: HashMap<String, Vec<Edge>>,

    edge_count: usize,
}

impl Graph {
    /// Build a graph from records.
    ///
    /// Zero edge distances are replaced by the great-circle distance between
    /// the endpoints when both exist. Every edge with a walk, bike or car
    /// mode gets a reverse edge unless, at the time it is added, the target
    /// already has a walk, bike or car edge leading back.
    pub fn build(nodes: Vec<Node>, edges: Vec<EdgeRecord>) -> Result<Self, GraphError> {
        let mut graph = Graph {
            nodes: Vec::with_capacity(nodes.len()),
            index: HashMap::with_capacity(nodes.len()),
            adjacency: HashMap::new(),
            edge_count: 0,
        };

        for node in nodes {
            graph.insert_node(node)?;
        }

        let mut reverse_edges = 0;
        for record in &edges {
            let edge = graph.edge_from_record(record)?;
            let reverse = edge.reversed();
            graph.push_edge(edge);

            // A reverse is skipped only when the target already has a two-way
            // edge back; a one-way bus or subway edge does not count.
            if let Some(reverse) = reverse {
                if !graph.has_two_way_edge(&reverse.from, &reverse.to) {
                    graph.push_edge(reverse);
                    reverse_edges += 1;
                }
            }
        }

        info!(
            nodes = graph.nodes.len(),
            edges = edges.len(),
            reverse_edges,
            "graph built"
        );

        Ok(graph)
    }

    /// Build a graph from a parsed map data document.
    pub fn from_map_data(data: MapData) -> Result<Self, GraphError> {
        Self::build(data.nodes, data.edges)
    }

    /// Parse and build a graph from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        Self::from_map_data(MapData::from_json_str(json)?)
    }

    /// Read, parse and build a graph from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        Self::from_map_data(MapData::load(path)?)
    }

    fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
        if node.id.is_empty() {
            return Err(GraphError::EmptyNodeId);
        }
        if !node.has_finite_coordinates() {
            return Err(GraphError::InvalidCoordinates { id: node.id });
        }
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }

        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn edge_from_record(&self, record: &EdgeRecord) -> Result<Edge, GraphError> {
        if !record.dist.is_finite() || record.dist < 0.0 {
            return Err(GraphError::InvalidDistance {
                from: record.from.clone(),
                to: record.to.clone(),
                distance: record.dist,
            });
        }

        let modes = record.modes.iter().filter_map(|name| match name.parse::<Mode>() {
            Ok(mode) => Some(mode),
            Err(e) => {
                debug!(from = %record.from, to = %record.to, error = %e, "ignoring mode");
                None
            }
        });

        let distance = if record.dist == 0.0 {
            match (self.node(&record.from), self.node(&record.to)) {
                (Some(from), Some(to)) => haversine_distance(from.point(), to.point()),
                _ => 0.0,
            }
        } else {
            record.dist
        };

        Ok(Edge::new(
            record.from.clone(),
            record.to.clone(),
            distance,
            modes,
            record.line_id.clone(),
            record.desc.clone().unwrap_or_default(),
        ))
    }

    fn has_two_way_edge(&self, from: &str, to: &str) -> bool {
        self.edges_from(from)
            .iter()
            .any(|e| e.to == to && e.is_bidirectional())
    }

    fn push_edge(&mut self, edge: Edge) {
        self.adjacency.entry(edge.from.clone()).or_default().push(edge);
        self.edge_count += 1;
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored edges, synthesised reverse edges included.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All outgoing edges of a node, regardless of mode.
    pub fn edges_from(&self, id: &str) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Outgoing edges usable under `allowed`.
    ///
    /// An unknown node simply has no neighbors.
    pub fn neighbors<'g>(
        &'g self,
        id: &str,
        allowed: ModeMask,
    ) -> impl Iterator<Item = &'g Edge> + use<'g> {
        self.edges_from(id)
            .iter()
            .filter(move |e| e.usable_under(allowed))
    }

    /// The node closest to a coordinate, by great-circle distance.
    ///
    /// Ties go to the node inserted first. `None` for an empty graph.
    pub fn nearest_node(&self, lat: f64, lng: f64) -> Option<&Node> {
        let mut nearest: Option<(&Node, f64)> = None;

        for node in &self.nodes {
            let d = distance_between(lat, lng, node.lat, node.lng);
            if nearest.is_none_or(|(_, best)| d < best) {
                nearest = Some((node, d));
            }
        }

        nearest.map(|(node, _)| node)
    }

    /// Nodes whose name or id contains `query`, ignoring case.
    ///
    /// Results follow insertion order and are capped at `limit`.
    pub fn search_nodes(&self, query: &str, limit: usize) -> Vec<&Node> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.nodes
            .iter()
            .filter(|n| {
                n.name.to_lowercase().contains(&query) || n.id.to_lowercase().contains(&query)
            })
            .take(limit)
            .collect()
    }

    /// Human-readable summary of a route.
    pub fn format_path(&self, result: &PathResult) -> String {
        if !result.found {
            return "no route found".to_string();
        }

        let mut out = format!(
            "Total distance: {:.2} m ({:.2} km)\nEstimated time: {:.0} s ({:.1} min)\nRoute:\n",
            result.distance,
            result.distance / 1000.0,
            result.estimated_time,
            result.estimated_time / 60.0
        );

        let named = result.path.iter().filter_map(|id| self.node(id));
        for (i, node) in named.enumerate() {
            out.push_str(&format!("{}. {} ({})\n", i + 1, node.name, node.id));
        }

        out
    }
}
