//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Mode, Node};
use crate::graph::Graph;
use crate::planner::{PathResult, PathSegment};

/// Request to plan a route.
///
/// Either endpoint may be given as a node id or as coordinates; non-zero
/// coordinates take precedence and snap to the nearest node.
#[derive(Debug, Default, Deserialize)]
pub struct PathRequest {
    #[serde(default)]
    pub start_id: String,

    #[serde(default)]
    pub end_id: String,

    #[serde(default)]
    pub start_lat: f64,
    #[serde(default)]
    pub start_lng: f64,

    #[serde(default)]
    pub end_lat: f64,
    #[serde(default)]
    pub end_lng: f64,

    /// Permitted modes, e.g. `["walk", "bus"]`
    pub modes: Vec<String>,
}

/// A node in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl PathNode {
    pub fn from_node(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            lat: node.lat,
            lng: node.lng,
            kind: node.kind.clone(),
        }
    }
}

/// A route segment with endpoint names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub from_id: String,
    pub from_name: String,
    pub to_id: String,
    pub to_name: String,

    /// Meters
    pub distance: f64,

    /// Seconds
    pub time: f64,

    pub modes: Vec<Mode>,
    pub used_mode: Mode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
}

impl SegmentResult {
    /// Build from a segment, falling back to ids when a node has no entry.
    pub fn from_segment(graph: &Graph, segment: &PathSegment) -> Self {
        let name_of = |id: &str| {
            graph
                .node(id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        Self {
            from_id: segment.from_id.clone(),
            from_name: name_of(&segment.from_id),
            to_id: segment.to_id.clone(),
            to_name: name_of(&segment.to_id),
            distance: segment.distance,
            time: segment.time,
            modes: segment.modes.clone(),
            used_mode: segment.used_mode,
            line_id: segment.line_id.clone(),
            desc: segment.desc.clone(),
        }
    }
}

/// Response for route planning.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathResponse {
    pub found: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<SegmentResult>,

    /// Total meters
    #[serde(default)]
    pub distance: f64,

    /// Total seconds
    #[serde(default)]
    pub estimated_time: f64,

    /// Changes of mode or line along the route
    #[serde(default)]
    pub transfers: usize,

    pub message: String,
}

impl PathResponse {
    /// Response for a valid query with no route.
    pub fn not_found() -> Self {
        Self {
            found: false,
            path: Vec::new(),
            segments: Vec::new(),
            distance: 0.0,
            estimated_time: 0.0,
            transfers: 0,
            message: "no route satisfies the requested modes".to_string(),
        }
    }

    pub fn from_result(graph: &Graph, result: &PathResult) -> Self {
        if !result.found {
            return Self::not_found();
        }

        Self {
            found: true,
            path: result
                .path
                .iter()
                .filter_map(|id| graph.node(id))
                .map(PathNode::from_node)
                .collect(),
            segments: result
                .segments
                .iter()
                .map(|s| SegmentResult::from_segment(graph, s))
                .collect(),
            distance: result.distance,
            estimated_time: result.estimated_time,
            transfers: result.transfers(),
            message: "route found".to_string(),
        }
    }
}

/// Response listing all nodes.
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeListResponse {
    pub count: usize,
    pub nodes: Vec<PathNode>,
}

/// Query for node search.
#[derive(Debug, Deserialize)]
pub struct NodeSearchRequest {
    /// Substring of the name or id
    #[serde(default)]
    pub q: String,

    /// Maximum results (default 20, capped at 100)
    pub limit: Option<usize>,
}

/// Response for node search.
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeSearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<PathNode>,
}

/// Response after reloading map data.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub generation: u64,
    pub nodes: usize,
    pub edges: usize,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
