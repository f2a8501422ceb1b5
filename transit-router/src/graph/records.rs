//! Raw map data records, as supplied by a data source.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::GraphError;
use crate::domain::Node;

/// An edge as it appears in map data, before mode parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,

    /// Distance in meters; zero means "compute from endpoint coordinates".
    #[serde(default)]
    pub dist: f64,

    #[serde(default)]
    pub modes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl EdgeRecord {
    /// Create a record with no line or description.
    pub fn new(from: &str, to: &str, dist: f64, modes: &[&str]) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            dist,
            modes: modes.iter().map(|m| m.to_string()).collect(),
            line_id: None,
            desc: None,
        }
    }

    /// Set the line identifier.
    pub fn with_line(mut self, line_id: &str) -> Self {
        self.line_id = Some(line_id.to_string());
        self
    }

    /// Set the description.
    pub fn with_desc(mut self, desc: &str) -> Self {
        self.desc = Some(desc.to_string());
        self
    }
}

/// A whole map data document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapData {
    /// Free-form metadata such as a version string.
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,

    pub nodes: Vec<Node>,

    pub edges: Vec<EdgeRecord>,
}

impl MapData {
    /// Parse a map data document from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a map data file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}
