//! Map nodes.

use geo::Point;
use serde::{Deserialize, Serialize};

/// A point on the map: a landmark, a stop, an intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    pub lat: f64,
    pub lng: f64,

    /// Free-text category such as "landmark", "bus_stop" or "subway_entrance".
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Node {
    /// Create a new node.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lng: f64,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lng,
            kind: kind.into(),
        }
    }

    /// Position as a geo point (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    /// Whether the coordinates are usable for distance computations.
    pub fn has_finite_coordinates(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}
