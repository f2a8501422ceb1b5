//! Directed edges.

use super::mode::{Mode, ModeMask};

/// Marker appended to the description of synthesised reverse edges.
const REVERSE_MARKER: &str = " (reverse)";

/// A directed connection between two nodes.
///
/// The mode mask is computed once on construction; routing only ever
/// tests it with a bitwise AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,

    /// Length in meters.
    pub distance: f64,

    /// Supported modes, in input order, without duplicates.
    pub modes: Vec<Mode>,

    /// Scheduled service identifier; only meaningful for bus and subway.
    pub line_id: Option<String>,

    pub description: String,

    mask: ModeMask,
}

impl Edge {
    /// Create an edge. Duplicate modes are dropped, keeping the first.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        distance: f64,
        modes: impl IntoIterator<Item = Mode>,
        line_id: Option<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut unique: Vec<Mode> = Vec::new();
        for mode in modes {
            if !unique.contains(&mode) {
                unique.push(mode);
            }
        }
        let mask = unique.iter().copied().collect();

        Self {
            from: from.into(),
            to: to.into(),
            distance,
            modes: unique,
            line_id: line_id.filter(|l| !l.is_empty()),
            description: description.into(),
            mask,
        }
    }

    pub fn mask(&self) -> ModeMask {
        self.mask
    }

    /// Whether a query allowing `allowed` may use this edge at all.
    pub fn usable_under(&self, allowed: ModeMask) -> bool {
        self.mask.intersects(allowed)
    }

    /// Line identifier, if any.
    pub fn line(&self) -> Option<&str> {
        self.line_id.as_deref()
    }

    /// True if any of the edge's modes can be travelled both ways.
    pub fn is_bidirectional(&self) -> bool {
        self.mask.intersects(ModeMask::BIDIRECTIONAL)
    }

    /// The reverse edge carrying only the walk/bike/car subset of modes.
    ///
    /// Returns `None` for edges with only scheduled modes.
    pub fn reversed(&self) -> Option<Edge> {
        if !self.is_bidirectional() {
            return None;
        }

        Some(Edge::new(
            self.to.clone(),
            self.from.clone(),
            self.distance,
            self.modes.iter().copied().filter(|m| m.is_bidirectional()),
            None,
            format!("{}{}", self.description, REVERSE_MARKER),
        ))
    }
}
