//! Route search results.

use serde::{Deserialize, Serialize};

use crate::domain::Mode;

/// One traversed edge of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub from_id: String,
    pub to_id: String,

    /// Meters.
    pub distance: f64,

    /// Seconds, wait included.
    pub time: f64,

    /// Modes the query could use on this edge.
    pub modes: Vec<Mode>,

    /// Mode actually used.
    pub used_mode: Mode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
}

/// Outcome of a route search.
///
/// When `found` is false every other field is empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Node ids from start to end.
    pub path: Vec<String>,

    pub segments: Vec<PathSegment>,

    /// Total meters.
    pub distance: f64,

    /// Total seconds.
    pub estimated_time: f64,

    pub found: bool,
}

impl PathResult {
    /// The result for an unreachable destination.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Number of changes between consecutive segments, counting a change of
    /// mode or of line.
    pub fn transfers(&self) -> usize {
        self.segments
            .windows(2)
            .filter(|w| w[0].used_mode != w[1].used_mode || w[0].line_id != w[1].line_id)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(mode: Mode, line: Option<&str>) -> PathSegment {
        PathSegment {
            from_id: "a".into(),
            to_id: "b".into(),
            distance: 1.0,
            time: 1.0,
            modes: vec![mode],
            used_mode: mode,
            line_id: line.map(str::to_string),
            desc: String::new(),
        }
    }

    #[test]
    fn not_found_is_empty() {
        let result = PathResult::not_found();
        assert!(!result.found);
        assert!(result.path.is_empty());
        assert!(result.segments.is_empty());
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.estimated_time, 0.0);
    }

    #[test]
    fn transfers_count_mode_and_line_changes() {
        let result = PathResult {
            segments: vec![
                segment(Mode::Walk, None),
                segment(Mode::Bus, Some("L1")),
                segment(Mode::Bus, Some("L1")),
                segment(Mode::Bus, Some("L2")),
            ],
            found: true,
            ..PathResult::default()
        };
        assert_eq!(result.transfers(), 2);
        assert_eq!(PathResult::not_found().transfers(), 0);
    }

    #[test]
    fn segment_json_shape() {
        let json = serde_json::to_value(segment(Mode::Subway, Some("M2"))).unwrap();
        assert_eq!(json["used_mode"], "subway");
        assert_eq!(json["modes"][0], "subway");
        assert_eq!(json["line_id"], "M2");
        assert!(json.get("desc").is_none());
    }
}
