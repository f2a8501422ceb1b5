//! Graph construction errors.

use std::path::PathBuf;

/// Errors that prevent a graph from being built.
///
/// Construction either succeeds completely or returns one of these;
/// a partially built graph is never handed out.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Map data file could not be read
    #[error("failed to read map data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Map data is not a valid document
    #[error("malformed map data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A node has an empty identifier
    #[error("node identifier must not be empty")]
    EmptyNodeId,

    /// Two nodes share an identifier
    #[error("duplicate node identifier: {0}")]
    DuplicateNode(String),

    /// A node's latitude or longitude is NaN or infinite
    #[error("node {id} has non-finite coordinates")]
    InvalidCoordinates { id: String },

    /// An edge distance is negative or not finite
    #[error("edge {from} -> {to} has invalid distance {distance}")]
    InvalidDistance {
        from: String,
        to: String,
        distance: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GraphError::DuplicateNode("n1".into());
        assert_eq!(err.to_string(), "duplicate node identifier: n1");

        let err = GraphError::EmptyNodeId;
        assert_eq!(err.to_string(), "node identifier must not be empty");

        let err = GraphError::InvalidCoordinates { id: "x".into() };
        assert_eq!(err.to_string(), "node x has non-finite coordinates");

        let err = GraphError::InvalidDistance {
            from: "a".into(),
            to: "b".into(),
            distance: -3.0,
        };
        assert_eq!(err.to_string(), "edge a -> b has invalid distance -3");
    }

    #[test]
    fn parse_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GraphError = json_err.into();
        assert!(err.to_string().starts_with("malformed map data:"));
    }
}
