//! Time-optimal multimodal route search.
//!
//! A label-setting (Dijkstra) search over travel time. Because waits depend
//! on how a node was reached, labels are kept per (node, arrival mode,
//! arrival line) rather than per node, so the route returned is the exact
//! minimum under the transfer-aware cost model.

mod result;
mod search;


pub use result::{PathResult, PathSegment};
pub use search::{QueryError, validate_query};
