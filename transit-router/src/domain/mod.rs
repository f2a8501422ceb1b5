//! Domain types for the multimodal router.
//!
//! Nodes, edges and the travel-mode cost model. Mode names are parsed into
//! the closed [`Mode`] enum once, at load time, so routing never compares
//! strings.

mod edge;
mod mode;
mod node;

pub use edge::Edge;
pub use mode::{InvalidMode, Mode, ModeMask, filter_modes, parse_modes, segment_time};
pub use node::Node;
