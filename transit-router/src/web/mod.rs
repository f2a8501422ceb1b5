//! Web layer for the router.
//!
//! JSON endpoints for route planning and node lookup.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
