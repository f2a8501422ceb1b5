//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::graph::Graph;
use crate::planner::{QueryError, validate_query};
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Default and maximum node search result counts.
const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_LIMIT: usize = 100;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/path", post(find_path))
        .route("/api/nodes", get(list_nodes))
        .route("/api/nodes/:id", get(get_node))
        .route("/api/search", get(search_nodes))
        .route("/api/reload", post(reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Snap to the nearest node when both coordinates are set, else use the id.
fn resolve_endpoint(graph: &Graph, id: &str, lat: f64, lng: f64) -> String {
    if lat != 0.0 && lng != 0.0 {
        if let Some(node) = graph.nearest_node(lat, lng) {
            return node.id.clone();
        }
    }
    id.to_string()
}

/// Plan the fastest route between two points.
async fn find_path(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PathRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid path request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let snapshot = state.store.snapshot().await;
    let graph = &snapshot.graph;

    let start = resolve_endpoint(graph, &req.start_id, req.start_lat, req.start_lng);
    let end = resolve_endpoint(graph, &req.end_id, req.end_lat, req.end_lng);
    if start.is_empty() || end.is_empty() {
        return Err(AppError::BadRequest {
            message: "start or end not specified".to_string(),
        });
    }

    let allowed = validate_query(graph, &start, &end, &req.modes)?;
    let result = state.routes.route(&snapshot, &start, &end, allowed).await?;

    info!(
        %start,
        %end,
        ?allowed,
        found = result.found,
        seconds = result.estimated_time,
        "route planned"
    );

    Ok(Json(PathResponse::from_result(graph, &result)).into_response())
}

/// List all nodes in insertion order.
async fn list_nodes(State(state): State<AppState>) -> Json<NodeListResponse> {
    let graph = state.store.graph().await;
    let nodes: Vec<PathNode> = graph.nodes().iter().map(PathNode::from_node).collect();

    Json(NodeListResponse {
        count: nodes.len(),
        nodes,
    })
}

/// Look up one node.
async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PathNode>, AppError> {
    let graph = state.store.graph().await;
    graph
        .node(&id)
        .map(|n| Json(PathNode::from_node(n)))
        .ok_or_else(|| AppError::NotFound {
            message: format!("Node not found: {id}"),
        })
}

/// Search nodes by name or id.
async fn search_nodes(
    State(state): State<AppState>,
    Query(req): Query<NodeSearchRequest>,
) -> Result<Json<NodeSearchResponse>, AppError> {
    if req.q.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "missing search query".to_string(),
        });
    }

    let limit = req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT);
    let graph = state.store.graph().await;
    let results: Vec<PathNode> = graph
        .search_nodes(&req.q, limit)
        .into_iter()
        .map(PathNode::from_node)
        .collect();

    Ok(Json(NodeSearchResponse {
        query: req.q,
        count: results.len(),
        results,
    }))
}

/// Reload the map data and publish the new graph.
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let snapshot = state.store.reload().await?;
    state.routes.invalidate_all();

    Ok(Json(ReloadResponse {
        generation: snapshot.generation,
        nodes: snapshot.graph.node_count(),
        edges: snapshot.graph.edge_count(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
