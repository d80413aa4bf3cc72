//! REST API handlers for the gitrat server
//!
//! Every handler fetches one snapshot from the store and runs to completion
//! against it. Responses are rendered before the handler returns, while
//! the snapshot is still held.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use gitrat_core::{NodeId, Snapshot, catalog, hierarchy, resolver};
use serde::Serialize;

use crate::ServerState;
use crate::error::ApiError;

type ApiResult = Result<Response, ApiError>;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dataset: String,
    pub loaded: bool,
}

/// Per-category listing.
#[derive(Debug, Serialize)]
struct MembersResponse<'a> {
    category: &'a str,
    nodes: Vec<&'a gitrat_core::Node>,
}

fn snapshot(state: &ServerState) -> Result<Arc<Snapshot>, ApiError> {
    Ok(state.store.snapshot(&state.dataset)?)
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset: state.dataset.clone(),
        loaded: state.store.snapshot(&state.dataset).is_ok(),
    };
    Json(health)
}

/// Every node and edge of the dataset as `[nodes, edges]`.
pub async fn get_all(State(state): State<Arc<ServerState>>) -> ApiResult {
    let snapshot = snapshot(&state)?;
    let nodes: Vec<_> = snapshot.nodes().collect();
    let edges: Vec<_> = snapshot.edges().collect();
    Ok(Json((nodes, edges)).into_response())
}

/// `tree()` without a name: same as [`get_all`].
pub async fn get_tree_all(state: State<Arc<ServerState>>) -> ApiResult {
    get_all(state).await
}

/// Ancestors and descendants of one named node as `[nodes, edges]`.
pub async fn get_tree(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> ApiResult {
    let snapshot = snapshot(&state)?;
    let subgraph = resolver::resolve(&snapshot, &name)?.into_tree(&name)?;
    tracing::debug!("Tree for `{}`: {} nodes", name, subgraph.nodes.len());
    Ok(Json((subgraph.nodes, subgraph.edges)).into_response())
}

/// The whole dataset as a forest of groups, subgroups and projects.
pub async fn get_list(State(state): State<Arc<ServerState>>) -> ApiResult {
    let snapshot = snapshot(&state)?;
    let forest = hierarchy::build_forest(&snapshot)?;
    tracing::debug!("Built forest with {} roots", forest.len());
    Ok(Json(forest).into_response())
}

pub async fn get_catalog_all(State(state): State<Arc<ServerState>>) -> ApiResult {
    let snapshot = snapshot(&state)?;
    Ok(Json(catalog::catalog(&snapshot, None)?).into_response())
}

pub async fn get_catalog(
    State(state): State<Arc<ServerState>>,
    Path(selector): Path<String>,
) -> ApiResult {
    let snapshot = snapshot(&state)?;
    Ok(Json(catalog::catalog(&snapshot, Some(&selector))?).into_response())
}

/// Every node of one category.
pub async fn get_members(
    State(state): State<Arc<ServerState>>,
    Path(category): Path<String>,
) -> ApiResult {
    let kind = catalog::parse_category(&category)?;
    let snapshot = snapshot(&state)?;
    let body = MembersResponse {
        category: &category,
        nodes: catalog::members(&snapshot, kind),
    };
    Ok(Json(body).into_response())
}

pub async fn get_by_name(
    State(state): State<Arc<ServerState>>,
    Path((category, name)): Path<(String, String)>,
) -> ApiResult {
    let kind = catalog::parse_category(&category)?;
    let snapshot = snapshot(&state)?;
    let node = catalog::find_by_name(&snapshot, kind, &name)?;
    Ok(Json(node).into_response())
}

pub async fn get_by_id(
    State(state): State<Arc<ServerState>>,
    Path((category, id)): Path<(String, String)>,
) -> ApiResult {
    let kind = catalog::parse_category(&category)?;
    let snapshot = snapshot(&state)?;
    let node = catalog::find_by_id(&snapshot, kind, &NodeId::new(id))?;
    Ok(Json(node).into_response())
}

/// `/:category/name` or `/:category/id` with nothing after it.
pub async fn missing_parameter(Path(category): Path<String>) -> ApiResult {
    catalog::parse_category(&category)?;
    Err(ApiError::Unprocessable(format!(
        "request to the {category} endpoint is missing its name or id parameter"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let state = Arc::new(ServerState::new(
            Arc::new(gitrat_core::MemoryStore::new()),
            "gitrat",
        ));
        let response = health_check(State(state)).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["dataset"], "gitrat");
        assert_eq!(body["loaded"], false);
    }
}
