//! Axum router setup for the gitrat server

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{ServerState, handlers};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        // Whole dataset
        .route("/api/all", get(handlers::get_all))
        .route("/api/list", get(handlers::get_list))
        // Subgraph around one node
        .route("/api/tree", get(handlers::get_tree_all))
        .route("/api/tree/:name", get(handlers::get_tree))
        // Catalog
        .route("/api/catalog", get(handlers::get_catalog_all))
        .route("/api/catalog/:selector", get(handlers::get_catalog))
        // Per-category lookups: groups, subgroups, projects
        .route("/api/:category/all", get(handlers::get_members))
        .route("/api/:category/name", get(handlers::missing_parameter))
        .route("/api/:category/name/:name", get(handlers::get_by_name))
        .route("/api/:category/id", get(handlers::missing_parameter))
        .route("/api/:category/id/:id", get(handlers::get_by_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
