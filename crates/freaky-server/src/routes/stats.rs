//! Stats and server info routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/stats: catalog counts.
async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.get_stats() {
        Ok(stats) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "products": stats.total_products,
                "publishedProducts": stats.published_products,
                "categories": stats.total_categories,
                "links": stats.total_links,
                "dbSizeMb": stats.db_size_mb,
                "port": state.config.port,
            })),
        ),
        Err(e) => error_response(e),
    }
}
