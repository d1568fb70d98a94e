//! HTTP route handlers: the catalog JSON API under `/api`.

pub mod categories;
pub mod classify;
pub mod products;
pub mod stats;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::state::AppState;
use freaky_core::Error;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(products::routes())
        .merge(categories::routes())
        .merge(classify::routes())
        .merge(stats::routes())
}

/// Map a domain error to a status code and `{"error": ...}` body.
pub(crate) fn error_response(err: Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Conflict(_) => StatusCode::CONFLICT,
        _ => {
            error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let message = match status {
        StatusCode::INTERNAL_SERVER_ERROR => "Database error".to_string(),
        _ => err.to_string(),
    };
    (status, Json(serde_json::json!({ "error": message })))
}
