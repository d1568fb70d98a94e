//! Classification preview route.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use super::error_response;
use crate::state::AppState;
use freaky_classify::{product_text, AutoLinker};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/classify", post(classify))
}

#[derive(Deserialize)]
struct ClassifyRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

/// POST /api/classify: categories a product would get, without saving anything.
async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> impl IntoResponse {
    match AutoLinker::new(&state.store).preview(&req.name, &req.description) {
        Ok(categories) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "normalizedText": product_text(&req.name, &req.description),
                "categories": categories,
            })),
        ),
        Err(e) => error_response(e),
    }
}
