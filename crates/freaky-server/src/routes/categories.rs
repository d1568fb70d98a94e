//! Category routes: CRUD plus manual product assignment.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use super::error_response;
use crate::state::AppState;
use freaky_core::slugify;
use freaky_store::NewCategory;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", get(get_category).post(update_category))
        .route("/categories/{id}/delete", post(delete_category))
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Category not found" })),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRequest {
    name: Option<String>,
    slug: Option<String>,
    #[serde(alias = "image_url")]
    image_url: Option<String>,
    #[serde(default)]
    product_ids: Vec<i64>,
}

impl CategoryRequest {
    /// Validated category fields; the slug is derived from the name unless given.
    fn to_new_category(&self, placeholder_image: &str) -> Option<NewCategory> {
        let name = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        let slug = self
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| slugify(name));
        let image_url = self
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(placeholder_image);
        Some(NewCategory {
            name: name.to_string(),
            slug,
            image_url: Some(image_url.to_string()),
        })
    }
}

/// GET /api/categories: all categories with product counts.
async fn list_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.list_categories() {
        Ok(categories) => (StatusCode::OK, Json(serde_json::json!(categories))),
        Err(e) => error_response(e),
    }
}

/// GET /api/categories/{id}
async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.get_category(id) {
        Ok(Some(category)) => (StatusCode::OK, Json(serde_json::json!(category))),
        Ok(None) => not_found(),
        Err(e) => error_response(e),
    }
}

/// POST /api/categories: create, optionally assigning products.
async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CategoryRequest>,
) -> impl IntoResponse {
    let Some(category) = req.to_new_category(&state.config.placeholder_image) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Name is required" })),
        );
    };

    let id = match state.store.add_category(&category) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };
    if !req.product_ids.is_empty() {
        if let Err(e) = state.store.add_products_to_category(id, &req.product_ids) {
            return error_response(e);
        }
    }

    (StatusCode::CREATED, Json(serde_json::json!({ "id": id })))
}

/// POST /api/categories/{id}: update fields and replace the product set.
async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> impl IntoResponse {
    let Some(category) = req.to_new_category(&state.config.placeholder_image) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Name is required" })),
        );
    };

    match state.store.update_category(id, &category) {
        Ok(true) => {}
        Ok(false) => return not_found(),
        Err(e) => return error_response(e),
    }
    match state.store.replace_category_products(id, &req.product_ids) {
        Ok(linked) => {
            info!("Category {} now has {} products", id, linked);
            (StatusCode::OK, Json(serde_json::json!({ "success": true })))
        }
        Err(e) => error_response(e),
    }
}

/// POST /api/categories/{id}/delete
async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.delete_category(id) {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))),
        Ok(false) => not_found(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_client::send;
    use crate::state::test_support::test_state;
    use freaky_core::config::DEFAULT_CATEGORY_IMAGE;
    use freaky_store::NewProduct;

    fn add_product(state: &AppState, name: &str, sku: &str) -> i64 {
        state
            .store
            .add_product(&NewProduct {
                name: name.to_string(),
                slug: slugify(name),
                sku: sku.to_string(),
                ..Default::default()
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_category_with_products() {
        let (state, _dir) = test_state();
        let pid = add_product(&state, "Sjal", "SJA001");

        let (status, body) = send(
            &state,
            "POST",
            "/api/categories",
            Some(serde_json::json!({
                "name": "Höstfavoriter",
                "image_url": "",
                "productIds": [pid],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let id = body["id"].as_i64().unwrap();
        let category = state.store.get_category(id).unwrap().unwrap();
        assert_eq!(category.slug, "hostfavoriter");
        assert_eq!(category.image_url, DEFAULT_CATEGORY_IMAGE);
        assert_eq!(category.product_count, 1);
    }

    #[tokio::test]
    async fn test_create_category_requires_name() {
        let (state, _dir) = test_state();
        let (status, _) = send(
            &state,
            "POST",
            "/api/categories",
            Some(serde_json::json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.store.count_categories().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_products() {
        let (state, _dir) = test_state();
        let a = add_product(&state, "A", "AAA001");
        let b = add_product(&state, "B", "BBB001");

        let (_, created) = send(
            &state,
            "POST",
            "/api/categories",
            Some(serde_json::json!({ "name": "Rea", "productIds": [a] })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(
            &state,
            "POST",
            &format!("/api/categories/{}", id),
            Some(serde_json::json!({ "name": "Rea", "slug": "rea-2025", "productIds": [b] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, category) = send(&state, "GET", &format!("/api/categories/{}", id), None).await;
        assert_eq!(category["slug"], "rea-2025");
        assert_eq!(category["productCount"], 1);
        assert!(state.store.categories_for_product(a).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let (state, _dir) = test_state();
        for name in ["Skor", "Byxor"] {
            send(
                &state,
                "POST",
                "/api/categories",
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        }

        let (_, list) = send(&state, "GET", "/api/categories", None).await;
        let names: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Byxor", "Skor"]);

        let id = list[0]["id"].as_i64().unwrap();
        let uri = format!("/api/categories/{}/delete", id);
        let (status, _) = send(&state, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
