//! Product routes: create (with automatic categorization), edit, publish, delete, lookup.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use super::error_response;
use crate::state::AppState;
use freaky_classify::AutoLinker;
use freaky_core::{normalize_sku, slugify, validate_sku};
use freaky_store::{NewProduct, ProductSummary, ProductUpdate};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", post(create_product).get(find_by_sku))
        .route("/products/search", get(search_products))
        .route("/products/{id}", post(update_product))
        .route("/products/{id}/categories", get(get_product_categories))
        .route("/products/{id}/publish", post(publish_product))
        .route("/products/{id}/toggle-publish", post(toggle_publish))
        .route("/products/{id}/delete", post(delete_product))
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Product not found" })),
    )
}

/// Run the classifier for a stored product. Failures are logged, not returned:
/// the product itself has already been saved.
fn auto_link(state: &AppState, product_id: i64, name: &str, description: &str) -> Vec<i64> {
    match AutoLinker::new(&state.store).link_product(product_id, name, description) {
        Ok(ids) => ids,
        Err(e) => {
            warn!("Error linking product {} to categories: {}", product_id, e);
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------
// Create / edit
// ---------------------------------------------------------------

#[derive(Deserialize)]
struct CreateProductRequest {
    name: Option<String>,
    description: Option<String>,
    sku: Option<String>,
    price: Option<f64>,
    image_url: Option<String>,
    #[serde(rename = "publishDate", alias = "publish_date")]
    publish_date: Option<String>,
}

/// POST /api/products: insert a product and link it to matching categories.
async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> impl IntoResponse {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    let sku = req.sku.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() || sku.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Name and SKU are required" })),
        );
    }
    if let Err(e) = validate_sku(sku) {
        return error_response(e);
    }

    let product = NewProduct {
        name: name.to_string(),
        slug: slugify(name),
        description: req.description.unwrap_or_default(),
        sku: normalize_sku(sku),
        price: req.price,
        image_url: req.image_url.filter(|url| !url.trim().is_empty()),
        publish_date: req.publish_date,
    };

    let product_id = match state.store.add_product(&product) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };
    let category_ids = auto_link(&state, product_id, &product.name, &product.description);

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": product_id,
            "categoryIds": category_ids,
        })),
    )
}

#[derive(Deserialize)]
struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    image_url: Option<String>,
}

/// POST /api/products/{id}: edit a product and re-run categorization.
/// Links are only added; manual links survive an edit.
async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> impl IntoResponse {
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let update = ProductUpdate {
        slug: name.as_deref().map(slugify),
        name,
        description: req.description,
        price: req.price,
        image_url: req.image_url,
    };

    match state.store.update_product(id, &update) {
        Ok(true) => {}
        Ok(false) => return not_found(),
        Err(e) => return error_response(e),
    }

    let product = match state.store.get_product(id) {
        Ok(Some(p)) => p,
        Ok(None) => return not_found(),
        Err(e) => return error_response(e),
    };
    let category_ids = auto_link(&state, id, &product.name, &product.description);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "categoryIds": category_ids,
        })),
    )
}

/// GET /api/products/{id}/categories
async fn get_product_categories(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.categories_for_product(id) {
        Ok(categories) => (StatusCode::OK, Json(serde_json::json!(categories))),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------
// Publishing / deletion
// ---------------------------------------------------------------

/// POST /api/products/{id}/publish: set the publish date to now.
async fn publish_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let publish_date = chrono::Utc::now().to_rfc3339();
    match state.store.set_publish_date(id, Some(&publish_date)) {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true, "publishDate": publish_date })),
        ),
        Ok(false) => not_found(),
        Err(e) => error_response(e),
    }
}

/// POST /api/products/{id}/toggle-publish
async fn toggle_publish(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.toggle_publish(id) {
        Ok(Some(publish)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "published": publish.published,
                "publishDate": publish.publish_date,
            })),
        ),
        Ok(None) => not_found(),
        Err(e) => error_response(e),
    }
}

/// POST /api/products/{id}/delete
async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.delete_product(id) {
        Ok(true) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))),
        Ok(false) => not_found(),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------

#[derive(Deserialize)]
struct SkuQuery {
    sku: Option<String>,
}

/// GET /api/products?sku=<sku>: always an array, empty without a SKU.
async fn find_by_sku(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SkuQuery>,
) -> impl IntoResponse {
    let sku = query.sku.unwrap_or_default();
    if sku.trim().is_empty() {
        return (StatusCode::OK, Json(serde_json::json!([])));
    }
    match state.store.find_products_by_sku(sku.trim()) {
        Ok(rows) => (StatusCode::OK, Json(serde_json::json!(rows))),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    name: Option<String>,
}

/// GET /api/products/search?name=<term>: match on product or category name.
async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let term = query.name.unwrap_or_default();
    let term = term.trim();
    if term.is_empty() {
        return (StatusCode::OK, Json(serde_json::json!([])));
    }
    match state.store.search_products(term) {
        Ok(rows) => {
            let formatted: Vec<ProductSummary> = rows
                .into_iter()
                .map(|mut row| {
                    row.publish_date = row.publish_date.as_deref().map(format_publish_date);
                    row
                })
                .collect();
            (StatusCode::OK, Json(serde_json::json!(formatted)))
        }
        Err(e) => error_response(e),
    }
}

/// Render an RFC 3339 timestamp as local `YYYY-MM-DD HH:MM`; unparseable
/// values pass through untouched.
fn format_publish_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_client::send;
    use crate::state::test_support::test_state;
    use freaky_store::NewCategory;

    fn add_category(state: &AppState, name: &str) -> i64 {
        state
            .store
            .add_category(&NewCategory {
                name: name.to_string(),
                slug: slugify(name),
                image_url: None,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_product_links_categories() {
        let (state, _dir) = test_state();
        let jackor = add_category(&state, "Jackor");
        let klader = add_category(&state, "Kläder");
        add_category(&state, "Skor");

        let (status, body) = send(
            &state,
            "POST",
            "/api/products",
            Some(serde_json::json!({
                "name": "Vinterjacka dam",
                "description": "Varm jacka för kalla dagar",
                "sku": "vin001",
                "price": 1299.0,
                "publishDate": null,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["categoryIds"], serde_json::json!([jackor, klader]));

        let id = body["id"].as_i64().unwrap();
        let product = state.store.get_product(id).unwrap().unwrap();
        assert_eq!(product.sku, "VIN001");
        assert_eq!(product.slug, "vinterjacka-dam");
        assert_eq!(state.store.categories_for_product(id).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_product_requires_name_and_sku() {
        let (state, _dir) = test_state();
        let (status, body) = send(
            &state,
            "POST",
            "/api/products",
            Some(serde_json::json!({ "name": "Keps" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name and SKU are required");
    }

    #[tokio::test]
    async fn test_create_product_rejects_bad_sku() {
        let (state, _dir) = test_state();
        let (status, body) = send(
            &state,
            "POST",
            "/api/products",
            Some(serde_json::json!({ "name": "Keps", "sku": "AB12" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("SKU måste vara"));
        assert_eq!(state.store.count_products().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_sku_conflict() {
        let (state, _dir) = test_state();
        let body = serde_json::json!({ "name": "Keps", "sku": "KEP001" });
        send(&state, "POST", "/api/products", Some(body.clone())).await;
        let (status, _) = send(&state, "POST", "/api/products", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_edit_reclassifies() {
        let (state, _dir) = test_state();
        let skor = add_category(&state, "Skor");

        let (_, created) = send(
            &state,
            "POST",
            "/api/products",
            Some(serde_json::json!({ "name": "Nyhet", "sku": "NYH001" })),
        )
        .await;
        assert_eq!(created["categoryIds"], serde_json::json!([]));
        let id = created["id"].as_i64().unwrap();

        let (status, body) = send(
            &state,
            "POST",
            &format!("/api/products/{}", id),
            Some(serde_json::json!({ "description": "vita sneakers i läder" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categoryIds"], serde_json::json!([skor]));

        let (status, _) = send(
            &state,
            "POST",
            "/api/products/999",
            Some(serde_json::json!({ "name": "X" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_toggle_publish_and_delete() {
        let (state, _dir) = test_state();
        let (_, created) = send(
            &state,
            "POST",
            "/api/products",
            Some(serde_json::json!({ "name": "Kjol", "sku": "KJO001" })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let uri = format!("/api/products/{}/toggle-publish", id);
        let (_, on) = send(&state, "POST", &uri, None).await;
        assert_eq!(on["published"], true);
        assert!(on["publishDate"].is_string());
        let (_, off) = send(&state, "POST", &uri, None).await;
        assert_eq!(off["published"], false);

        let (status, _) = send(&state, "POST", &format!("/api/products/{}/delete", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_lookup_by_sku_and_search() {
        let (state, _dir) = test_state();
        add_category(&state, "Accessoarer");
        send(
            &state,
            "POST",
            "/api/products",
            Some(serde_json::json!({
                "name": "Randig halsduk",
                "sku": "HAL001",
                "publishDate": "2025-03-01T09:30:00Z",
            })),
        )
        .await;

        let (_, empty) = send(&state, "GET", "/api/products", None).await;
        assert_eq!(empty, serde_json::json!([]));

        let (_, by_sku) = send(&state, "GET", "/api/products?sku=hal001", None).await;
        assert_eq!(by_sku.as_array().unwrap().len(), 1);

        // found through the auto-linked category name
        let (_, found) = send(&state, "GET", "/api/products/search?name=accessoar", None).await;
        let rows = found.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["publishDate"].as_str().unwrap().len(), "2025-03-01 09:30".len());
    }

    #[test]
    fn test_format_publish_date_passthrough() {
        assert_eq!(format_publish_date("not a date"), "not a date");
    }
}
