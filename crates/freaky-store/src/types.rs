//! Row types and write options for the catalog tables.

use serde::{Deserialize, Serialize};

/// A product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub sku: String,
    /// Price in kronor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// RFC 3339 timestamp; `None` while unpublished.
    pub publish_date: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Fields for inserting a product. `slug` and `sku` are stored as given.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub sku: String,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub publish_date: Option<String>,
}

/// Partial product update; `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

/// Compact product row used by SKU lookup and search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub publish_date: Option<String>,
}

/// A category row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Number of linked products.
    pub product_count: i64,
}

/// Fields for inserting or replacing a category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    /// Placeholder image is used when empty.
    pub image_url: Option<String>,
}

/// Publish state after a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishState {
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_products: i64,
    pub published_products: i64,
    pub total_categories: i64,
    pub total_links: i64,
    pub db_path: String,
    pub db_size_mb: f64,
}
