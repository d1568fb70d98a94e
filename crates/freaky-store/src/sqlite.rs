//! SQLite-backed catalog store.
//!
//! One connection behind a mutex; every public method locks it for the
//! duration of a single statement or transaction.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use freaky_core::config::DEFAULT_CATEGORY_IMAGE;
use freaky_core::{Category, Error, Result};

const CATEGORY_SELECT: &str = "SELECT c.*, \
     (SELECT COUNT(*) FROM product_categories pc WHERE pc.category_id = c.id) AS product_count \
     FROM categories c";

/// Insert a link only when both sides exist; duplicates are ignored.
const LINK_SQL: &str = "INSERT OR IGNORE INTO product_categories (product_id, category_id) \
     SELECT ?1, ?2 \
     WHERE EXISTS (SELECT 1 FROM products WHERE id = ?1) \
       AND EXISTS (SELECT 1 FROM categories WHERE id = ?2)";

/// SQLite store for the product catalog.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl SqliteStore {
    /// Open or create the database file at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(dir) = db_path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| Error::Storage(e.to_string()))?;
        }

        let conn = Self::create_connection(&db_path)?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        info!(
            "SqliteStore initialized: {} products, {} categories, path={}",
            store.count_products()?,
            store.count_categories()?,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(db_err)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(db_err)?;
        Ok(conn)
    }

    // ---------------------------------------------------------------
    // Products
    // ---------------------------------------------------------------

    /// Insert a product. Returns the new product ID.
    pub fn add_product(&self, product: &NewProduct) -> Result<i64> {
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO products (name, slug, description, sku, price, image_url, \
                 publish_date, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .map_err(db_err)?
            .insert(params![
                product.name,
                product.slug,
                product.description,
                product.sku,
                product.price,
                product.image_url,
                product.publish_date,
                now(),
            ])
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint") {
                    Error::Conflict(format!("SKU {} already exists", product.sku))
                } else {
                    db_err(e)
                }
            })?;
        debug!("Inserted product {} ({})", id, product.sku);
        Ok(id)
    }

    /// Get a product by ID.
    pub fn get_product(&self, product_id: i64) -> Result<Option<Product>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM products WHERE id = ?1")
            .map_err(db_err)?
            .query_row(params![product_id], |row| Ok(Self::row_to_product(row)))
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    /// Apply a partial update. Returns false if the product does not exist.
    pub fn update_product(&self, product_id: i64, update: &ProductUpdate) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE products SET \
                 name = COALESCE(?1, name), \
                 slug = COALESCE(?2, slug), \
                 description = COALESCE(?3, description), \
                 price = COALESCE(?4, price), \
                 image_url = COALESCE(?5, image_url), \
                 updated_at = ?6 \
                 WHERE id = ?7",
                params![
                    update.name,
                    update.slug,
                    update.description,
                    update.price,
                    update.image_url,
                    now(),
                    product_id,
                ],
            )
            .map_err(db_err)?;
        Ok(count > 0)
    }

    /// Products whose SKU equals `sku`, ignoring case.
    pub fn find_products_by_sku(&self, sku: &str) -> Result<Vec<ProductSummary>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, name, sku, price, image_url, publish_date FROM products \
                 WHERE LOWER(sku) = LOWER(?1)",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![sku], |row| Ok(Self::row_to_summary(row)))
            .map_err(db_err)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Products whose name, or any linked category's name, contains `term`.
    pub fn search_products(&self, term: &str) -> Result<Vec<ProductSummary>> {
        let pattern = format!("%{}%", term);
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT DISTINCT p.id, p.name, p.sku, p.price, p.image_url, p.publish_date \
                 FROM products p \
                 LEFT JOIN product_categories pc ON p.id = pc.product_id \
                 LEFT JOIN categories c ON c.id = pc.category_id \
                 WHERE LOWER(p.name) LIKE LOWER(?1) OR LOWER(c.name) LIKE LOWER(?1) \
                 ORDER BY p.name",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![pattern], |row| Ok(Self::row_to_summary(row)))
            .map_err(db_err)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Set or clear the publish date. Returns false if the product does not exist.
    pub fn set_publish_date(&self, product_id: i64, publish_date: Option<&str>) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE products SET publish_date = ?1 WHERE id = ?2",
                params![publish_date, product_id],
            )
            .map_err(db_err)?;
        Ok(count > 0)
    }

    /// Unpublish a published product, or publish an unpublished one now.
    pub fn toggle_publish(&self, product_id: i64) -> Result<Option<PublishState>> {
        let current: Option<Option<String>> = {
            let conn = self.conn.lock();
            let row = conn
                .prepare_cached("SELECT publish_date FROM products WHERE id = ?1")
                .map_err(db_err)?
                .query_row(params![product_id], |row| row.get(0))
                .optional()
                .map_err(db_err)?;
            row
        };

        let state = match current {
            None => return Ok(None),
            Some(Some(_)) => PublishState {
                published: false,
                publish_date: None,
            },
            Some(None) => PublishState {
                published: true,
                publish_date: Some(now()),
            },
        };
        self.set_publish_date(product_id, state.publish_date.as_deref())?;
        Ok(Some(state))
    }

    /// Delete a product and its category links.
    pub fn delete_product(&self, product_id: i64) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        tx.execute(
            "DELETE FROM product_categories WHERE product_id = ?1",
            params![product_id],
        )
        .map_err(db_err)?;
        let count = tx
            .execute("DELETE FROM products WHERE id = ?1", params![product_id])
            .map_err(db_err)?;
        tx.commit().map_err(db_err)?;
        Ok(count > 0)
    }

    pub fn count_products(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM products")
    }

    // ---------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------

    /// Insert a category. Returns the new category ID.
    pub fn add_category(&self, category: &NewCategory) -> Result<i64> {
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO categories (name, slug, image_url, created_at) VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(db_err)?
            .insert(params![
                category.name,
                category.slug,
                Self::image_or_placeholder(category.image_url.as_deref()),
                now(),
            ])
            .map_err(db_err)?;
        info!("Created category \"{}\" (ID: {})", category.name, id);
        Ok(id)
    }

    /// Replace a category's name, slug and image. Returns false if it does not exist.
    pub fn update_category(&self, category_id: i64, category: &NewCategory) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE categories SET name = ?1, slug = ?2, image_url = ?3, updated_at = ?4 \
                 WHERE id = ?5",
                params![
                    category.name,
                    category.slug,
                    Self::image_or_placeholder(category.image_url.as_deref()),
                    now(),
                    category_id,
                ],
            )
            .map_err(db_err)?;
        Ok(count > 0)
    }

    /// Delete a category and its product links.
    pub fn delete_category(&self, category_id: i64) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        tx.execute(
            "DELETE FROM product_categories WHERE category_id = ?1",
            params![category_id],
        )
        .map_err(db_err)?;
        let count = tx
            .execute("DELETE FROM categories WHERE id = ?1", params![category_id])
            .map_err(db_err)?;
        tx.commit().map_err(db_err)?;
        Ok(count > 0)
    }

    pub fn get_category(&self, category_id: i64) -> Result<Option<CategoryRecord>> {
        let conn = self.conn.lock();
        let sql = format!("{} WHERE c.id = ?1", CATEGORY_SELECT);
        let row = conn
            .prepare_cached(&sql)
            .map_err(db_err)?
            .query_row(params![category_id], |row| Ok(Self::row_to_category(row)))
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    /// All categories ordered by name, with product counts.
    pub fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        let conn = self.conn.lock();
        let sql = format!("{} ORDER BY c.name", CATEGORY_SELECT);
        let mut stmt = conn.prepare_cached(&sql).map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| Ok(Self::row_to_category(row)))
            .map_err(db_err)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Current id + name snapshot of every category, in id order.
    pub fn category_refs(&self) -> Result<Vec<Category>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT id, name FROM categories ORDER BY id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| Ok(Category::new(row.get(0)?, row.get::<_, String>(1)?)))
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    pub fn count_categories(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM categories")
    }

    // ---------------------------------------------------------------
    // Product ↔ category links
    // ---------------------------------------------------------------

    /// Link a product to categories. Existing links and unknown ids are
    /// skipped; returns the number of links actually inserted.
    pub fn link_product_categories(&self, product_id: i64, category_ids: &[i64]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(LINK_SQL).map_err(db_err)?;
            for &category_id in category_ids {
                inserted += stmt.execute(params![product_id, category_id]).map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;
        Ok(inserted)
    }

    /// Link several products to one category, keeping existing links.
    pub fn add_products_to_category(&self, category_id: i64, product_ids: &[i64]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(LINK_SQL).map_err(db_err)?;
            for &product_id in product_ids {
                inserted += stmt.execute(params![product_id, category_id]).map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;
        Ok(inserted)
    }

    /// Make `product_ids` the exact product set of a category.
    pub fn replace_category_products(&self, category_id: i64, product_ids: &[i64]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        tx.execute(
            "DELETE FROM product_categories WHERE category_id = ?1",
            params![category_id],
        )
        .map_err(db_err)?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(LINK_SQL).map_err(db_err)?;
            for &product_id in product_ids {
                inserted += stmt.execute(params![product_id, category_id]).map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;
        Ok(inserted)
    }

    /// Categories linked to a product, ordered by name.
    pub fn categories_for_product(&self, product_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT c.id, c.name FROM categories c \
                 JOIN product_categories pc ON pc.category_id = c.id \
                 WHERE pc.product_id = ?1 ORDER BY c.name",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![product_id], |row| {
                Ok(Category::new(row.get(0)?, row.get::<_, String>(1)?))
            })
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    pub fn count_links(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM product_categories")
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    pub fn get_stats(&self) -> Result<StoreStats> {
        let total_products = self.count_products()?;
        let published_products =
            self.count("SELECT COUNT(*) FROM products WHERE publish_date IS NOT NULL")?;
        let total_categories = self.count_categories()?;
        let total_links = self.count_links()?;

        let db_size = std::fs::metadata(&self.db_path)
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(StoreStats {
            total_products,
            published_products,
            total_categories,
            total_links,
            db_path: self.db_path.to_string_lossy().to_string(),
            db_size_mb: db_size as f64 / (1024.0 * 1024.0),
        })
    }

    fn count(&self, sql: &str) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(sql, [], |row| row.get(0)).map_err(db_err)?;
        Ok(count)
    }

    fn image_or_placeholder(image_url: Option<&str>) -> &str {
        match image_url.map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_CATEGORY_IMAGE,
        }
    }

    // ---------------------------------------------------------------
    // Row Mapping Helpers
    // ---------------------------------------------------------------

    fn row_to_product(row: &rusqlite::Row<'_>) -> Product {
        Product {
            id: row.get("id").unwrap_or(0),
            name: row.get("name").unwrap_or_default(),
            slug: row.get("slug").unwrap_or_default(),
            description: row.get("description").unwrap_or_default(),
            sku: row.get("sku").unwrap_or_default(),
            price: row.get("price").ok().flatten(),
            image_url: row.get("image_url").ok().flatten(),
            publish_date: row.get("publish_date").ok().flatten(),
            created_at: row.get("created_at").unwrap_or_default(),
            updated_at: row.get("updated_at").ok().flatten(),
        }
    }

    fn row_to_summary(row: &rusqlite::Row<'_>) -> ProductSummary {
        ProductSummary {
            id: row.get("id").unwrap_or(0),
            name: row.get("name").unwrap_or_default(),
            sku: row.get("sku").unwrap_or_default(),
            price: row.get("price").ok().flatten(),
            image_url: row.get("image_url").ok().flatten(),
            publish_date: row.get("publish_date").ok().flatten(),
        }
    }

    fn row_to_category(row: &rusqlite::Row<'_>) -> CategoryRecord {
        CategoryRecord {
            id: row.get("id").unwrap_or(0),
            name: row.get("name").unwrap_or_default(),
            slug: row.get("slug").unwrap_or_default(),
            image_url: row.get("image_url").unwrap_or_default(),
            created_at: row.get("created_at").unwrap_or_default(),
            updated_at: row.get("updated_at").ok().flatten(),
            product_count: row.get("product_count").unwrap_or(0),
        }
    }
}
