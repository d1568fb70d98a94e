//! Classification pipeline: product text → matched categories → stored links.

use tracing::{debug, info};

use crate::matcher::match_rule;
use crate::normalizer::normalize;
use crate::product_text;
use freaky_core::{Category, Result};
use freaky_store::SqliteStore;

/// Links products to the categories their text matches.
pub struct AutoLinker<'a> {
    store: &'a SqliteStore,
}

impl<'a> AutoLinker<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Categories a product would be linked to, without writing anything.
    pub fn preview(&self, name: &str, description: &str) -> Result<Vec<Category>> {
        let categories = self.eligible_categories()?;
        let text = product_text(name, description);
        Ok(categories
            .into_iter()
            .filter(|category| match match_rule(&text, category) {
                Some(rule) => {
                    debug!("Category \"{}\" matched via {:?}", category.name, rule);
                    true
                }
                None => false,
            })
            .collect())
    }

    /// Classify a stored product and insert the missing links.
    /// Returns every matched category id, including already-linked ones.
    pub fn link_product(&self, product_id: i64, name: &str, description: &str) -> Result<Vec<i64>> {
        let matched: Vec<i64> = self
            .preview(name, description)?
            .into_iter()
            .map(|c| c.id)
            .collect();

        if matched.is_empty() {
            debug!("No categories matched product {}", product_id);
            return Ok(matched);
        }

        let inserted = self.store.link_product_categories(product_id, &matched)?;
        info!(
            "Linked product {} to {} categories ({} new)",
            product_id,
            matched.len(),
            inserted
        );
        Ok(matched)
    }

    /// Fresh category snapshot, minus names that normalize to nothing and
    /// would otherwise match every product.
    fn eligible_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.store.category_refs()?;
        categories.retain(|category| {
            let keep = !normalize(category.name.trim()).is_empty();
            if !keep {
                debug!("Skipping category {} with empty stem", category.id);
            }
            keep
        });
        Ok(categories)
    }
}
