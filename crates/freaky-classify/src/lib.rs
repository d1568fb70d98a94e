//! FreakyFashion Classify: automatic category assignment for products.
//!
//! Product name and description are normalized word by word with a small
//! Swedish suffix stemmer, then matched against every existing category
//! using the category name, a synonym table, and two keyword overrides
//! (accessories and broad clothing). Matching is boolean and deterministic.

pub mod linker;
pub mod matcher;
pub mod normalizer;
pub mod tables;

pub use linker::AutoLinker;
pub use matcher::{match_categories, match_rule, MatchRule};
pub use normalizer::{normalize, normalize_text, SuffixRule, SUFFIX_RULES};
pub use tables::MatchStrategy;

use freaky_core::Category;

/// Combined classifier input for a product.
pub fn product_text(name: &str, description: &str) -> String {
    normalize_text(&format!("{} {}", name, description))
}

/// Ids of the categories a product belongs to, in input order.
pub fn classify_product(name: &str, description: &str, categories: &[Category]) -> Vec<i64> {
    let text = product_text(name, description);
    let mut ids: Vec<i64> = Vec::new();
    for category in match_categories(&text, categories) {
        if !ids.contains(&category.id) {
            ids.push(category.id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_winter_jacket() {
        let cats = vec![
            Category::new(1, "Jackor"),
            Category::new(2, "Kläder"),
            Category::new(3, "Skor"),
        ];
        let ids = classify_product("Vinterjacka dam", "Varm jacka för kalla dagar", &cats);
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_classify_empty_description() {
        let cats = vec![Category::new(7, "Accessoarer"), Category::new(8, "Skor")];
        assert_eq!(classify_product("Randig mössa", "", &cats), vec![7]);
    }

    #[test]
    fn test_classify_duplicate_category_ids() {
        let cats = vec![Category::new(1, "Skor"), Category::new(1, "Skor")];
        assert_eq!(classify_product("Sneakers", "vita sneakers", &cats), vec![1]);
    }

    #[test]
    fn test_product_text() {
        assert_eq!(product_text("Blå Jeans", ""), "blå jeans");
        assert_eq!(product_text("", ""), "");
    }
}
