//! Category matching over normalized product text.

use serde::{Deserialize, Serialize};

use freaky_core::Category;

use crate::normalizer::normalize;
use crate::tables::{
    accessory_stems, apparel_stems, contains_word, related_words, strategy_for, MatchStrategy,
    ACCESSORY_MARKER, APPAREL_MARKER,
};

/// Which check linked a category to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// The normalized category name occurs in the text.
    DirectName,
    /// One of the category's related words occurs in the text.
    Synonym,
    /// Accessories category and an accessory keyword occurs in the text.
    Accessory,
    /// Clothing category and a generic garment word occurs in the text.
    BroadApparel,
}

/// First rule that links `category` to `text`, or `None`.
///
/// `text` must already be word-normalized (see [`crate::normalize_text`]).
pub fn match_rule(text: &str, category: &Category) -> Option<MatchRule> {
    rule_for(&text.to_lowercase(), category)
}

/// All categories that apply to `text`, in input order.
///
/// Boolean and deterministic; an empty text or category list yields nothing
/// (except for categories whose normalized name is empty, which match any text).
pub fn match_categories<'a>(text: &str, categories: &'a [Category]) -> Vec<&'a Category> {
    let text = text.to_lowercase();
    categories
        .iter()
        .filter(|category| rule_for(&text, category).is_some())
        .collect()
}

fn rule_for(text: &str, category: &Category) -> Option<MatchRule> {
    let stem = normalize(&category.name);

    if text.contains(stem.as_str()) {
        return Some(MatchRule::DirectName);
    }

    let related = related_words(&category.name);
    let synonym_hit = match strategy_for(&stem) {
        MatchStrategy::StrictWord => related.iter().any(|w| contains_word(text, &normalize(w))),
        MatchStrategy::LooseSubstring => related.iter().any(|w| text.contains(&normalize(w))),
    };
    if synonym_hit {
        return Some(MatchRule::Synonym);
    }

    if stem.contains(ACCESSORY_MARKER)
        && accessory_stems().iter().any(|w| text.contains(w.as_str()))
    {
        return Some(MatchRule::Accessory);
    }

    if stem.contains(APPAREL_MARKER) && apparel_stems().iter().any(|w| text.contains(w.as_str()))
    {
        return Some(MatchRule::BroadApparel);
    }

    None
}
