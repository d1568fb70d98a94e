//! Static matching tables: synonyms, accessory keywords, broad apparel words,
//! and the per-category matching strategy.
//!
//! Everything here is built once on first use and never mutated.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalizer::normalize;

/// Category stem fragment that marks the accessories category.
pub const ACCESSORY_MARKER: &str = "accessoar";

/// Category stem fragment that marks the broad clothing category.
pub const APPAREL_MARKER: &str = "kläd";

/// How a category's related words are matched against product text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// The related word must appear as a whole word.
    StrictWord,
    /// The related word may appear anywhere, e.g. inside a compound.
    LooseSubstring,
}

/// Category name → related surface words.
pub const SYNONYMS: &[(&str, &[&str])] = &[
    (
        "byxor",
        &["jeans", "leggings", "chinos", "kostymbyxor", "mjukisbyxor"],
    ),
    (
        "tröjor",
        &["hoodie", "sweatshirt", "t-shirt", "topp", "linne", "blus", "skjorta"],
    ),
    (
        "skor",
        &[
            "sneakers", "stövlar", "sandaler", "flip flops", "klackar", "klackskor", "pumps",
            "gympaskor",
        ],
    ),
    (
        "väskor",
        &["handväska", "ryggsäck", "axelväska", "kuvertväska"],
    ),
];

/// Words that always imply the accessories category.
pub const ACCESSORY_KEYWORDS: &[&str] = &[
    "halsduk", "mössa", "keps", "hatt", "handskar", "vantar", "klocka", "klockor", "armband",
    "örhänge", "örhängen", "glasögon", "solglasögon", "halsband", "ring", "ringar", "smycke",
    "smycken", "bälte", "sjal", "scarf",
];

/// Generic garment words that imply the broad clothing category.
pub const APPAREL_WORDS: &[&str] = &[
    "jacka", "jackor", "byxa", "byxor", "jeans", "klänning", "klänningar", "tröja", "tröjor",
    "kjol", "kjolar",
];

/// Category names whose related words must match as whole words.
const STRICT_CATEGORIES: &[&str] = &["byxor", "tröjor", "skor"];

static SYNONYM_MAP: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| SYNONYMS.iter().copied().collect());

/// Same table keyed by normalized category name.
static STEMMED_SYNONYM_MAP: Lazy<HashMap<String, &'static [&'static str]>> = Lazy::new(|| {
    SYNONYMS
        .iter()
        .map(|&(name, words)| (normalize(name), words))
        .collect()
});

/// Category stem → strategy. Stems not listed here match loosely.
static STRATEGIES: Lazy<HashMap<String, MatchStrategy>> = Lazy::new(|| {
    STRICT_CATEGORIES
        .iter()
        .map(|name| (normalize(name), MatchStrategy::StrictWord))
        .collect()
});

/// Whole-word patterns for every normalized synonym.
static WORD_PATTERNS: Lazy<HashMap<String, Regex>> = Lazy::new(|| {
    SYNONYMS
        .iter()
        .flat_map(|(_, words)| words.iter())
        .map(|word| normalize(word))
        .filter_map(|stem| {
            let pattern = format!(r"\b{}\b", regex::escape(&stem));
            Regex::new(&pattern).ok().map(|re| (stem, re))
        })
        .collect()
});

static ACCESSORY_STEMS: Lazy<Vec<String>> =
    Lazy::new(|| ACCESSORY_KEYWORDS.iter().map(|w| normalize(w)).collect());

static APPAREL_STEMS: Lazy<Vec<String>> =
    Lazy::new(|| APPAREL_WORDS.iter().map(|w| normalize(w)).collect());

/// Related words for a category: exact lowercase name first, then its stem.
pub fn related_words(category_name: &str) -> &'static [&'static str] {
    let lower = category_name.to_lowercase();
    if let Some(&words) = SYNONYM_MAP.get(lower.as_str()) {
        return words;
    }
    STEMMED_SYNONYM_MAP
        .get(&normalize(&lower))
        .copied()
        .unwrap_or(&[])
}

/// Matching strategy for a category stem.
pub fn strategy_for(category_stem: &str) -> MatchStrategy {
    STRATEGIES
        .get(category_stem)
        .copied()
        .unwrap_or(MatchStrategy::LooseSubstring)
}

/// Whether `stem` occurs in `text` bounded by non-word characters.
pub fn contains_word(text: &str, stem: &str) -> bool {
    match WORD_PATTERNS.get(stem) {
        Some(re) => re.is_match(text),
        None => Regex::new(&format!(r"\b{}\b", regex::escape(stem)))
            .map(|re| re.is_match(text))
            .unwrap_or(false),
    }
}

pub fn accessory_stems() -> &'static [String] {
    &ACCESSORY_STEMS
}

pub fn apparel_stems() -> &'static [String] {
    &APPAREL_STEMS
}
