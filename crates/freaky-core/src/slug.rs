//! URL slugs for products and categories.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static INNER_HYPHEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9])-+([A-Za-z0-9])").unwrap());
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Turn a display name into a lowercase ASCII slug.
///
/// Diacritics are stripped ("Väskor" → "vaskor"), hyphens inside words are
/// dropped ("T-shirt" → "tshirt") and every other run of separators becomes
/// a single hyphen.
pub fn slugify(input: &str) -> String {
    let folded: String = input.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let joined = INNER_HYPHEN_RE.replace_all(&folded, "$1$2");
    let hyphenated = SEPARATOR_RE.replace_all(&joined, "-");
    hyphenated.trim_matches('-').to_lowercase()
}
