//! Swedish suffix-stripping normalizer.
//!
//! A lossy heuristic stemmer used only as a matching key: product words and
//! category names are reduced to a shared stem ("jackor", "jacka", "jackan"
//! all become "jack"). Over-stripping is accepted.

/// One inflection rule: strip `suffix`, append `replacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixRule {
    pub suffix: &'static str,
    pub replacement: &'static str,
    /// Minimum word length in characters for the rule to apply.
    pub min_len: usize,
}

const fn rule(suffix: &'static str, min_len: usize) -> SuffixRule {
    SuffixRule {
        suffix,
        replacement: "",
        min_len,
    }
}

/// Ordered rule table. The first applicable rule wins; rules never chain.
pub const SUFFIX_RULES: &[SuffixRule] = &[
    // plural -or, guarded so "skor" survives
    rule("or", 5),
    // plural -ar: klänningar -> klänning
    rule("ar", 0),
    // -er: tröjer -> tröj
    rule("er", 0),
    // definite singular -a: jacka -> jack
    rule("a", 0),
    // definite -an: jackan -> jack
    rule("an", 0),
    // definite -en: hatten -> hatt
    rule("en", 0),
    // definite plural -na (shadowed by -a)
    rule("na", 0),
];

impl SuffixRule {
    /// Apply this rule to an already lower-cased word, if it matches.
    pub fn apply(&self, word: &str) -> Option<String> {
        if word.chars().count() < self.min_len {
            return None;
        }
        word.strip_suffix(self.suffix)
            .map(|stem| format!("{}{}", stem, self.replacement))
    }
}

/// Normalize a single word to its matching stem.
///
/// Total over all inputs: empty strings and non-letters pass through.
pub fn normalize(word: &str) -> String {
    let word = word.to_lowercase();
    SUFFIX_RULES
        .iter()
        .find_map(|rule| rule.apply(&word))
        .unwrap_or(word)
}

/// Normalize every whitespace-separated word and rejoin with single spaces.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(normalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize("skor"), "skor");
        assert_eq!(normalize("klänningar"), "klänning");
        assert_eq!(normalize("jackan"), "jack");
        assert_eq!(normalize("hatten"), "hatt");
        assert_eq!(normalize("jackor"), "jack");
        assert_eq!(normalize("jacka"), "jack");
        assert_eq!(normalize("kläder"), "kläd");
    }

    #[test]
    fn test_or_guard_counts_characters() {
        // "höor" is 4 chars but 5 bytes
        assert_eq!(normalize("höor"), "höor");
        assert_eq!(normalize("byxor"), "byx");
    }

    #[test]
    fn test_rules_do_not_chain() {
        // -ar wins, leaving a trailing "a" untouched
        assert_eq!(normalize("kalar"), "kal");
        // -a wins over -na
        assert_eq!(normalize("klänningarna"), "klänningarn");
        // -or wins, the remaining "-er"-like tail is kept
        assert_eq!(normalize("tröjor"), "tröj");
    }

    #[test]
    fn test_each_rule_in_isolation() {
        let cases = [
            ("jackor", "jack"),
            ("dagar", "dag"),
            ("tröjer", "tröj"),
            ("kalla", "kall"),
            ("jackan", "jack"),
            ("hatten", "hatt"),
        ];
        for (rule, (word, expected)) in SUFFIX_RULES.iter().zip(cases) {
            assert_eq!(rule.apply(word).as_deref(), Some(expected), "{}", rule.suffix);
        }
        assert_eq!(SUFFIX_RULES[6].apply("klänningarna").as_deref(), Some("klänningar"));
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize("Jackor"), "jack");
        assert_eq!(normalize("SKOR"), "skor");
    }

    #[test]
    fn test_normalize_total() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("123"), "123");
        assert_eq!(normalize("!?"), "!?");
        assert_eq!(normalize("a"), "");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text("Vinterjacka dam  Varm jacka\tför kalla dagar"),
            "vinterjack dam varm jack för kall dag"
        );
        assert_eq!(normalize_text("   "), "");
    }
}
