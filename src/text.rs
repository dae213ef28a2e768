use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

const MIN_KEYWORD_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "in", "of", "to", "for", "with", "is", "are", "was", "be",
    "has", "that", "this", "from", "by", "on", "at", "as", "it", "its", "not",
];

static MIXED_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Ll}\p{Lu}").expect("mixed-case pattern is valid"));

pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Lower-cased, letter-only words of at least three characters with English
/// stop words removed.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|character| character.is_alphabetic())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`; 0 when either set is empty.
pub fn keyword_overlap(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(right).count();
    let union = left.len() + right.len() - intersection;
    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// True when a lower-case letter is immediately followed by an upper-case one
/// (`IoCore`, `heLlo`), the usual shape of a concatenated brand name.
pub fn has_mixed_case(text: &str) -> bool {
    MIXED_CASE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn extract_keywords_drops_stop_words_and_short_tokens() {
        let keywords =
            extract_keywords("The Energy Transformation and Heat Exchange System, v2 ok");
        assert_eq!(
            keywords,
            set(&["energy", "exchange", "heat", "system", "transformation"])
        );
    }

    #[test]
    fn extract_keywords_strips_punctuation_inside_words() {
        let keywords = extract_keywords("Real-time monitoring; (alerts)");
        assert!(keywords.contains("realtime"));
        assert!(keywords.contains("monitoring"));
        assert!(keywords.contains("alerts"));
    }

    #[test]
    fn keyword_overlap_boundary_values() {
        let full = set(&["energy", "heat", "exchange"]);
        assert_eq!(keyword_overlap(&full, &full.clone()), 1.0);
        assert_eq!(
            keyword_overlap(&set(&["alpha", "beta"]), &set(&["gamma", "delta"])),
            0.0
        );
        assert_eq!(keyword_overlap(&BTreeSet::new(), &full), 0.0);
        assert_eq!(keyword_overlap(&full, &BTreeSet::new()), 0.0);

        let left = set(&["energy", "heat", "storage"]);
        let right = set(&["energy", "heat", "monitoring"]);
        assert!((keyword_overlap(&left, &right) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn has_mixed_case_detects_internal_capitals_only() {
        assert!(has_mixed_case("IoCore"));
        assert!(has_mixed_case("heLlo"));
        assert!(has_mixed_case("Flux Battery CarbonX"));
        assert!(!has_mixed_case("ALLCAPS"));
        assert!(!has_mixed_case("alllower"));
        assert!(!has_mixed_case("Hello World"));
        assert!(!has_mixed_case("A"));
        assert!(!has_mixed_case(""));
    }

    #[test]
    fn normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("  Energy \t Storage\n"), "Energy Storage");
    }
}
