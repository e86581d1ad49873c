use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Suffixes accepted when matching an inflected variant of a target word.
const VARIANT_SUFFIXES: &[&str] = &[
    "s", "es", "ed", "ing", "er", "est", "ly", "tion", "sion", "ness", "ment",
];

/// Words too basic to be worth tracking as learner vocabulary.
const SIMPLE_WORDS: &[&str] = &[
    "i", "me", "my", "you", "your", "he", "him", "his", "she", "her", "it", "its", "we",
    "us", "our", "they", "them", "their", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "do", "does", "did", "will", "would", "could", "should",
    "may", "might", "can", "must", "shall", "the", "and", "or", "but", "so", "if", "as",
    "at", "by", "for", "from", "in", "into", "of", "on", "to", "with", "about", "after",
    "before", "during", "until", "while", "this", "that", "these", "those", "here", "there",
    "when", "where", "why", "how", "what", "who", "which", "whom", "whose", "all", "any",
    "each", "every", "no", "none", "some", "such", "own", "other", "one", "two", "three",
    "first", "last", "next", "new", "old", "good", "bad", "big", "small", "long", "short",
    "high", "low", "right", "left", "up", "down", "yes", "not", "now", "then", "today",
    "very", "too", "just", "only", "also", "even", "still", "already", "yet", "again",
    "more", "most", "much", "many", "little", "few", "less", "get", "go", "come", "take",
    "make", "see", "know", "think", "say", "tell", "ask", "give", "put", "keep", "let",
    "help", "find", "show", "use", "work", "play", "live", "feel", "look", "seem",
];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z0-9_']+").unwrap_or_else(|_| unreachable!()))
}

/// Whether `text` contains any character in the CJK Unified Ideographs
/// range (U+4E00–U+9FFF). Such tokens are never tracked.
pub fn has_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4E00}'..='\u{9FFF}').contains(&c))
}

/// Finds the first token of `haystack` that reads as an inflected variant
/// of `target`: an exact case-insensitive match, a known or short (≤ 3
/// chars) suffix on the target stem, a doubled final consonant
/// ("big" → "biggest"), or a y→i inflection ("happy" → "happier").
///
/// Returns the matched token, or `None` when the word did not occur.
pub fn find_variant(target: &str, haystack: &str) -> Option<String> {
    let target = target.trim().to_lowercase();
    if target.is_empty() {
        return None;
    }

    for m in word_pattern().find_iter(haystack) {
        let token = m.as_str().to_lowercase();

        if token == target {
            return Some(token);
        }

        if token.len() > target.len() {
            if let Some(suffix) = token.strip_prefix(target.as_str()) {
                if suffix.chars().all(char::is_alphabetic)
                    && (VARIANT_SUFFIXES.contains(&suffix) || suffix.len() <= 3)
                {
                    return Some(token);
                }
            }

            // Doubled final consonant: "run" -> "running", "big" -> "biggest".
            if let Some(last) = target.chars().last() {
                if last.is_ascii_alphabetic() && token.starts_with(&format!("{target}{last}")) {
                    return Some(token);
                }
            }

            // y -> i inflection: "happy" -> "happier", "easy" -> "easiest".
            if let Some(stem) = target.strip_suffix('y') {
                if !stem.is_empty() && token.starts_with(&format!("{stem}i")) {
                    return Some(token);
                }
            }
        }
    }

    None
}

/// Extracts the meaningful words of `text`: lower-cased tokens longer
/// than two characters that are not on the simple-word list. The ordered
/// set gives callers a stable iteration order.
pub fn extract_words(text: &str) -> BTreeSet<String> {
    word_pattern()
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|word| word.len() > 2 && !SIMPLE_WORDS.contains(&word.as_str()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_has_cjk() {
        assert!(!has_cjk("hello"));
        assert!(has_cjk("你好"));
        assert!(has_cjk("hello你好"));
        assert!(!has_cjk(""));
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(
            find_variant("cat", "I saw a cat outside"),
            Some("cat".to_string())
        );
        assert_eq!(
            find_variant("Cat", "the CAT sat"),
            Some("cat".to_string())
        );
    }

    #[test]
    fn test_suffix_variants() {
        assert_eq!(
            find_variant("cat", "two cats were playing"),
            Some("cats".to_string())
        );
        assert_eq!(
            find_variant("walk", "she was walking home"),
            Some("walking".to_string())
        );
        assert_eq!(
            find_variant("quick", "he ran quickly"),
            Some("quickly".to_string())
        );
    }

    #[test]
    fn test_doubled_consonant_variant() {
        assert_eq!(
            find_variant("big", "the biggest house on the street"),
            Some("biggest".to_string())
        );
        assert_eq!(
            find_variant("run", "running every morning"),
            Some("running".to_string())
        );
    }

    #[test]
    fn test_y_to_i_variant() {
        assert_eq!(
            find_variant("happy", "she seemed happier today"),
            Some("happier".to_string())
        );
        assert_eq!(
            find_variant("easy", "the easiest question"),
            Some("easiest".to_string())
        );
    }

    #[test]
    fn test_no_variant_found() {
        assert_eq!(find_variant("dog", "I saw a cat outside"), None);
        assert_eq!(find_variant("", "anything"), None);
        // Suffix too long to be an inflection.
        assert_eq!(find_variant("cat", "a catastrophe happened"), None);
    }

    #[test]
    fn test_extract_words_filters_simple() {
        let words = extract_words("I think the weather is beautiful today");
        assert!(words.contains("weather"));
        assert!(words.contains("beautiful"));
        assert!(!words.contains("the"));
        assert!(!words.contains("is"));
        // "think" is on the simple list.
        assert!(!words.contains("think"));
    }

    #[test]
    fn test_extract_words_drops_short_tokens() {
        let words = extract_words("an ox ran far");
        assert!(!words.contains("ox"));
        assert!(!words.contains("an"));
        assert!(words.contains("ran"));
    }
}
