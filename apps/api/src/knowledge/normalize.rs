//! Tokenizer/Normalizer — turns free text into comparable tokens.
//!
//! Pure and deterministic: the same input always yields the same tokens, and
//! callers must treat an empty token list as "no match possible".

/// Curated stop-word list. Kept small on purpose — over-filtering starves
/// short queries of signal.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "about", "as", "at", "be", "but", "by", "can", "did", "do", "does",
    "for", "from", "had", "has", "have", "how", "i", "if", "in", "is", "it", "its", "me", "my",
    "of", "on", "or", "our", "so", "tell", "that", "the", "their", "them", "they", "this", "to",
    "us", "was", "we", "were", "what", "when", "where", "which", "who", "why", "will", "with",
    "you", "your",
];

/// Normalizes free text into an ordered token sequence.
///
/// Lower-cases, maps punctuation to whitespace, splits on whitespace, drops
/// stop words and single-character fragments (possessive leftovers like the
/// `s` in `empower's`).
pub fn normalize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| token.len() > 1 && !STOP_WORDS.contains(token))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits() {
        assert_eq!(
            normalize("Sovereign Feminine Leadership"),
            vec!["sovereign", "feminine", "leadership"]
        );
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(
            normalize("empowerment, mission; community!"),
            vec!["empowerment", "mission", "community"]
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  trust   \t yourself \n "), vec!["trust", "yourself"]);
    }

    #[test]
    fn test_removes_stop_words() {
        assert_eq!(
            normalize("what is the mission of this brand"),
            vec!["mission", "brand"]
        );
    }

    #[test]
    fn test_possessive_leftover_dropped() {
        // "empower's" splits into "empower" + "s"; the fragment is dropped
        assert_eq!(normalize("Just Empower's mission"), vec!["just", "empower", "mission"]);
    }

    #[test]
    fn test_empty_string_yields_no_tokens() {
        assert!(normalize("").is_empty());
    }

    #[test]
    fn test_punctuation_only_yields_no_tokens() {
        assert!(normalize("?!... --- ;;;").is_empty());
    }

    #[test]
    fn test_stop_words_only_yields_no_tokens() {
        assert!(normalize("what is it to you").is_empty());
    }

    #[test]
    fn test_numbers_are_kept() {
        assert_eq!(normalize("event on 2026"), vec!["event", "2026"]);
    }

    #[test]
    fn test_deterministic_for_repeated_calls() {
        let input = "Where can I find somatic restoration práctices?";
        assert_eq!(normalize(input), normalize(input));
    }
}
