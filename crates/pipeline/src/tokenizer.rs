//! Word tokenizers for tags blobs.

use crate::traits::Tokenizer;
use regex::Regex;
use std::sync::LazyLock;

/// Two or more word characters between word boundaries
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("word pattern is valid"));

/// Default tokenizer: lowercase, then keep runs of two or more Unicode word
/// characters. Punctuation splits terms and single characters are dropped,
/// so `"Gordon-Levitt's"` becomes `["gordon", "levitt"]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn name(&self) -> &str {
        "word"
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Lowercased whitespace split, keeping every token as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokenizer_drops_short_tokens_and_punctuation() {
        let tokens = WordTokenizer.tokenize("Cobb, a skilled thief -- Gordon-Levitt's 3D film!");
        assert_eq!(
            tokens,
            vec!["cobb", "skilled", "thief", "gordon", "levitt", "3d", "film"]
        );
    }

    #[test]
    fn test_word_tokenizer_handles_unicode() {
        let tokens = WordTokenizer.tokenize("Amélie Poulain À Paris");
        assert_eq!(tokens, vec!["amélie", "poulain", "paris"]);
    }

    #[test]
    fn test_whitespace_tokenizer() {
        let tokens = WhitespaceTokenizer.tokenize("  A  b-C\td ");
        assert_eq!(tokens, vec!["a", "b-c", "d"]);
    }
}
