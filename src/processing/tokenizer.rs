//! Text normalization into index terms

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Tokens of this many bytes or fewer are discarded
const MIN_TOKEN_LEN: usize = 2;

/// Lowercases, strips punctuation and drops short words and stop words.
///
/// Only ASCII word characters (`[A-Za-z0-9_]`) survive; every other
/// non-whitespace character is removed before splitting, so `"c++"` becomes
/// `"c"` and `"node.js"` becomes `"nodejs"`.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<&'static str>,
    strip_regex: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        let strip_regex = Regex::new(r"[^0-9A-Za-z_\s]").expect("Invalid strip regex");

        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            strip_regex,
        }
    }

    /// Shared tokenizer built on first use
    pub fn shared() -> &'static Tokenizer {
        static TOKENIZER: OnceLock<Tokenizer> = OnceLock::new();
        TOKENIZER.get_or_init(Tokenizer::new)
    }

    /// Normalize `text` into an ordered sequence of tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let stripped = self.strip_regex.replace_all(&lowered, "");

        stripped
            .split_whitespace()
            .filter(|token| token.len() > MIN_TOKEN_LEN && !self.is_stop_word(token))
            .map(str::to_string)
            .collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }
}

/// Tokenize with the shared tokenizer
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::shared().tokenize(text)
}

/// English function words plus job-posting filler that carries no signal
/// when comparing a résumé against a posting.
const STOP_WORDS: &[&str] = &[
    // Function words
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had",
    "her", "was", "one", "our", "out", "has", "have", "his", "how", "its", "may",
    "new", "now", "old", "see", "two", "who", "did", "get", "him", "let", "put",
    "say", "she", "too", "use", "with", "from", "this", "that", "they", "them",
    "then", "than", "their", "there", "these", "those", "what", "when", "where",
    "which", "while", "will", "would", "could", "should", "shall", "into", "onto",
    "over", "under", "about", "above", "after", "again", "also", "been", "being",
    "both", "each", "few", "more", "most", "other", "some", "such", "only", "own",
    "same", "very", "just", "your", "yours", "were", "here", "does", "doing",
    "done", "because", "until", "between", "through", "during", "before",
    "within", "without", "across", "against", "among", "upon", "via", "per",
    "etc", "able", "well", "must", "like", "yet", "nor", "why",
    // Job-posting and résumé filler
    "looking", "seeking", "join", "experience", "experienced", "experiences",
    "skills", "skill", "skilled", "years", "year", "required", "requirements",
    "require", "requires", "preferred", "plus", "ability", "strong", "knowledge",
    "responsibilities", "responsible", "including", "include", "includes",
    "candidate", "candidates", "role", "position", "opportunity", "ideal",
    "proven", "demonstrated", "excellent", "good", "great", "using", "work",
    "working", "worked",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenization() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Rust programming language is awesome!");

        assert_eq!(tokens, vec!["rust", "programming", "language", "awesome"]);
    }

    #[test]
    fn test_short_and_stop_words_removed() {
        let tokens = tokenize("I am a Go dev with the AWS and GCP stack");

        // "go", "am", "a", "i" are too short; "with", "the", "and" are stop words
        assert_eq!(tokens, vec!["dev", "aws", "gcp", "stack"]);
    }

    #[test]
    fn test_punctuation_stripped_not_split() {
        let tokens = tokenize("Node.js, C++ and e-mail: (REST)");

        assert_eq!(tokens, vec!["nodejs", "email", "rest"]);
    }

    #[test]
    fn test_non_ascii_letters_stripped() {
        let tokens = tokenize("café résumé naïve");

        assert_eq!(tokens, vec!["caf", "rsum", "nave"]);
    }

    #[test]
    fn test_empty_and_symbolic_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t  ").is_empty());
        assert!(tokenize("!!! ??? ... ---").is_empty());
        assert!(tokenize("the and with for").is_empty());
    }

    #[test]
    fn test_order_and_repeats_preserved() {
        let tokens = tokenize("python rust python");
        assert_eq!(tokens, vec!["python", "rust", "python"]);
    }

    #[test]
    fn test_underscore_and_digits_kept() {
        let tokens = tokenize("snake_case ES2015 100%");
        assert_eq!(tokens, vec!["snake_case", "es2015", "100"]);
    }

    #[test]
    fn test_stop_words_are_lowercase() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.stop_word_count() > 50);
        for word in STOP_WORDS {
            assert_eq!(*word, word.to_lowercase());
        }
    }
}
