//! Cosine similarity between two documents

use crate::processing::tokenizer::tokenize;
use crate::processing::vectorizer::TermFrequency;
use log::debug;

/// Cosine similarity of raw term-frequency vectors, scaled to 0-100.
///
/// No IDF weighting is applied. Returns 0 when either side has no tokens
/// or the vectors share no terms.
pub fn cosine_similarity(text_a: &str, text_b: &str) -> f64 {
    score_tokens(&tokenize(text_a), &tokenize(text_b))
}

fn score_tokens(tokens_a: &[String], tokens_b: &[String]) -> f64 {
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let tf_a = TermFrequency::from_tokens(tokens_a.iter().cloned());
    let tf_b = TermFrequency::from_tokens(tokens_b.iter().cloned());

    let magnitude = tf_a.norm() * tf_b.norm();
    if magnitude == 0.0 {
        return 0.0;
    }

    let score = (tf_a.dot(&tf_b) / magnitude) * 100.0;
    debug!(
        "cosine similarity {:.2} ({} vs {} tokens, {} vs {} terms)",
        score,
        tokens_a.len(),
        tokens_b.len(),
        tf_a.len(),
        tf_b.len()
    );

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_self_similarity_is_maximal() {
        for text in [
            "Rust programming language",
            "Senior Python developer building data pipelines on AWS",
            "kubernetes kubernetes docker",
        ] {
            assert!((cosine_similarity(text, text) - 100.0).abs() < EPS, "{}", text);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("Python developer with Django", "Django and Flask engineer"),
            ("react typescript frontend", "frontend react react"),
            ("", "anything here"),
        ];
        for (a, b) in pairs {
            assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));
        }
    }

    #[test]
    fn test_empty_side_scores_zero() {
        assert_eq!(cosine_similarity("", "Senior Engineer"), 0.0);
        assert_eq!(cosine_similarity("Senior Engineer", ""), 0.0);
        assert_eq!(cosine_similarity("", ""), 0.0);
        // Stop words only
        assert_eq!(cosine_similarity("the and with", "Senior Engineer"), 0.0);
    }

    #[test]
    fn test_disjoint_vocabularies_score_zero() {
        assert_eq!(cosine_similarity("gardening tomatoes", "kubernetes docker"), 0.0);
    }

    #[test]
    fn test_known_value() {
        // tokens: [python, rust] vs [python]; cos = 1 / sqrt(2)
        let score = cosine_similarity("python rust", "python");
        assert!((score - 100.0 / 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_bounded() {
        let score = cosine_similarity(
            "python python python aws",
            "python aws aws aws docker",
        );
        assert!(score > 0.0 && score < 100.0);
    }
}
