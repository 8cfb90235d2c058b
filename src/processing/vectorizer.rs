//! Sparse term-frequency vectors

use std::collections::{HashMap, HashSet};

/// Occurrence count of each token within one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequency {
    counts: HashMap<String, u32>,
}

impl TermFrequency {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = HashMap::new();
        for token in tokens {
            *counts.entry(token.into()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Count for `term`, zero when the document never mentions it
    pub fn count(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Dot product over the union of both vectors' terms
    pub fn dot(&self, other: &TermFrequency) -> f64 {
        let union: HashSet<&str> = self.terms().chain(other.terms()).collect();
        union
            .into_iter()
            .map(|term| f64::from(self.count(term)) * f64::from(other.count(term)))
            .sum()
    }

    /// Euclidean magnitude
    pub fn norm(&self) -> f64 {
        self.counts
            .values()
            .map(|&c| f64::from(c) * f64::from(c))
            .sum::<f64>()
            .sqrt()
    }
}
