//! Bag-of-words term counting.
//!
//! `CountVectorizer` learns a capped vocabulary over a corpus and turns each
//! document into a sparse term-count vector over that vocabulary.
//!
//! ## Vocabulary selection
//! 1. Tokenize every document and drop stop words
//! 2. Sum each term's count over the whole corpus
//! 3. Keep the `max_features` most frequent terms (ties broken alphabetically)
//! 4. Assign columns in alphabetical order of the kept terms

use crate::error::{IndexBuildError, Result};
use crate::stop_words::StopWords;
use crate::tokenizer::WordTokenizer;
use crate::traits::Tokenizer;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Vocabulary cap used by the recommender
pub const DEFAULT_MAX_FEATURES: usize = 5000;

// =============================================================================
// Vocabulary
// =============================================================================

/// Term -> column mapping shared read-only by every feature vector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    /// Terms in column order
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn from_sorted_terms(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(col, term)| (term.clone(), col))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column of a term, if it made it into the vocabulary
    pub fn column(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term stored at a column
    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    /// All terms in column order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

// =============================================================================
// FeatureVector
// =============================================================================

/// Sparse term-count vector with a fixed logical dimension.
///
/// `entries` holds `(column, count)` pairs sorted by column with no zero
/// counts, so two vectors over the same vocabulary can be merged linearly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(u32, u32)>,
}

impl FeatureVector {
    /// Build a vector from column counts; zero counts are dropped.
    ///
    /// Columns at or past `dimension` are ignored.
    pub fn from_counts(dimension: usize, counts: impl IntoIterator<Item = (usize, u32)>) -> Self {
        let mut merged: HashMap<u32, u32> = HashMap::new();
        for (col, count) in counts {
            if col < dimension && count > 0 {
                *merged.entry(col as u32).or_insert(0) += count;
            }
        }
        let mut entries: Vec<(u32, u32)> = merged.into_iter().collect();
        entries.sort_unstable_by_key(|&(col, _)| col);
        Self { dimension, entries }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Non-zero `(column, count)` pairs in column order
    pub fn entries(&self) -> &[(u32, u32)] {
        &self.entries
    }

    /// Count at a column (0 when absent)
    pub fn get(&self, column: usize) -> u32 {
        self.entries
            .binary_search_by_key(&(column as u32), |&(col, _)| col)
            .map(|i| self.entries[i].1)
            .unwrap_or(0)
    }

    /// True when no vocabulary term occurs in the document
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact dot product of two sparse vectors
    pub fn dot(&self, other: &FeatureVector) -> u64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0u64;
        while i < self.entries.len() && j < other.entries.len() {
            let (ca, va) = self.entries[i];
            let (cb, vb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += va as u64 * vb as u64;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm_squared(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| c as u64 * c as u64).sum()
    }

    /// Fixed-length dense form (length = vocabulary size)
    pub fn to_dense(&self) -> Vec<u32> {
        let mut dense = vec![0; self.dimension];
        for &(col, count) in &self.entries {
            dense[col as usize] = count;
        }
        dense
    }
}

// =============================================================================
// CountVectorizer
// =============================================================================

/// Term-count vectorizer with a capped vocabulary and stop-word removal.
///
/// ## Usage
/// ```ignore
/// let vectorizer = CountVectorizer::new().with_max_features(5000);
/// let (vocabulary, vectors) = vectorizer.fit_transform(&tags)?;
/// ```
pub struct CountVectorizer {
    tokenizer: Box<dyn Tokenizer>,
    stop_words: StopWords,
    max_features: Option<usize>,
}

impl CountVectorizer {
    /// Word tokenizer, English stop words, no vocabulary cap
    pub fn new() -> Self {
        Self {
            tokenizer: Box::new(WordTokenizer),
            stop_words: StopWords::English,
            max_features: None,
        }
    }

    /// Keep only the `max_features` most frequent terms
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Tokenize one document and drop stop words
    fn analyze(&self, document: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(document)
            .into_iter()
            .filter(|term| !self.stop_words.contains(term))
            .collect()
    }

    /// Learn the vocabulary of a corpus
    pub fn fit(&self, documents: &[&str]) -> Result<Vocabulary> {
        let analyzed: Vec<Vec<String>> = documents.par_iter().map(|d| self.analyze(d)).collect();
        self.build_vocabulary(&analyzed)
    }

    /// Count vocabulary terms in each document
    pub fn transform(&self, vocabulary: &Vocabulary, documents: &[&str]) -> Vec<FeatureVector> {
        documents
            .par_iter()
            .map(|d| count_terms(vocabulary, &self.analyze(d)))
            .collect()
    }

    /// `fit` then `transform`, tokenizing each document once
    pub fn fit_transform(&self, documents: &[&str]) -> Result<(Vocabulary, Vec<FeatureVector>)> {
        let analyzed: Vec<Vec<String>> = documents.par_iter().map(|d| self.analyze(d)).collect();
        let vocabulary = self.build_vocabulary(&analyzed)?;
        let vectors = analyzed
            .par_iter()
            .map(|terms| count_terms(&vocabulary, terms))
            .collect();
        Ok((vocabulary, vectors))
    }

    fn build_vocabulary(&self, analyzed: &[Vec<String>]) -> Result<Vocabulary> {
        let mut frequencies: HashMap<&str, u64> = HashMap::new();
        for terms in analyzed {
            for term in terms {
                *frequencies.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if frequencies.is_empty() {
            return Err(IndexBuildError::EmptyVocabulary {
                documents: analyzed.len(),
            });
        }

        let distinct = frequencies.len();
        let mut ranked: Vec<(&str, u64)> = frequencies.into_iter().collect();
        if let Some(limit) = self.max_features {
            if limit < ranked.len() {
                ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                ranked.truncate(limit);
            }
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        terms.sort_unstable();

        debug!(
            "Vocabulary: kept {} of {} distinct terms (tokenizer: {})",
            terms.len(),
            distinct,
            self.tokenizer.name()
        );
        Ok(Vocabulary::from_sorted_terms(terms))
    }
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

fn count_terms(vocabulary: &Vocabulary, terms: &[String]) -> FeatureVector {
    FeatureVector::from_counts(
        vocabulary.len(),
        terms
            .iter()
            .filter_map(|term| vocabulary.column(term))
            .map(|col| (col, 1)),
    )
}
