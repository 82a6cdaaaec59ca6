//! Core traits for the vectorization pipeline.
//!
//! This module defines the Tokenizer trait so the CountVectorizer can be
//! configured with different term extraction rules.

/// Splits a document into terms.
///
/// ## Design Note
/// - `Send + Sync` lets the vectorizer tokenize documents in parallel
/// - Terms are returned owned and already normalized (lowercased); stop-word
///   removal happens afterwards in the vectorizer
pub trait Tokenizer: Send + Sync {
    /// Returns the name of this tokenizer (for logging/debugging)
    fn name(&self) -> &str;

    /// Split `text` into normalized terms, in document order
    fn tokenize(&self, text: &str) -> Vec<String>;
}
