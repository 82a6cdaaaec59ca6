//! Offline pipeline that turns tags blobs into a similarity index.
//!
//! This crate provides:
//! - Tokenizer trait and word/whitespace tokenizers
//! - CountVectorizer for capped bag-of-words term counts
//! - SimilarityMatrix for all-pairs cosine similarity
//! - SimilarityIndex tying the two together
//!
//! ## Architecture
//! The pipeline runs once at startup:
//! 1. Tokenize each document, drop stop words
//! 2. Keep the most frequent terms as the vocabulary
//! 3. Count vocabulary terms per document
//! 4. Compute cosine similarity between every pair of documents
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::SimilarityIndex;
//!
//! let index = SimilarityIndex::build(&catalog.tags())?;
//! let row = index.matrix().row(42).unwrap();
//! ```

pub mod error;
pub mod traits;
pub mod stop_words;
pub mod tokenizer;
pub mod vectorizer;
pub mod similarity;
pub mod index;

// Re-export main types
pub use error::{IndexBuildError, Result};
pub use traits::Tokenizer;
pub use stop_words::StopWords;
pub use tokenizer::{WhitespaceTokenizer, WordTokenizer};
pub use vectorizer::{CountVectorizer, DEFAULT_MAX_FEATURES, FeatureVector, Vocabulary};
pub use similarity::SimilarityMatrix;
pub use index::SimilarityIndex;
