//! SimilarityIndex: vocabulary + cosine matrix built from a corpus.

use crate::error::Result;
use crate::similarity::SimilarityMatrix;
use crate::vectorizer::{CountVectorizer, DEFAULT_MAX_FEATURES, Vocabulary};
use std::time::Instant;
use tracing::{info, instrument};

/// Everything the query side needs from the offline pipeline
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    vocabulary: Vocabulary,
    matrix: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Vectorize with English stop words and a [`DEFAULT_MAX_FEATURES`] cap,
    /// then compute the similarity matrix.
    pub fn build(documents: &[&str]) -> Result<Self> {
        let vectorizer = CountVectorizer::new().with_max_features(DEFAULT_MAX_FEATURES);
        Self::build_with(&vectorizer, documents)
    }

    /// Build with a caller-configured vectorizer
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn build_with(vectorizer: &CountVectorizer, documents: &[&str]) -> Result<Self> {
        let start = Instant::now();

        let (vocabulary, vectors) = vectorizer.fit_transform(documents)?;
        let empty = vectors.iter().filter(|v| v.is_zero()).count();
        info!(
            "Vectorized {} documents over {} terms ({} with no known terms) in {:.2?}",
            vectors.len(),
            vocabulary.len(),
            empty,
            start.elapsed()
        );

        let matrix = SimilarityMatrix::from_vectors(&vectors)?;
        info!(
            "Built {}x{} similarity matrix in {:.2?}",
            matrix.size(),
            matrix.size(),
            start.elapsed()
        );

        Ok(Self { vocabulary, matrix })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.matrix.size()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }
}
