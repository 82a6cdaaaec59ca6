//! All-pairs cosine similarity over feature vectors.
//!
//! The matrix is dense and row-major: `n * n` f64 values for `n` movies.
//! Rows are computed in parallel. Each row walks an inverted index
//! (column -> rows holding that column), so only pairs that share a term do
//! any work.

use crate::error::{IndexBuildError, Result};
use crate::vectorizer::FeatureVector;
use rayon::prelude::*;

/// Square, symmetric matrix of cosine similarities
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute cosine similarity between every pair of vectors.
    ///
    /// Dot products are exact integer sums and both norms enter the division
    /// as the same product, so `sim[i][j] == sim[j][i]` bit for bit. A zero
    /// vector has similarity 0 with everything, itself included.
    pub fn from_vectors(vectors: &[FeatureVector]) -> Result<Self> {
        let size = vectors.len();
        let dimension = vectors.first().map(FeatureVector::dimension).unwrap_or(0);

        if let Some((row, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.dimension() != dimension)
        {
            return Err(IndexBuildError::DimensionMismatch {
                row,
                expected: dimension,
                found: v.dimension(),
            });
        }

        // column -> [(row, count)]
        let mut postings: Vec<Vec<(u32, u32)>> = vec![Vec::new(); dimension];
        for (row, vector) in vectors.iter().enumerate() {
            for &(col, count) in vector.entries() {
                postings[col as usize].push((row as u32, count));
            }
        }

        let norms: Vec<f64> = vectors
            .iter()
            .map(|v| (v.norm_squared() as f64).sqrt())
            .collect();

        let mut values = vec![0.0f64; size * size];
        if size > 0 {
            values
                .par_chunks_mut(size)
                .enumerate()
                .for_each(|(i, out)| {
                    let mut dots = vec![0u64; size];
                    for &(col, count) in vectors[i].entries() {
                        for &(j, other) in &postings[col as usize] {
                            dots[j as usize] += count as u64 * other as u64;
                        }
                    }
                    for (j, dot) in dots.into_iter().enumerate() {
                        out[j] = cosine(dot, norms[i], norms[j]);
                    }
                });
        }

        Ok(Self { size, values })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Similarities of one row against every row, in row order
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.size {
            return None;
        }
        Some(&self.values[i * self.size..(i + 1) * self.size])
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.row(i).and_then(|row| row.get(j).copied())
    }
}

fn cosine(dot: u64, norm_a: f64, norm_b: f64) -> f64 {
    if dot == 0 || norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot as f64 / (norm_a * norm_b)).min(1.0)
}
