//! Benchmarks for the offline similarity build
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic corpus shaped like TMDB tags (overview words plus a few
//! genre/keyword/cast tokens per document).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::{CountVectorizer, SimilarityIndex, SimilarityMatrix, DEFAULT_MAX_FEATURES};

const WORDS: &[&str] = &[
    "dream", "heist", "thief", "space", "robot", "love", "war", "detective", "murder", "city",
    "alien", "planet", "family", "journey", "king", "kingdom", "ship", "ocean", "island", "ghost",
    "vampire", "zombie", "school", "friendship", "revenge", "prison", "escape", "spy", "agent",
    "mission", "dragon", "wizard", "magic", "forest", "desert", "cowboy", "sheriff", "bank",
    "robbery", "virus", "doctor", "hospital", "court", "lawyer", "president", "army", "soldier",
];

fn synthetic_corpus(documents: usize) -> Vec<String> {
    // deterministic LCG so runs are comparable
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..documents)
        .map(|i| {
            let mut doc = Vec::with_capacity(40);
            for _ in 0..40 {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                doc.push(WORDS[(state >> 33) as usize % WORDS.len()].to_string());
            }
            doc.push(format!("castmember{}", i % 700));
            doc.push(format!("director{}", i % 300));
            doc.join(" ")
        })
        .collect()
}

fn bench_fit_transform(c: &mut Criterion) {
    let corpus = synthetic_corpus(5000);
    let docs: Vec<&str> = corpus.iter().map(String::as_str).collect();
    let vectorizer = CountVectorizer::new().with_max_features(DEFAULT_MAX_FEATURES);

    c.bench_function("count_vectorizer_fit_transform_5000", |b| {
        b.iter(|| {
            let result = vectorizer.fit_transform(black_box(&docs)).unwrap();
            black_box(result)
        })
    });
}

fn bench_similarity_matrix(c: &mut Criterion) {
    let corpus = synthetic_corpus(2000);
    let docs: Vec<&str> = corpus.iter().map(String::as_str).collect();
    let (_, vectors) = CountVectorizer::new().fit_transform(&docs).unwrap();

    c.bench_function("similarity_matrix_2000", |b| {
        b.iter(|| {
            let matrix = SimilarityMatrix::from_vectors(black_box(&vectors)).unwrap();
            black_box(matrix)
        })
    });
}

fn bench_full_index(c: &mut Criterion) {
    let corpus = synthetic_corpus(2000);
    let docs: Vec<&str> = corpus.iter().map(String::as_str).collect();

    c.bench_function("similarity_index_build_2000", |b| {
        b.iter(|| {
            let index = SimilarityIndex::build(black_box(&docs)).unwrap();
            black_box(index)
        })
    });
}

criterion_group!(
    benches,
    bench_fit_transform,
    bench_similarity_matrix,
    bench_full_index
);
criterion_main!(benches);
