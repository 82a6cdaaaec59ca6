//! # Movie Recommender
//!
//! Query side of the system. Holds the catalog and its similarity index,
//! both built once at startup and never mutated afterwards.
//!
//! A query:
//! 1. Looks the title up in the catalog's lowercase title index
//! 2. Reads the movie's similarity row
//! 3. Ranks every other movie by descending score (ties keep row order)
//! 4. Returns the first `top_n` titles

use std::cmp::Ordering;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, instrument};

use data_loader::{MovieCatalog, MovieId};
use pipeline::{CountVectorizer, DEFAULT_MAX_FEATURES, SimilarityIndex};

use crate::error::{InitError, RecommendError};

/// Number of recommendations returned when the caller does not ask
pub const DEFAULT_TOP_N: usize = 5;

/// Largest `top_n` the HTTP layer accepts, per request or as the configured default
pub const MAX_TOP_N: usize = 100;

/// One ranked result
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Catalog row of the recommended movie
    pub row: usize,
    pub movie_id: MovieId,
    pub title: String,
    /// Cosine similarity to the queried movie
    pub score: f64,
}

/// Content-based recommender over a fixed catalog
#[derive(Debug)]
pub struct MovieRecommender {
    catalog: MovieCatalog,
    index: SimilarityIndex,
}

impl MovieRecommender {
    /// Load the dataset from `data_dir` and build the similarity index
    pub fn load(data_dir: &Path) -> Result<Self, InitError> {
        Self::load_with(data_dir, DEFAULT_MAX_FEATURES)
    }

    /// [`MovieRecommender::load`] with a custom vocabulary cap
    #[instrument(skip_all, fields(data_dir = %data_dir.display()))]
    pub fn load_with(data_dir: &Path, max_features: usize) -> Result<Self, InitError> {
        let start = Instant::now();

        let catalog = MovieCatalog::load_from_files(data_dir)?;
        let recommender = Self::from_catalog_with(catalog, max_features)?;

        info!(
            "Recommender ready with {} movies in {:.2?}",
            recommender.len(),
            start.elapsed()
        );
        Ok(recommender)
    }

    /// Build the similarity index over an already loaded catalog
    pub fn from_catalog(catalog: MovieCatalog) -> Result<Self, InitError> {
        Self::from_catalog_with(catalog, DEFAULT_MAX_FEATURES)
    }

    pub fn from_catalog_with(catalog: MovieCatalog, max_features: usize) -> Result<Self, InitError> {
        let vectorizer = CountVectorizer::new().with_max_features(max_features);
        let index = SimilarityIndex::build_with(&vectorizer, &catalog.tags())?;
        Ok(Self { catalog, index })
    }

    pub fn catalog(&self) -> &MovieCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// Number of movies that can be queried
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Titles of the `top_n` movies most similar to `title`.
    ///
    /// Lookup is case-insensitive and exact. The queried movie never appears
    /// in its own results. Fewer than `top_n` titles come back only when the
    /// catalog has fewer than `top_n + 1` movies.
    pub fn recommend(&self, title: &str, top_n: usize) -> Result<Vec<String>, RecommendError> {
        Ok(self
            .recommend_scored(title, top_n)?
            .into_iter()
            .map(|rec| rec.title)
            .collect())
    }

    /// Same ranking as [`MovieRecommender::recommend`], keeping rows and scores
    #[instrument(skip(self))]
    pub fn recommend_scored(
        &self,
        title: &str,
        top_n: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let query_row = self.lookup(title)?;
        let scores = self.index.matrix().row(query_row).ok_or_else(|| {
            RecommendError::Internal(format!("Similarity row {} is missing", query_row))
        })?;

        // Stable sort: equal scores stay in row order
        let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .filter(|&(row, _)| row != query_row)
            .take(top_n)
            .filter_map(|(row, score)| {
                self.catalog.get(row).map(|movie| Recommendation {
                    row,
                    movie_id: movie.id,
                    title: movie.title.clone(),
                    score,
                })
            })
            .collect();

        debug!(
            "'{}' (row {}) -> {} recommendations",
            title,
            query_row,
            recommendations.len()
        );
        Ok(recommendations)
    }

    fn lookup(&self, title: &str) -> Result<usize, RecommendError> {
        if title.is_empty() {
            return Err(RecommendError::NotFound {
                title: String::new(),
            });
        }
        self.catalog
            .find_by_title(title)
            .ok_or_else(|| RecommendError::NotFound {
                title: title.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Movie;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn movie(
        id: MovieId,
        title: &str,
        overview: &str,
        genres: &[&str],
        keywords: &[&str],
        cast: &[&str],
        directors: &[&str],
    ) -> Movie {
        Movie::new(
            id,
            title,
            overview,
            names(genres),
            names(keywords),
            names(cast),
            names(directors),
        )
    }

    fn create_test_catalog() -> MovieCatalog {
        MovieCatalog::from_movies(vec![
            movie(
                27205,
                "Inception",
                "A thief enters dreams to plant an idea in a target's subconscious",
                &["Action", "Thriller", "Science Fiction"],
                &["dream", "subconscious", "heist"],
                &["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Ellen Page", "Tom Hardy"],
                &["Christopher Nolan"],
            ),
            movie(
                157336,
                "Interstellar",
                "A team of explorers travel through a wormhole in space",
                &["Adventure", "Drama", "Science Fiction"],
                &["space", "wormhole"],
                &["Matthew McConaughey", "Anne Hathaway", "Jessica Chastain"],
                &["Christopher Nolan"],
            ),
            movie(
                155,
                "The Dark Knight",
                "Batman faces the Joker in Gotham",
                &["Action", "Crime", "Drama"],
                &["superhero", "joker"],
                &["Christian Bale", "Heath Ledger", "Michael Caine"],
                &["Christopher Nolan"],
            ),
            movie(
                603,
                "The Matrix",
                "A hacker learns that reality is a simulation",
                &["Action", "Science Fiction"],
                &["simulation", "hacker", "dream"],
                &["Keanu Reeves", "Laurence Fishburne", "Carrie-Anne Moss"],
                &["Lana Wachowski", "Lilly Wachowski"],
            ),
            movie(
                11324,
                "Shutter Island",
                "A marshal investigates a disappearance on an island",
                &["Drama", "Thriller", "Mystery"],
                &["island", "asylum"],
                &["Leonardo DiCaprio", "Mark Ruffalo", "Ben Kingsley"],
                &["Martin Scorsese"],
            ),
            movie(
                862,
                "Toy Story",
                "Toys come to life when nobody is watching",
                &["Animation", "Comedy", "Family"],
                &["toy", "friendship"],
                &["Tom Hanks", "Tim Allen", "Don Rickles"],
                &["John Lasseter"],
            ),
            movie(
                11036,
                "The Notebook",
                "A poor young man falls for a rich young woman",
                &["Romance", "Drama"],
                &["love", "letter"],
                &["Ryan Gosling", "Rachel McAdams", "James Garner"],
                &["Nick Cassavetes"],
            ),
            movie(
                4977,
                "Paprika",
                "A device that lets therapists enter patients' dreams is stolen",
                &["Animation", "Science Fiction", "Thriller"],
                &["dream", "subconscious"],
                &["Megumi Hayashibara", "Toru Emori", "Katsunosuke Hori"],
                &["Satoshi Kon"],
            ),
        ])
    }

    fn create_test_recommender() -> MovieRecommender {
        MovieRecommender::from_catalog(create_test_catalog()).unwrap()
    }

    #[test]
    fn test_recommend_returns_top_n_most_similar() {
        let recommender = create_test_recommender();

        let titles = recommender.recommend("Inception", 5).unwrap();
        assert_eq!(
            titles,
            vec![
                "Paprika",
                "Interstellar",
                "The Matrix",
                "The Dark Knight",
                "Shutter Island"
            ]
        );
    }

    #[test]
    fn test_recommend_excludes_query_movie() {
        let recommender = create_test_recommender();

        for movie in recommender.catalog().movies() {
            let titles = recommender.recommend(&movie.title, 10).unwrap();
            assert!(!titles.contains(&movie.title));
            assert_eq!(titles.len(), recommender.len() - 1);
        }
    }

    #[test]
    fn test_recommend_scores_are_non_increasing() {
        let recommender = create_test_recommender();

        let recs = recommender.recommend_scored("Inception", 5).unwrap();
        assert_eq!(recs.len(), 5);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(recs[0].movie_id, 4977);
        assert_eq!(recs[0].row, 7);
    }

    #[test]
    fn test_recommend_ties_keep_row_order() {
        let recommender = create_test_recommender();

        // The Dark Knight (row 2) and Shutter Island (row 4) score the same
        let recs = recommender.recommend_scored("Inception", 7).unwrap();
        assert_eq!(recs[3].title, "The Dark Knight");
        assert_eq!(recs[4].title, "Shutter Island");
        assert_eq!(recs[3].score, recs[4].score);

        // Both zero-score movies follow, also in row order
        assert_eq!(recs[5].title, "Toy Story");
        assert_eq!(recs[6].title, "The Notebook");
        assert_eq!(recs[5].score, 0.0);
    }

    #[test]
    fn test_recommend_not_found() {
        let recommender = create_test_recommender();

        let err = recommender
            .recommend("Nonexistent Movie Title Xyz", 5)
            .unwrap_err();
        assert_eq!(
            err,
            RecommendError::NotFound {
                title: "Nonexistent Movie Title Xyz".to_string()
            }
        );
    }

    #[test]
    fn test_recommend_empty_title_is_not_found() {
        let recommender = create_test_recommender();
        assert!(matches!(
            recommender.recommend("", 5),
            Err(RecommendError::NotFound { .. })
        ));
    }

    #[test]
    fn test_recommend_is_case_insensitive() {
        let recommender = create_test_recommender();

        let expected = recommender.recommend("Inception", 5).unwrap();
        assert_eq!(recommender.recommend("inception", 5).unwrap(), expected);
        assert_eq!(recommender.recommend("INCEPTION", 5).unwrap(), expected);
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let recommender = create_test_recommender();

        let first = recommender.recommend_scored("The Matrix", 5).unwrap();
        let second = recommender.recommend_scored("The Matrix", 5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_recommend_top_n_larger_than_catalog() {
        let recommender = create_test_recommender();

        let titles = recommender.recommend("Toy Story", 100).unwrap();
        assert_eq!(titles.len(), recommender.len() - 1);
        assert_eq!(titles[0], "Paprika");
    }

    #[test]
    fn test_recommend_top_n_zero() {
        let recommender = create_test_recommender();
        assert!(recommender.recommend("Inception", 0).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_row() {
        let mut catalog = create_test_catalog();
        catalog.insert_movie(movie(
            1,
            "Inception",
            "A remake about something else entirely",
            &["Documentary"],
            &[],
            &[],
            &[],
        ));
        let recommender = MovieRecommender::from_catalog(catalog).unwrap();

        let recs = recommender.recommend_scored("Inception", 10).unwrap();
        assert_eq!(recs[0].title, "Paprika");
        // the second "Inception" is a different row, so it can be recommended
        assert!(recs.iter().any(|r| r.row == 8 && r.title == "Inception"));
        assert!(recs.iter().all(|r| r.row != 0));
    }

    #[test]
    fn test_movie_without_known_terms() {
        let mut catalog = create_test_catalog();
        catalog.insert_movie(movie(2, "Untitled", "", &[], &[], &[], &[]));
        let recommender = MovieRecommender::from_catalog(catalog).unwrap();

        let recs = recommender.recommend_scored("Untitled", 3).unwrap();
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Inception", "Interstellar", "The Dark Knight"]);
        assert!(recs.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_from_empty_catalog_fails() {
        let err = MovieRecommender::from_catalog(MovieCatalog::new()).unwrap_err();
        assert!(matches!(err, InitError::IndexBuild(_)));
    }

    #[test]
    fn test_load_from_missing_directory_fails() {
        let err = MovieRecommender::load(Path::new("/nonexistent/tmdb")).unwrap_err();
        assert!(matches!(err, InitError::DataLoad(_)));
    }
}
