//! # Data Loader Crate
//!
//! This crate handles loading the TMDB 5000 movies + credits tables and
//! turning them into an ordered catalog of tagged movies.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, MovieCatalog, raw CSV rows)
//! - **parser**: Parse the CSV files and the JSON list cells inside them
//! - **index**: Merge the two tables and build the catalog
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::MovieCatalog;
//! use std::path::Path;
//!
//! let catalog = MovieCatalog::load_from_files(Path::new("data/tmdb"))?;
//!
//! let row = catalog.find_by_title("inception").unwrap();
//! let movie = catalog.get(row).unwrap();
//! println!("{} -> {}", movie.title, movie.tags);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, FeatureExtractionError, Result};
pub use index::{MergeStats, merge};
pub use parser::{CREDITS_FILE, MOVIES_FILE};
pub use types::{
    // Type aliases & constants
    MovieId,
    MAX_CAST,
    DIRECTOR_JOB,
    // Core types
    Movie,
    MovieCatalog,
    MovieRow,
    CreditRow,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str) -> Movie {
        Movie::new(
            id,
            title,
            "A thief steals secrets",
            vec!["Action".to_string()],
            vec!["dream".to_string()],
            vec!["Leonardo DiCaprio".to_string()],
            vec!["Christopher Nolan".to_string()],
        )
    }

    #[test]
    fn test_catalog_creation() {
        let catalog = MovieCatalog::new();
        assert_eq!(catalog.len(), 0);
        assert!(catalog.is_empty());
        assert!(catalog.tags().is_empty());
    }

    #[test]
    fn test_insert_movie() {
        let mut catalog = MovieCatalog::new();

        let row = catalog.insert_movie(movie(27205, "Inception"));
        assert_eq!(row, 0);

        let retrieved = catalog.get(0).unwrap();
        assert_eq!(retrieved.id, 27205);
        assert_eq!(retrieved.title_lower, "inception");
        assert_eq!(
            retrieved.tags,
            "a thief steals secrets action dream leonardo dicaprio christopher nolan"
        );
    }

    #[test]
    fn test_movie_new_caps_cast() {
        let m = Movie::new(
            1,
            "Ensemble",
            "",
            vec![],
            vec![],
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec![],
        );
        assert_eq!(m.cast.len(), MAX_CAST);
        assert_eq!(m.tags, "a b c");
    }

    #[test]
    fn test_find_by_title_is_case_insensitive() {
        let catalog = MovieCatalog::from_movies(vec![movie(1, "The Matrix"), movie(2, "Inception")]);

        assert_eq!(catalog.find_by_title("inception"), Some(1));
        assert_eq!(catalog.find_by_title("INCEPTION"), Some(1));
        assert_eq!(catalog.find_by_title("The matrix"), Some(0));
        assert_eq!(catalog.find_by_title(""), None);
        assert_eq!(catalog.find_by_title("Nonexistent Movie Title Xyz"), None);
    }

    #[test]
    fn test_search_puts_exact_matches_first() {
        let catalog = MovieCatalog::from_movies(vec![
            movie(1, "The Dark Knight Rises"),
            movie(2, "The Dark Knight"),
            movie(3, "Knight and Day"),
        ]);

        assert_eq!(catalog.search("the dark knight"), vec![1, 0]);
        assert_eq!(catalog.search("KNIGHT"), vec![0, 1, 2]);
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn test_empty_queries() {
        let catalog = MovieCatalog::new();

        assert!(catalog.get(0).is_none());
        assert!(catalog.find_by_title("anything").is_none());
        assert!(catalog.search("anything").is_empty());
    }
}
