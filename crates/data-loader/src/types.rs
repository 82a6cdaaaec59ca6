//! Core domain types for the TMDB movie catalog.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Raw CSV rows (`MovieRow`, `CreditRow`) exactly as they come off disk
//! - The merged, tagged `Movie` record
//! - `MovieCatalog`, the ordered in-memory collection with its title index

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases & Constants
// =============================================================================

/// Unique identifier for a movie (TMDB id)
pub type MovieId = u32;

/// Only the top-billed cast members contribute to a movie's tags
pub const MAX_CAST: usize = 3;

/// Crew job that marks a director credit (compared case-sensitively)
pub const DIRECTOR_JOB: &str = "Director";

// =============================================================================
// Raw Rows
// =============================================================================

/// One row of `tmdb_5000_movies.csv`, restricted to the columns we use.
///
/// Every field is optional: an empty cell deserializes to `None` and the row
/// is dropped at merge time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieRow {
    pub id: Option<MovieId>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<String>,
    pub keywords: Option<String>,
}

/// One row of `tmdb_5000_credits.csv`, restricted to the columns we use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditRow {
    pub movie_id: Option<MovieId>,
    pub cast: Option<String>,
    pub crew: Option<String>,
}

// =============================================================================
// Movie
// =============================================================================

/// A merged movie record with its extracted tag components.
///
/// `tags` and `title_lower` are derived once in [`Movie::new`] and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub title_lower: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// Top-billed cast, at most [`MAX_CAST`] names in billing order
    pub cast: Vec<String>,
    /// Names credited with the `Director` job, in encounter order
    pub directors: Vec<String>,
    /// Lowercase bag-of-words used for vectorization
    pub tags: String,
}

impl Movie {
    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        overview: impl Into<String>,
        genres: Vec<String>,
        keywords: Vec<String>,
        mut cast: Vec<String>,
        directors: Vec<String>,
    ) -> Self {
        let title = title.into();
        let overview = overview.into();
        cast.truncate(MAX_CAST);

        let tags = assemble_tags(&overview, &genres, &keywords, &cast, &directors);

        Self {
            id,
            title_lower: title.to_lowercase(),
            title,
            overview,
            genres,
            keywords,
            cast,
            directors,
            tags,
        }
    }
}

/// Build the tags blob: overview tokens, then genres, keywords, cast and
/// directors, joined by single spaces and lowercased.
pub fn assemble_tags(
    overview: &str,
    genres: &[String],
    keywords: &[String],
    cast: &[String],
    directors: &[String],
) -> String {
    let parts: Vec<&str> = overview
        .split_whitespace()
        .chain(genres.iter().map(String::as_str))
        .chain(keywords.iter().map(String::as_str))
        .chain(cast.iter().map(String::as_str))
        .chain(directors.iter().map(String::as_str))
        .collect();

    parts.join(" ").to_lowercase()
}

// =============================================================================
// MovieCatalog - The Ordered In-Memory Dataset
// =============================================================================

/// Ordered collection of movies plus a lowercase title index.
///
/// Row position is the contract shared with the similarity matrix: row `i`
/// of the matrix describes `movies[i]`. Movies can only be appended through
/// [`MovieCatalog::insert_movie`], which keeps the title index in lockstep.
#[derive(Debug, Clone, Default)]
pub struct MovieCatalog {
    pub(crate) movies: Vec<Movie>,
    /// Lowercase title -> first row carrying that title
    pub(crate) title_index: HashMap<String, usize>,
}

impl MovieCatalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            title_index: HashMap::new(),
        }
    }

    /// Build a catalog from movies in the given order
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut catalog = Self::new();
        for movie in movies {
            catalog.insert_movie(movie);
        }
        catalog
    }

    /// Append a movie and return its row.
    ///
    /// When two movies share a title, lookups resolve to the earlier row.
    pub fn insert_movie(&mut self, movie: Movie) -> usize {
        let row = self.movies.len();
        self.title_index
            .entry(movie.title_lower.clone())
            .or_insert(row);
        self.movies.push(movie);
        row
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get a movie by row
    pub fn get(&self, row: usize) -> Option<&Movie> {
        self.movies.get(row)
    }

    /// All movies in row order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Tags blobs in row order, ready for vectorization
    pub fn tags(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.tags.as_str()).collect()
    }

    /// Case-insensitive exact title lookup
    pub fn find_by_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(&title.to_lowercase()).copied()
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact matches come first, then substring matches; each group keeps
    /// row order. An empty fragment matches nothing.
    pub fn search(&self, fragment: &str) -> Vec<usize> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for (row, movie) in self.movies.iter().enumerate() {
            if movie.title_lower == needle {
                exact.push(row);
            } else if movie.title_lower.contains(&needle) {
                partial.push(row);
            }
        }
        exact.extend(partial);
        exact
    }
}
