//! MovieCatalog loading and merging logic.
//!
//! This module builds the MovieCatalog from the parsed tables:
//! - Parse both CSV files in parallel
//! - Inner-join metadata and credits on movie id
//! - Drop rows with a null in any retained field
//! - Extract genre/keyword/cast/director names and assemble tags

use crate::error::{DataLoadError, Result};
use crate::parser::{self, CREDITS_FILE, MOVIES_FILE};
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Counters reported by [`merge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Metadata rows whose id matched at least one credits row
    pub joined: usize,
    /// Joined rows dropped for a null in a retained field
    pub dropped_incomplete: usize,
    /// Metadata rows with no matching credits row
    pub unmatched: usize,
}

impl MovieCatalog {
    /// Load the TMDB dataset from a directory
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Parse both files (movies, credits) in parallel
    /// 2. Merge them on movie id, dropping incomplete rows
    /// 3. Extract tag components and build the catalog in source order
    /// 4. Validate the title index
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading TMDB dataset from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIES_FILE);
        let credits_path = data_dir.join(CREDITS_FILE);

        let (movies, credits) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_credits(&credits_path),
        );
        let movies = movies?;
        let credits = credits?;

        info!(
            "Loaded {} movie rows and {} credit rows",
            movies.len(),
            credits.len()
        );

        let (merged, stats) = merge(movies, credits);
        info!(
            "Merged {} movies ({} joined, {} dropped as incomplete, {} without credits)",
            merged.len(),
            stats.joined,
            stats.dropped_incomplete,
            stats.unmatched
        );

        let catalog = MovieCatalog::from_movies(merged);
        catalog.validate()?;

        info!("MovieCatalog successfully built and validated!");
        Ok(catalog)
    }

    /// Validate that the title index agrees with row order
    ///
    /// Every indexed row must exist, carry the indexed title, and be the
    /// first row with that title.
    pub fn validate(&self) -> Result<()> {
        if self.movies.is_empty() {
            warn!("MovieCatalog is empty");
        }

        let mut first_rows: HashMap<&str, usize> = HashMap::new();
        for (row, movie) in self.movies.iter().enumerate() {
            first_rows.entry(movie.title_lower.as_str()).or_insert(row);
        }

        if first_rows.len() != self.title_index.len() {
            return Err(DataLoadError::ValidationError(format!(
                "title index has {} entries but catalog has {} distinct titles",
                self.title_index.len(),
                first_rows.len()
            )));
        }

        for (title, &row) in &self.title_index {
            if first_rows.get(title.as_str()) != Some(&row) {
                return Err(DataLoadError::ValidationError(format!(
                    "title '{}' does not resolve to its first row (indexed at {})",
                    title, row
                )));
            }
        }
        Ok(())
    }
}

/// Fully-present fields of one joined row, before extraction
struct JoinedRow {
    id: MovieId,
    title: String,
    overview: String,
    genres: String,
    keywords: String,
    cast: String,
    crew: String,
}

/// Inner-join metadata and credits on movie id.
///
/// Output order follows the metadata rows; a metadata row matching several
/// credit rows yields one movie per credit row, in credits order. Rows with
/// a null in any retained field are dropped whole.
pub fn merge(movies: Vec<MovieRow>, credits: Vec<CreditRow>) -> (Vec<Movie>, MergeStats) {
    let mut credits_by_id: HashMap<MovieId, Vec<CreditRow>> = HashMap::new();
    for credit in credits {
        if let Some(movie_id) = credit.movie_id {
            credits_by_id.entry(movie_id).or_default().push(credit);
        }
    }

    let mut stats = MergeStats::default();
    let mut joined = Vec::new();

    for row in movies {
        let Some(matches) = row.id.and_then(|id| credits_by_id.get(&id)) else {
            stats.unmatched += 1;
            continue;
        };
        stats.joined += 1;

        for credit in matches {
            match complete(&row, credit) {
                Some(full) => joined.push(full),
                None => {
                    debug!("Dropping incomplete row for movie {:?}", row.id);
                    stats.dropped_incomplete += 1;
                }
            }
        }
    }

    // Extraction is independent per row; collect() keeps the input order
    let merged = joined.into_par_iter().map(build_movie).collect();
    (merged, stats)
}

fn complete(row: &MovieRow, credit: &CreditRow) -> Option<JoinedRow> {
    Some(JoinedRow {
        id: row.id?,
        title: row.title.clone()?,
        overview: row.overview.clone()?,
        genres: row.genres.clone()?,
        keywords: row.keywords.clone()?,
        cast: credit.cast.clone()?,
        crew: credit.crew.clone()?,
    })
}

fn build_movie(row: JoinedRow) -> Movie {
    let id = row.id;
    Movie::new(
        id,
        row.title,
        row.overview,
        parser::extract_or_empty(id, parser::extract_names("genres", &row.genres)),
        parser::extract_or_empty(id, parser::extract_names("keywords", &row.keywords)),
        parser::extract_or_empty(id, parser::extract_top_cast(&row.cast)),
        parser::extract_or_empty(id, parser::extract_directors(&row.crew)),
    )
}
