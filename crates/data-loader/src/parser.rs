//! Parser for the TMDB 5000 CSV files.
//!
//! This module handles:
//! - tmdb_5000_movies.csv: id, title, overview, genres, keywords (+ unused columns)
//! - tmdb_5000_credits.csv: movie_id, cast, crew (+ unused title column)
//!
//! The genres, keywords, cast and crew cells are themselves JSON lists such as
//! `[{"id": 28, "name": "Action"}]`. Decoding one of those cells is fallible
//! per field: a bad cell yields a `FeatureExtractionError` that the loader
//! turns into an empty list, it never fails the whole load.

use crate::error::{DataLoadError, FeatureExtractionError, Result};
use crate::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// Movie metadata file name inside the data directory
pub const MOVIES_FILE: &str = "tmdb_5000_movies.csv";

/// Credits file name inside the data directory
pub const CREDITS_FILE: &str = "tmdb_5000_credits.csv";

const MOVIE_COLUMNS: &[&str] = &["id", "title", "overview", "genres", "keywords"];
const CREDIT_COLUMNS: &[&str] = &["movie_id", "cast", "crew"];

/// Parse the movies CSV file
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRow>> {
    let file = open(path)?;
    parse_movies_from_reader(file, &display_name(path))
}

/// Parse movie rows from any reader (used by tests and by `parse_movies`)
pub fn parse_movies_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<MovieRow>> {
    read_rows(reader, file, MOVIE_COLUMNS)
}

/// Parse the credits CSV file
pub fn parse_credits(path: &Path) -> Result<Vec<CreditRow>> {
    let file = open(path)?;
    parse_credits_from_reader(file, &display_name(path))
}

/// Parse credit rows from any reader
pub fn parse_credits_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<CreditRow>> {
    read_rows(reader, file, CREDIT_COLUMNS)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Deserialize every record of a headed CSV into `T`.
///
/// Columns not named by `T` are ignored, but every column in `required`
/// must exist in the header row.
fn read_rows<T, R>(reader: R, file: &str, required: &[&str]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| csv_error(file, e))?.clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataLoadError::MissingColumn {
                file: file.to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize::<T>() {
        rows.push(result.map_err(|e| csv_error(file, e))?);
    }

    debug!("Parsed {} rows from {}", rows.len(), file);
    Ok(rows)
}

/// Field-level deserialization failures carry a position; report those as
/// parse errors with a line number, everything else as a CSV error.
fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    if let csv::ErrorKind::Deserialize { pos, err: de } = err.kind() {
        return DataLoadError::ParseError {
            file: file.to_string(),
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            reason: de.to_string(),
        };
    }
    DataLoadError::CsvError {
        file: file.to_string(),
        source: err,
    }
}

// =============================================================================
// Structured field extraction
// =============================================================================

/// One element of a genres/keywords/cast/crew list
#[derive(Debug, Deserialize)]
struct NamedEntry {
    name: String,
    #[serde(default)]
    job: Option<String>,
}

fn parse_entries(
    field: &'static str,
    raw: &str,
) -> std::result::Result<Vec<NamedEntry>, FeatureExtractionError> {
    serde_json::from_str(raw).map_err(|source| FeatureExtractionError::Malformed { field, source })
}

/// All entry names, in source order (genres, keywords)
///
/// Example: `[{"id": 28, "name": "Action"}]` -> `["Action"]`
pub fn extract_names(
    field: &'static str,
    raw: &str,
) -> std::result::Result<Vec<String>, FeatureExtractionError> {
    Ok(parse_entries(field, raw)?
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}

/// Names of the first [`MAX_CAST`] cast entries, in billing order
pub fn extract_top_cast(raw: &str) -> std::result::Result<Vec<String>, FeatureExtractionError> {
    Ok(parse_entries("cast", raw)?
        .into_iter()
        .take(MAX_CAST)
        .map(|entry| entry.name)
        .collect())
}

/// Names of crew entries whose job is exactly `"Director"`
pub fn extract_directors(raw: &str) -> std::result::Result<Vec<String>, FeatureExtractionError> {
    Ok(parse_entries("crew", raw)?
        .into_iter()
        .filter(|entry| entry.job.as_deref() == Some(DIRECTOR_JOB))
        .map(|entry| entry.name)
        .collect())
}

/// Degrade a failed extraction to an empty list for this movie/field.
pub fn extract_or_empty(
    movie_id: MovieId,
    result: std::result::Result<Vec<String>, FeatureExtractionError>,
) -> Vec<String> {
    result.unwrap_or_else(|e| {
        debug!("Movie {}: {}; using empty list", movie_id, e);
        Vec::new()
    })
}
