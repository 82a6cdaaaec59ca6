use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Movie;
use pipeline::{SimilarityIndex, Tokenizer, WordTokenizer};
use server::{DEFAULT_TOP_N, MovieRecommender, RecommendError, Recommendation};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Content-based movie recommendations over the TMDB 5000 dataset", long_about = None)]
struct Cli {
    /// Path to the directory holding the TMDB movies and credits CSV files
    #[arg(short, long, env = "RECS_DATA_DIR", default_value = "data/tmdb")]
    data_dir: PathBuf,

    /// Vocabulary size for the count vectorizer
    #[arg(long, default_value_t = pipeline::DEFAULT_MAX_FEATURES)]
    max_features: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movies similar to a given title
    Recommend {
        /// Movie title (case-insensitive exact match)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,

        /// Show similarity scores and the terms each movie shares with the query
        #[arg(long)]
        explain: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,

        /// Maximum number of results
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show the extracted fields and tags of one movie
    Inspect {
        /// Movie title (case-insensitive exact match)
        #[arg(long)]
        title: String,
    },

    /// Run benchmark to test query performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Recommendations per request
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load dataset and build the similarity index (this may take a moment)
    println!("Loading TMDB dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_dir = cli.data_dir.clone();
    let max_features = cli.max_features;
    let recommender = tokio::task::spawn_blocking(move || {
        MovieRecommender::load_with(&data_dir, max_features)
    })
    .await
    .context("Initialization task panicked")?
    .context("Failed to build recommender")?;
    let recommender = Arc::new(recommender);
    println!(
        "{} Indexed {} movies in {:?}",
        "✓".green(),
        recommender.len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            title,
            top_n,
            explain,
        } => handle_recommend(&recommender, &title, top_n, explain)?,
        Commands::Search { title, limit } => handle_search(&recommender, &title, limit),
        Commands::Inspect { title } => handle_inspect(&recommender, &title)?,
        Commands::Benchmark {
            requests,
            concurrent,
            top_n,
        } => handle_benchmark(recommender, requests, concurrent, top_n).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    recommender: &MovieRecommender,
    title: &str,
    top_n: usize,
    explain: bool,
) -> Result<()> {
    let recommendations = match recommender.recommend_scored(title, top_n) {
        Ok(recs) => recs,
        Err(RecommendError::NotFound { .. }) => {
            println!("{} Movie '{}' not found", "✗".red(), title);
            suggest_titles(recommender, title);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let query = recommender
        .catalog()
        .find_by_title(title)
        .and_then(|row| recommender.catalog().get(row))
        .context("Queried movie disappeared from the catalog")?;

    print_recommendations(recommender, query, &recommendations, explain);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(recommender: &MovieRecommender, title: &str, limit: usize) {
    let catalog = recommender.catalog();
    let rows = catalog.search(title);

    println!(
        "{}",
        format!("Search results for '{}' ({} matches):", title, rows.len())
            .bold()
            .blue()
    );
    for row in rows.into_iter().take(limit) {
        if let Some(movie) = catalog.get(row) {
            println!(
                "{}: {} [{}]",
                movie.id,
                movie.title,
                movie.genres.join(", ")
            );
        }
    }
}

/// Handle the 'inspect' command
fn handle_inspect(recommender: &MovieRecommender, title: &str) -> Result<()> {
    let catalog = recommender.catalog();
    let Some(row) = catalog.find_by_title(title) else {
        println!("{} Movie '{}' not found", "✗".red(), title);
        suggest_titles(recommender, title);
        return Ok(());
    };
    let movie = catalog
        .get(row)
        .context("Title index points past the catalog")?;

    println!("{}", format!("{} (TMDB id {})", movie.title, movie.id).bold().blue());
    println!("{}Row: {}", "• ".green(), row);
    println!("{}Genres: {}", "• ".green(), movie.genres.join(", "));
    println!("{}Keywords: {}", "• ".green(), movie.keywords.join(", "));
    println!("{}Cast: {}", "• ".green(), movie.cast.join(", "));
    println!("{}Directors: {}", "• ".green(), movie.directors.join(", "));
    println!("{}Overview: {}", "• ".cyan(), movie.overview);
    println!("{}Tags: {}", "• ".cyan(), movie.tags);

    let terms = vocabulary_terms(recommender.index(), &movie.tags);
    println!(
        "{}Vocabulary terms ({} of {}): {}",
        "• ".cyan(),
        terms.len(),
        recommender.index().vocabulary().len(),
        terms.into_iter().collect::<Vec<_>>().join(" ")
    );
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    recommender: Arc<MovieRecommender>,
    requests: usize,
    concurrent: usize,
    top_n: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("--requests and --concurrent must both be at least 1");
    }
    if recommender.is_empty() {
        bail!("Catalog is empty, nothing to benchmark");
    }

    // Random titles from the catalog
    let titles: Vec<String> = (0..requests)
        .filter_map(|_| {
            let row = rand::random_range(0..recommender.len());
            recommender.catalog().get(row).map(|m| m.title.clone())
        })
        .collect();

    println!(
        "Running {} requests ({} concurrent, top_n = {})...",
        titles.len(),
        concurrent,
        top_n
    );

    let permits = Arc::new(Semaphore::new(concurrent));
    let wall_clock = Instant::now();

    let mut handles = Vec::with_capacity(titles.len());
    for title in titles {
        let recommender = Arc::clone(&recommender);
        let permits = Arc::clone(&permits);
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let handle = tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                recommender.recommend(&title, top_n)?;
                Ok::<_, anyhow::Error>(start.elapsed())
            });
            handle.await?
        }));
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();
    debug!("Collected {} timings", timings.len());

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / timings.len() as u32;
    let percentile = |p: f64| {
        let idx = ((timings.len() as f64 * p) as usize).min(timings.len() - 1);
        timings[idx]
    };
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Print close title matches after a failed lookup
fn suggest_titles(recommender: &MovieRecommender, title: &str) {
    let catalog = recommender.catalog();
    let suggestions: Vec<&str> = catalog
        .search(title)
        .into_iter()
        .take(5)
        .filter_map(|row| catalog.get(row).map(|m| m.title.as_str()))
        .collect();

    if !suggestions.is_empty() {
        println!("Did you mean: {}", suggestions.join(", ").yellow());
    }
}

/// Distinct vocabulary terms occurring in a tags blob
fn vocabulary_terms(index: &SimilarityIndex, tags: &str) -> BTreeSet<String> {
    WordTokenizer
        .tokenize(tags)
        .into_iter()
        .filter(|term| index.vocabulary().column(term).is_some())
        .collect()
}

/// Helper function to format and print recommendations
fn print_recommendations(
    recommender: &MovieRecommender,
    query: &Movie,
    recommendations: &[Recommendation],
    explain: bool,
) {
    println!(
        "{}",
        format!("Movies similar to {}:", query.title).bold().blue()
    );
    if recommendations.is_empty() {
        println!("  (no other movies in the catalog)");
        return;
    }

    let query_terms = if explain {
        vocabulary_terms(recommender.index(), &query.tags)
    } else {
        BTreeSet::new()
    };

    for (i, rec) in recommendations.iter().enumerate() {
        let Some(movie) = recommender.catalog().get(rec.row) else {
            continue;
        };
        if !explain {
            println!("{}. {}", (i + 1).to_string().green(), movie.title);
            continue;
        }

        println!(
            "{}. {} [{}] - Score: {:.3}",
            (i + 1).to_string().green(),
            movie.title,
            movie.genres.join(", "),
            rec.score
        );
        let shared: Vec<String> = vocabulary_terms(recommender.index(), &movie.tags)
            .intersection(&query_terms)
            .take(10)
            .cloned()
            .collect();
        if shared.is_empty() {
            println!("   Shared terms: none");
        } else {
            println!("   Shared terms: {}", shared.join(" "));
        }
    }
}
