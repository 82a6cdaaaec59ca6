use data_loader::MovieCatalog;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,data_loader=debug")
        .init();

    let data_dir = Path::new("data/tmdb");

    println!("Loading TMDB 5000 dataset...\n");

    let start = Instant::now();
    let catalog = MovieCatalog::load_from_files(data_dir)?;
    let elapsed = start.elapsed();

    let tag_terms: usize = catalog
        .movies()
        .iter()
        .map(|m| m.tags.split_whitespace().count())
        .sum();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("Tag tokens: {}", tag_terms);
    println!(
        "\nPerformance: {:.0} movies/second",
        catalog.len() as f64 / elapsed.as_secs_f64()
    );

    Ok(())
}
