use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{MovieId, MovieSnapshot};
use pipeline::{FilterKind, SortKey};
use server::export::format_movie;
use server::{CatalogBoundary, CatalogConfig, CatalogService, ExportFormat};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// ReelCatalog - Movie catalog search and feedback
#[derive(Parser)]
#[command(name = "reel-catalog")]
#[command(about = "Search, sort and rate a TMDB movie catalog", long_about = None)]
struct Cli {
    /// Optional JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the TMDB listing to load
    #[arg(short, long)]
    data_path: Option<PathBuf>,

    /// Override the sort applied after every search
    #[arg(long)]
    default_sort: Option<SortKey>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every movie in the catalog
    List {
        /// Sort token, e.g. title_asc or inapp_rating_desc
        #[arg(long)]
        sort: Option<String>,
    },

    /// Search the catalog; all given filters must match
    Search(SearchArgs),

    /// Show one movie in detail
    Show {
        #[arg(long)]
        movie_id: MovieId,
    },

    /// List the genre names the genre filter understands
    Genres,

    /// Export the catalog as text, JSON or CSV
    Export {
        /// One of pretty, json, csv
        #[arg(long, default_value = "pretty")]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Interactive session over one catalog (comments and ratings live here)
    Shell,

    /// Run benchmark to test performance under concurrent access
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Title contains this text
    #[arg(long)]
    title_keyword: Option<String>,
    /// Title equals this text (case-insensitive)
    #[arg(long)]
    exact_title: Option<String>,
    #[arg(long)]
    director: Option<String>,
    #[arg(long)]
    actor: Option<String>,
    /// Genre name or part of one, e.g. drama or fiction
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    year: Option<String>,
    /// Inclusive range, e.g. 1990,1999
    #[arg(long)]
    year_range: Option<String>,
    /// Minimum critic rating (0-10)
    #[arg(long)]
    min_rating: Option<String>,
    /// Maximum critic rating (0-10)
    #[arg(long)]
    max_rating: Option<String>,
    #[arg(long)]
    comment_keyword: Option<String>,
    /// Minimum average user rating (0-5)
    #[arg(long)]
    min_inapp_rating: Option<String>,
    /// Sort token applied after filtering
    #[arg(long)]
    sort: Option<String>,
}

impl SearchArgs {
    fn filters(&self) -> Vec<(&'static str, &str)> {
        [
            (FilterKind::TitleKeyword, &self.title_keyword),
            (FilterKind::ExactTitle, &self.exact_title),
            (FilterKind::Director, &self.director),
            (FilterKind::Actor, &self.actor),
            (FilterKind::Genre, &self.genre),
            (FilterKind::Year, &self.year),
            (FilterKind::YearRange, &self.year_range),
            (FilterKind::MinRating, &self.min_rating),
            (FilterKind::MaxRating, &self.max_rating),
            (FilterKind::CommentKeyword, &self.comment_keyword),
            (FilterKind::MinInAppRating, &self.min_inapp_rating),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.as_deref().map(|value| (kind.token(), value)))
        .collect()
    }
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

    let mut config = match &cli.config {
        Some(path) => CatalogConfig::from_file(path).context("Failed to load config")?,
        None => CatalogConfig::default(),
    };
    if let Some(data_path) = cli.data_path {
        config.data_path = data_path;
    }
    if let Some(default_sort) = cli.default_sort {
        config.default_sort = default_sort;
    }

    println!("Loading catalog from {}...", config.data_path.display());
    let start = Instant::now();
    let catalog = Arc::new(CatalogService::from_config(&config));
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    let boundary = CatalogBoundary::new(catalog, &config);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::List { sort } => handle_list(&boundary, sort.as_deref())?,
        Commands::Search(args) => handle_search(&boundary, &args)?,
        Commands::Show { movie_id } => handle_show(&boundary, movie_id)?,
        Commands::Genres => handle_genres(&boundary),
        Commands::Export { format, output } => handle_export(&boundary, format, output)?,
        Commands::Shell => handle_shell(&boundary)?,
        Commands::Benchmark { requests } => handle_benchmark(boundary, requests).await?,
    }

    Ok(())
}

/// Handle the 'list' command
fn handle_list(boundary: &CatalogBoundary, sort: Option<&str>) -> Result<()> {
    let movies = match sort {
        Some(token) => boundary.sort(token)?,
        None => boundary.catalog().processed(),
    };
    print_movies("Catalog", &movies);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(boundary: &CatalogBoundary, args: &SearchArgs) -> Result<()> {
    let movies = boundary.search(&args.filters(), args.sort.as_deref())?;
    print_movies("Search results", &movies);
    Ok(())
}

/// Handle the 'show' command
fn handle_show(boundary: &CatalogBoundary, movie_id: MovieId) -> Result<()> {
    let movie = boundary.movie(movie_id)?;
    print_movie_details(&movie);
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(boundary: &CatalogBoundary) {
    println!("{}", "Genres:".bold().blue());
    for genre in boundary.genres() {
        println!("  - {}", genre);
    }
}

/// Handle the 'export' command
fn handle_export(
    boundary: &CatalogBoundary,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    match output {
        Some(path) => {
            boundary
                .export_to_file(&path, format)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Exported {} to {}", "✓".green(), format, path.display());
        }
        None => print!("{}", boundary.export(format)?),
    }
    Ok(())
}

/// Handle the 'shell' command
///
/// Each line is one request; errors are printed and the session goes on.
fn handle_shell(boundary: &CatalogBoundary) -> Result<()> {
    println!(
        "{}",
        concat!(
            "Commands: search k=v ..., sort TOKEN, default-sort TOKEN, comment ID TEXT, ",
            "rate ID VALUE, show ID, list, export [FORMAT], quit"
        )
        .dimmed()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("{} ", "reel>".bold().cyan());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        if let Err(err) = run_shell_line(boundary, line) {
            println!("{} {}", "✗".red(), err);
        }
    }
    Ok(())
}

fn run_shell_line(boundary: &CatalogBoundary, line: &str) -> Result<()> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    debug!("Shell command '{}' with '{}'", command, rest);

    match command {
        "search" => {
            let (filters, sort) = parse_search_line(rest)?;
            let filters: Vec<(&str, &str)> = filters
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            print_movies("Search results", &boundary.search(&filters, sort.as_deref())?);
        }
        "sort" => print_movies("Sorted", &boundary.sort(rest)?),
        "default-sort" => {
            let key = boundary.set_default_sort(rest)?;
            println!("{} Searches now sort by {}", "✓".green(), key);
        }
        "comment" => {
            let (id, text) = rest.split_once(' ').unwrap_or((rest, ""));
            boundary.comment(parse_id(id)?, Some(text))?;
            println!("{} Comment added", "✓".green());
        }
        "rate" => {
            let (id, value) = rest
                .split_once(' ')
                .ok_or_else(|| anyhow!("usage: rate ID VALUE"))?;
            let value: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("'{}' is not a number", value.trim()))?;
            boundary.rate(parse_id(id)?, value)?;
            println!("{} Rating added", "✓".green());
        }
        "show" => print_movie_details(&boundary.movie(parse_id(rest)?)?),
        "list" => print_movies("Current view", &boundary.catalog().processed()),
        "export" => {
            let format = if rest.is_empty() { ExportFormat::default() } else { rest.parse()? };
            print!("{}", boundary.export(format)?);
        }
        "genres" => handle_genres(boundary),
        other => return Err(anyhow!("unknown command '{}'", other)),
    }
    Ok(())
}

/// Split `genre=drama title_keyword=the dark sort=year_desc` into filter
/// pairs and an optional sort token. Words without `=` continue the
/// previous value.
fn parse_search_line(rest: &str) -> Result<(Vec<(String, String)>, Option<String>)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for word in rest.split_whitespace() {
        match word.split_once('=') {
            Some((key, value)) => pairs.push((key.to_string(), value.to_string())),
            None => {
                let (_, value) = pairs
                    .last_mut()
                    .ok_or_else(|| anyhow!("expected key=value, got '{}'", word))?;
                value.push(' ');
                value.push_str(word);
            }
        }
    }

    let sort = pairs
        .iter()
        .position(|(key, _)| key == "sort")
        .map(|index| pairs.remove(index).1);
    Ok((pairs, sort))
}

fn parse_id(raw: &str) -> Result<MovieId> {
    raw.trim()
        .parse()
        .with_context(|| format!("'{}' is not a movie id", raw.trim()))
}

/// Handle the 'benchmark' command
async fn handle_benchmark(boundary: CatalogBoundary, requests: usize) -> Result<()> {
    anyhow::ensure!(requests > 0, "need at least one request");
    let ids: Vec<MovieId> = boundary.catalog().original().iter().map(|m| m.id).collect();
    anyhow::ensure!(!ids.is_empty(), "catalog is empty, nothing to benchmark");

    let ratings_before: usize = count_ratings(&boundary);
    let genres = boundary.genres();

    // Mix searches, sorts and ratings across blocking tasks
    let wall = Instant::now();
    let mut handles = vec![];
    for _ in 0..requests {
        let boundary = boundary.clone();
        let op = rand::random::<u32>() % 3;
        let id = ids[rand::random::<u32>() as usize % ids.len()];
        let genre = genres[rand::random::<u32>() as usize % genres.len()];
        let key = SortKey::ALL[rand::random::<u32>() as usize % SortKey::ALL.len()];
        let value = (rand::random::<u32>() % 11) as f64 / 2.0;

        let handle = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let rated = match op {
                0 => {
                    boundary.search(&[("genre", genre)], None)?;
                    false
                }
                1 => {
                    boundary.sort(key.token())?;
                    false
                }
                _ => {
                    boundary.rate(id, value)?;
                    true
                }
            };
            Ok::<_, anyhow::Error>((start.elapsed(), rated))
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut submitted = 0;
    for handle in handles {
        let (elapsed, rated) = handle.await??;
        timings.push(elapsed);
        if rated {
            submitted += 1;
        }
    }
    let wall_time = wall.elapsed();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    let ratings_after = count_ratings(&boundary);
    println!(
        "Ratings: {} before, {} submitted, {} after",
        ratings_before, submitted, ratings_after
    );
    if ratings_after == ratings_before + submitted {
        println!("{} No ratings lost", "✓".green());
        Ok(())
    } else {
        Err(anyhow!(
            "expected {} ratings, found {}",
            ratings_before + submitted,
            ratings_after
        ))
    }
}

fn count_ratings(boundary: &CatalogBoundary) -> usize {
    boundary
        .catalog()
        .original()
        .iter()
        .map(|movie| movie.user_ratings.len())
        .sum()
}

/// Helper function to format and print a list of movies
fn print_movies(header: &str, movies: &[MovieSnapshot]) {
    println!("{}", format!("{} ({}):", header, movies.len()).bold().blue());
    if movies.is_empty() {
        println!("  {}", "No movies matched".dimmed());
        return;
    }
    for (rank, movie) in movies.iter().enumerate() {
        let genres = movie
            .genres
            .iter()
            .map(|g| g.name())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}. [{}] {} ({}) [{}] - Rating: {:.1}, Users: {:.2} ({} ratings)",
            (rank + 1).to_string().green(),
            movie.id,
            movie.title.bold(),
            movie.year,
            genres,
            movie.rating,
            movie.in_app_rating,
            movie.user_ratings.len()
        );
    }
}

fn print_movie_details(movie: &MovieSnapshot) {
    println!("{}", format!("{} ({})", movie.title, movie.year).bold().blue());
    print!("{}", format_movie(movie));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_line() {
        let (filters, sort) =
            parse_search_line("genre=drama title_keyword=the dark sort=year_desc").unwrap();
        assert_eq!(
            filters,
            vec![
                ("genre".to_string(), "drama".to_string()),
                ("title_keyword".to_string(), "the dark".to_string()),
            ]
        );
        assert_eq!(sort.as_deref(), Some("year_desc"));
    }

    #[test]
    fn test_parse_search_line_rejects_leading_word() {
        assert!(parse_search_line("dark genre=drama").is_err());
        let (filters, sort) = parse_search_line("").unwrap();
        assert!(filters.is_empty());
        assert!(sort.is_none());
    }

    #[test]
    fn test_export_format_flag() {
        let cli = Cli::parse_from(["reel-catalog", "export", "--format", "CSV"]);
        let Commands::Export { format, output } = cli.command else {
            panic!("expected export");
        };
        assert_eq!(format, ExportFormat::Csv);
        assert!(output.is_none());

        let cli = Cli::parse_from(["reel-catalog", "export"]);
        assert!(matches!(
            cli.command,
            Commands::Export { format: ExportFormat::Pretty, .. }
        ));
        assert!(Cli::try_parse_from(["reel-catalog", "export", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_search_args_skip_missing_filters() {
        let cli = Cli::parse_from([
            "reel-catalog",
            "search",
            "--genre",
            "drama",
            "--year-range",
            "1990,1999",
        ]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.filters(), vec![("genre", "drama"), ("year_range", "1990,1999")]);
    }
}
