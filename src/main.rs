use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use cinesim_core::Error;
use cinesim_similarity::{clamp_top_n, EngineConfig, Query, SimilarityEngine};
use cinesim_storage::ArtifactStore;

/// Seed for the "Continue Watching" row, so the home view is stable
const HOME_SAMPLE_SEED: u64 = 1;
const HOME_GENRE: &str = "Action";

/// Content-based movie recommendations
#[derive(Parser, Debug)]
#[command(name = "cinesim")]
#[command(about = "Find similar movies by content", long_about = None)]
struct Args {
    /// Directory holding movies.json, vectorizer.json and count_matrix.bin
    #[arg(short, long, default_value = "./artifacts")]
    artifacts_dir: PathBuf,

    /// Number of results
    #[arg(short = 'n', long, default_value_t = 8, allow_negative_numbers = true, global = true)]
    top_n: i64,

    /// Print results as a JSON array
    #[arg(long, global = true)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample picks plus a genre row
    Home,
    /// Movies similar to a catalog title
    Similar { title: String },
    /// Search by description or genre
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = SearchBy::Description)]
        by: SearchBy,
    },
    /// Most popular movies
    Popular,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SearchBy {
    Description,
    Genre,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(Error::NotFound(title)) => {
                    eprintln!("No movie titled {:?} in the catalog", title);
                }
                _ => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    info!("Starting cinesim v{}", env!("CARGO_PKG_VERSION"));
    info!("Artifacts directory: {:?}", args.artifacts_dir);

    let engine = ArtifactStore::new(&args.artifacts_dir).load_engine(EngineConfig::default())?;
    let top_n = clamp_top_n(args.top_n, engine.corpus().len());

    match to_query(&args.command, top_n) {
        Some(query) => print_titles(args, &query.execute(&engine)?),
        None => home(args, &engine, top_n),
    }
}

fn home(args: &Args, engine: &SimilarityEngine, top_n: usize) -> anyhow::Result<()> {
    print_section(args, "Continue Watching", &engine.sample(top_n, HOME_SAMPLE_SEED))?;
    let picks = engine.search_by_genre(HOME_GENRE, top_n);
    print_section(args, &format!("{} Picks", HOME_GENRE), &picks)
}

/// `None` for the home view, which combines several queries
fn to_query(command: &Command, top_n: usize) -> Option<Query> {
    let query = match command {
        Command::Home => return None,
        Command::Similar { title } => Query::Similar { title: title.clone(), top_n },
        Command::Search { query, by: SearchBy::Description } => {
            Query::Text { query: query.clone(), top_n }
        }
        Command::Search { query, by: SearchBy::Genre } => {
            Query::Genre { genre: query.clone(), top_n }
        }
        Command::Popular => Query::Popular { top_n },
    };
    Some(query)
}

fn print_section(args: &Args, heading: &str, titles: &[String]) -> anyhow::Result<()> {
    if !args.json {
        println!("## {}", heading);
    }
    print_titles(args, titles)
}

fn print_titles(args: &Args, titles: &[String]) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string(titles)?);
    } else {
        for (rank, title) in titles.iter().enumerate() {
            println!("{:>3}. {}", rank + 1, title);
        }
    }
    Ok(())
}
