//! Command-line entry point.
//!
//! ```text
//! genminer <INPUT> <OUTPUT> <POPULATION_SIZE> <GENERATIONS> [START_TIME]
//! ```
//!
//! Mines `INPUT` (an XES log), checkpoints every generation under
//! `OUTPUT/population` and writes the best nets to
//! `OUTPUT/result_at_<START_TIME>`.

use anyhow::{Context, Result};
use clap::Parser;
use genminer::ga::Selection;
use genminer::pipeline::{write_result, FsGenerationStore, GenerationCoordinator, MinerConfig};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "genminer")]
#[command(about = "Mines a heuristics net from an event log with a partitioned genetic algorithm")]
#[command(version)]
struct Cli {
    /// XES event log to mine
    input: PathBuf,

    /// Directory receiving checkpoints and the result file
    output: PathBuf,

    /// Nets per generation (at least 600)
    population_size: usize,

    /// Generations evolved after the initial one
    generations: usize,

    /// Run start time used to name the result file, in epoch milliseconds
    start_time: Option<i64>,

    /// Partitions per stored generation
    #[arg(long, default_value_t = 4)]
    partitions: usize,

    /// Nets recombined together per partition
    #[arg(long, default_value_t = 50)]
    batch: usize,

    /// Size of the final result set
    #[arg(long, default_value_t = 100)]
    results: usize,

    /// Tournament size for parent selection
    #[arg(long, default_value_t = 3)]
    tournament: usize,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Continue from the last committed generation
    #[arg(long)]
    resume: bool,

    /// Checkpoint directory (default: OUTPUT/population)
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,

    /// Evaluate and recombine on a single thread
    #[arg(long)]
    sequential: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let start_time = cli
        .start_time
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let mut config = MinerConfig::default()
        .with_population_size(cli.population_size)
        .with_generations(cli.generations)
        .with_partition_count(cli.partitions)
        .with_batch_per_partition(cli.batch)
        .with_result_size(cli.results)
        .with_selection(Selection::Tournament(cli.tournament))
        .with_parallel(!cli.sequential)
        .with_resume(cli.resume);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let checkpoint_dir = cli
        .checkpoint_dir
        .clone()
        .unwrap_or_else(|| cli.output.join("population"));
    let store = FsGenerationStore::new(&checkpoint_dir, config.partition_count);

    let mut coordinator = GenerationCoordinator::new(config, store);

    info!(
        input = %cli.input.display(),
        checkpoints = %checkpoint_dir.display(),
        start_time,
        "starting genetic miner"
    );

    let result = coordinator
        .run(&cli.input)
        .with_context(|| format!("mining {} failed", cli.input.display()))?;

    let path = write_result(&cli.output, &start_time.to_string(), &result.ranked)
        .context("writing result file")?;

    match result.best() {
        Some(best) => info!(
            path = %path.display(),
            kept = result.ranked.len(),
            best_fitness = best.individual.fitness().unwrap_or(f64::NAN),
            "result written"
        ),
        None => info!(path = %path.display(), "result written (empty)"),
    }
    Ok(())
}
