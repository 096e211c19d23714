use clap::{ArgAction, Parser};
use common::{find_common_word, HashKind, Metric, RunConfig, DEFAULT_BUCKETS, DEFAULT_CHUNK_SIZE};
use log::LevelFilter;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "common")]
#[command(about = "Find the most common string shared between two files.")]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Display program version info and exit
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Display detailed info during program execution
    #[arg(short, long)]
    verbose: bool,

    /// Total worker threads, split between the two files
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Bytes each worker reads per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Number of hash table buckets
    #[arg(long, default_value_t = DEFAULT_BUCKETS)]
    buckets: usize,

    /// How the two counts of a word are combined into a score
    #[arg(long, value_enum, default_value_t = Metric::Harmonic)]
    metric: Metric,

    /// Hash function for the word table
    #[arg(long, value_enum, default_value_t = HashKind::Fx)]
    hash: HashKind,

    /// First input file
    file1: PathBuf,

    /// Second input file
    file2: PathBuf,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = RunConfig {
        chunk_size: cli.chunk_size,
        buckets: cli.buckets,
        metric: cli.metric,
        hash: cli.hash,
        ..RunConfig::default()
    };
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }

    log::debug!(
        "{} threads, {} byte chunks, {} buckets, {:?} hash, {:?} mean",
        config.threads,
        config.chunk_size,
        config.buckets,
        config.hash,
        config.metric
    );

    if let Err(e) = run(&cli.file1, &cli.file2, &config) {
        eprintln!("[Error] {}", e);
        std::process::exit(1);
    }
}

fn run(first: &Path, second: &Path, config: &RunConfig) -> common::Result<()> {
    let report = find_common_word(first, second, config)?;

    if let Some(word) = report.word() {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", word)?;
        out.flush()?;
    }

    Ok(())
}
