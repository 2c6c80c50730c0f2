use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use phrasescout::{
    config::EncodingMode, load_corpus, load_phrases, PhraseSet, SearchConfig, SearchEngine,
    SearchOutcome,
};
use std::{num::NonZeroUsize, path::PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliSearchConfig {
    /// Corpus to search: a delimited file or a directory of text files
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// File with one phrase per line
    #[arg(short = 'f', long = "phrases")]
    phrase_file: Option<PathBuf>,

    /// Phrase to search for (can be specified multiple times)
    #[arg(short = 'p', long = "phrase")]
    phrases: Vec<String>,

    /// Separator between works in a single-file corpus
    #[arg(long)]
    delimiter: Option<String>,

    /// File extensions to include for directory corpora (e.g. txt,md)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Patterns to ignore for directory corpora (glob format)
    #[arg(long)]
    ignore: Vec<String>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Search document lists of this length or shorter sequentially
    #[arg(long)]
    document_split: Option<usize>,

    /// Match phrase lists of this length or shorter sequentially
    #[arg(long)]
    phrase_split: Option<usize>,

    /// Show only totals, not matches
    #[arg(short, long)]
    stats: bool,

    /// Print the outcome as JSON
    #[arg(long, conflicts_with = "stats")]
    json: bool,

    /// How to handle invalid UTF-8 sequences (failfast|lossy)
    #[arg(long, default_value = "failfast")]
    encoding: String,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a corpus for phrases
    Search(Box<CliSearchConfig>),
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => {
            let file_config = SearchConfig::load_from(args.config.as_deref())
                .context("Failed to load configuration")?;
            let config = file_config.merge_with_cli(cli_config(&args));
            config.validate()?;

            init_logging(&config.log_level);

            let documents = load_corpus(&args.input, &config)
                .with_context(|| format!("Failed to load corpus {}", args.input.display()))?;
            let phrases = collect_phrases(&args)?;
            debug!(
                "Loaded {} documents and {} phrases from {}",
                documents.len(),
                phrases.len(),
                args.input.display()
            );

            let engine = SearchEngine::new(&config)?;
            let outcome = engine.search(&documents, &phrases)?;

            if args.json {
                println!("{}", outcome.to_json()?);
            } else {
                print_search_results(&outcome, config.stats_only);
            }
            Ok(())
        }
    }
}

fn cli_config(args: &CliSearchConfig) -> SearchConfig {
    let defaults = SearchConfig::default();
    SearchConfig {
        thread_count: args.threads.unwrap_or(defaults.thread_count),
        document_split_threshold: args.document_split,
        phrase_split_threshold: args.phrase_split,
        log_level: args.log_level.clone().unwrap_or(defaults.log_level),
        stats_only: args.stats,
        document_delimiter: args
            .delimiter
            .clone()
            .unwrap_or(defaults.document_delimiter),
        file_extensions: args.extensions.as_ref().map(|e| {
            e.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }),
        ignore_patterns: args.ignore.clone(),
        encoding_mode: match args.encoding.to_lowercase().as_str() {
            "lossy" => EncodingMode::Lossy,
            _ => EncodingMode::FailFast,
        },
    }
}

fn collect_phrases(args: &CliSearchConfig) -> Result<PhraseSet> {
    let mut phrases: Vec<String> = match &args.phrase_file {
        Some(path) => load_phrases(path)
            .with_context(|| format!("Failed to load phrases {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };
    phrases.extend(args.phrases.iter().cloned());
    Ok(PhraseSet::new(phrases))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_search_results(outcome: &SearchOutcome, stats_only: bool) {
    if stats_only {
        println!(
            "Found {} matches in {} documents",
            outcome.total_matches, outcome.documents_with_matches
        );
        return;
    }

    for document in &outcome.document_results {
        println!("\n{}", document.title.blue());
        for m in &document.matches {
            let offsets: Vec<String> = m.offsets.iter().map(ToString::to_string).collect();
            println!(
                "  \"{}\" x{} at [{}]",
                m.phrase.green(),
                m.count(),
                offsets.join(", ")
            );
        }
    }

    println!(
        "\nFound {} matches in {} documents",
        outcome.total_matches, outcome.documents_with_matches
    );
}
