// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::annotation_controller::{scan_book, AnnotationController};
use crate::app_config::Config;
use crate::curator::ConsoleCurator;
use crate::detector::VariantDetector;
use crate::errors::SessionError;
use crate::export::ExportBundle;
use crate::file_utils::FileManager;
use crate::seed::SeedBundle;
use crate::store::DataStore;
use crate::token_stream::TokenStream;

mod annotation_controller;
mod app_config;
mod curator;
mod detector;
mod dictionaries;
mod errors;
mod export;
mod file_utils;
mod seed;
mod session;
mod store;
mod token_stream;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Review a book interactively, resuming its session if one exists
    Annotate {
        /// Tokenized book file or directory of books to review
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Discard a stale session when the book text changed
        #[arg(long)]
        discard_stale: bool,

        /// Disable ANSI highlighting in the review prompts
        #[arg(long)]
        plain: bool,
    },

    /// Scan books headlessly and report detected occurrences
    Scan {
        /// Tokenized book file or directory of books to scan
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// List persisted annotation sessions
    Sessions,

    /// Export a book's occurrences and dictionaries as a JSON bundle
    Export {
        /// Tokenized book file to export
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output file; defaults to `{book}_export.json`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a curated seed register into the dictionaries
    Seed {
        /// Seed bundle file to apply
        #[arg(value_name = "SEED_PATH")]
        seed_path: PathBuf,

        /// Book whose pattern dictionary receives the seeded patterns
        #[arg(short, long)]
        book: Option<String>,
    },
}

/// Onoma - name-variant annotation for medieval narrative verse
///
/// Detects proper-name variants and epithets in tokenized books,
/// records their collocation windows, and walks a curator through
/// classifying them. Progress is checkpointed after every decision.
#[derive(Parser, Debug)]
#[command(name = "onoma")]
#[command(version = "0.1.0")]
#[command(about = "Name-variant detection and collocation recording for scholarly annotation")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// Custom logger implementation: timestamped, colored, to stderr
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    let mut config = Config::from_file(&cli.config_path)?;
    if let Some(cmd_log_level) = &cli.log_level {
        config.log_level = cmd_log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());
    config.validate().context("Configuration validation failed")?;

    let store = DataStore::new(config.resolve_data_dir());

    match cli.command {
        Commands::Annotate {
            input_path,
            discard_stale,
            plain,
        } => run_annotate(&config, &store, &input_path, discard_stale, plain),
        Commands::Scan { input_path } => run_scan(&config, &store, &input_path),
        Commands::Sessions => run_sessions(&store),
        Commands::Export { input_path, output } => {
            run_export(&config, &store, &input_path, output)
        }
        Commands::Seed { seed_path, book } => run_seed(&store, &seed_path, book.as_deref()),
    }
}

/// Resolve the input path to the list of book files to process.
fn book_files(input_path: &Path) -> Result<Vec<PathBuf>> {
    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }
    if input_path.is_dir() {
        let files = FileManager::find_files(input_path, "txt")?;
        if files.is_empty() {
            warn!("No .txt book files found in {:?}", input_path);
        }
        return Ok(files);
    }
    Err(anyhow!("Input path does not exist: {:?}", input_path))
}

/// Book id from a file path: the file stem.
fn book_id_for(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Cannot derive a book id from path: {:?}", path))
}

fn load_stream(path: &Path, store: &DataStore) -> Result<TokenStream> {
    let book_id = book_id_for(path)?;
    let text = FileManager::read_to_string(path)?;
    let dictionaries = store.load_dictionaries()?;
    let stream = TokenStream::from_text(&book_id, &text, &dictionaries.normalization)?;
    info!("Loaded {}: {} tokens", book_id, stream.len());
    Ok(stream)
}

fn run_annotate(
    config: &Config,
    store: &DataStore,
    input_path: &Path,
    discard_stale: bool,
    plain: bool,
) -> Result<()> {
    for path in book_files(input_path)? {
        let stream = load_stream(&path, store)?;
        let dictionaries = store.load_dictionaries()?;
        let mut patterns = store.load_patterns(stream.book_id())?;

        if discard_stale {
            if let Some(session) = store.load_session(stream.book_id())? {
                if !session.matches_stream(&stream.content_hash()) {
                    warn!("Discarding stale session {} for changed book", session.id);
                    store.discard_session(stream.book_id())?;
                }
            }
        }

        let detector = VariantDetector::new(config.window_size, config.heuristics.clone());
        let curator = ConsoleCurator { plain };
        let mut controller = AnnotationController::new(detector, dictionaries, curator);

        let run = match controller.run_book(&stream, &mut patterns, store) {
            Ok(run) => run,
            Err(crate::errors::AppError::Session(SessionError::BookChanged { book, .. })) => {
                return Err(anyhow!(
                    "Book {} changed since its session was created; \
                     re-run with --discard-stale to start over",
                    book
                ));
            }
            Err(e) => return Err(e.into()),
        };

        println!(
            "{}: {} presented, {} names, {} epithets, {} rejected, {} deferred, {} ignored",
            stream.book_id(),
            run.summary.presented,
            run.summary.confirmed_names,
            run.summary.confirmed_epithets,
            run.summary.rejected,
            run.summary.deferred,
            run.summary.ignored
        );
        for record in &run.finalized {
            debug!(
                "{} @ {}: \"{}\" -> {:?}",
                record.occurrence.lemma,
                record.occurrence.start_position,
                record.occurrence.surface,
                record.outcome
            );
        }
        if run.summary.aborted {
            info!("Run aborted; progress is checkpointed");
            break;
        }
    }
    Ok(())
}

fn run_scan(config: &Config, store: &DataStore, input_path: &Path) -> Result<()> {
    let files = book_files(input_path)?;
    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?,
    );

    let dictionaries = store.load_dictionaries()?;
    let detector = VariantDetector::new(config.window_size, config.heuristics.clone());

    for path in &files {
        let book_id = book_id_for(path)?;
        progress.set_message(book_id.clone());

        let text = FileManager::read_to_string(path)?;
        let stream = TokenStream::from_text(&book_id, &text, &dictionaries.normalization)?;
        let patterns = store.load_patterns(&book_id)?;

        let occurrences = scan_book(&detector, &stream, &dictionaries, &patterns);
        progress.suspend(|| {
            println!("{}: {} occurrence(s)", book_id, occurrences.len());
            for occurrence in &occurrences {
                println!(
                    "  {:>6}  {:<24} {}",
                    occurrence.start_position,
                    occurrence.lemma,
                    occurrence.context_line()
                );
            }
        });
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(())
}

fn run_sessions(store: &DataStore) -> Result<()> {
    let sessions = store.list_sessions()?;
    if sessions.is_empty() {
        println!("No sessions found in {:?}", store.root());
        return Ok(());
    }
    for session in sessions {
        println!("{}", session);
    }
    Ok(())
}

fn run_export(
    config: &Config,
    store: &DataStore,
    input_path: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    let stream = load_stream(input_path, store)?;
    let dictionaries = store.load_dictionaries()?;
    let patterns = store.load_patterns(stream.book_id())?;

    let detector = VariantDetector::new(config.window_size, config.heuristics.clone());
    let occurrences = scan_book(&detector, &stream, &dictionaries, &patterns);

    let bundle = ExportBundle::new(
        stream.book_id(),
        &occurrences,
        &dictionaries.categories,
        &patterns,
    );
    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}_export.json", stream.book_id())));
    bundle.write_to(&output)?;

    let summary = bundle.frequency_summary();
    for (classification, lemmas) in &summary {
        println!("{:?}: {} lemma(s)", classification, lemmas.len());
    }
    info!("Exported {} occurrence(s) to {:?}", bundle.occurrences.len(), output);
    Ok(())
}

fn run_seed(store: &DataStore, seed_path: &Path, book: Option<&str>) -> Result<()> {
    let bundle = SeedBundle::from_file(seed_path)?;
    if !bundle.patterns.is_empty() && book.is_none() {
        return Err(anyhow!(
            "Seed file contains patterns; pass --book to name the pattern dictionary"
        ));
    }

    let mut dictionaries = store.load_dictionaries()?;
    let mut patterns = match book {
        Some(book_id) => store.load_patterns(book_id)?,
        None => Default::default(),
    };

    bundle.apply(&mut dictionaries, &mut patterns)?;
    store.save_dictionaries(&dictionaries)?;
    if let Some(book_id) = book {
        store.save_patterns(book_id, &patterns)?;
    }
    Ok(())
}
