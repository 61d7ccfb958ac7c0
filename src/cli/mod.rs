//! CLI adapter for sitefind.
//!
//! Thin clap layer over `core/`: `index` walks a document root into
//! the tantivy index, `search` runs a ranked query and prints the
//! results as JSON or through the configured template.

pub mod output;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::Config;
use crate::core::engine::{IndexEngine, TantivyEngine};
use crate::core::error::{Result, SitefindError};
use crate::core::indexer::{DocumentPipeline, FileWalker};
use crate::core::record::ResultRecord;
use crate::core::render::{render_results, render_template, Template};
use output::{colors, format_duration};

/// sitefind - search for static HTML sites
///
/// Index a directory of HTML files and query it with ranked
/// full-text search.
#[derive(Parser, Debug)]
#[command(name = "sitefind")]
#[command(version)]
#[command(about = "Full-text search for static HTML sites", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a sitefind.toml config file
    #[arg(long, global = true, env = "SITEFIND_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a directory of HTML files
    Index(IndexArgs),

    /// Search the index
    Search(SearchArgs),
}

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Document root to index
    pub directory: PathBuf,

    /// Index directory (overrides config)
    #[arg(long)]
    pub index_dir: Option<PathBuf>,

    /// Print indexing statistics as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query string
    pub query: String,

    /// Maximum number of results (overrides config)
    #[arg(long, short = 'n')]
    pub max_results: Option<usize>,

    /// Emit JSON even when a template is configured
    #[arg(long)]
    pub json: bool,

    /// Index directory (overrides config)
    #[arg(long)]
    pub index_dir: Option<PathBuf>,
}

/// Run a parsed CLI invocation
pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Index(args) => run_index(config, args),
        Commands::Search(args) => run_search(config, args),
    }
}

fn run_index(mut config: Config, args: IndexArgs) -> Result<()> {
    if let Some(index_dir) = args.index_dir {
        config.storage.index_dir = index_dir;
    }
    config.log_config();

    let walker = FileWalker::new(
        config.indexing.include_patterns.clone(),
        config.indexing.exclude_patterns.clone(),
        config.indexing.max_file_size_mb,
    )?;
    let pipeline = DocumentPipeline::new(&config.indexing.noindex_token);
    let mut engine =
        TantivyEngine::open_or_create(&config.storage.index_dir, &config.indexing.language)?;

    let stats = pipeline.index_directory(&mut engine, &walker, &args.directory)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} {} documents indexed, {} skipped in {}",
        colors::success("Done:"),
        colors::number(&stats.files_indexed.to_string()),
        colors::number(&stats.files_skipped.to_string()),
        format_duration(stats.duration_ms),
    );
    println!(
        "{} {}",
        colors::label("Index:"),
        colors::file_path(&config.storage.index_dir.display().to_string()),
    );
    Ok(())
}

fn run_search(mut config: Config, args: SearchArgs) -> Result<()> {
    if let Some(index_dir) = args.index_dir {
        config.storage.index_dir = index_dir;
    }
    if args.query.len() > config.search.max_query_length {
        return Err(SitefindError::InvalidQuery(format!(
            "Query exceeds {} bytes",
            config.search.max_query_length
        )));
    }

    let max_results = args
        .max_results
        .unwrap_or(config.search.max_results)
        .min(config.search.max_results);

    let engine = TantivyEngine::open(&config.storage.index_dir, &config.indexing.language)?;
    let payloads = engine.search(&args.query, max_results)?;
    let records = payloads
        .iter()
        .map(|p| ResultRecord::unpack(p))
        .collect::<Result<Vec<_>>>()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let template_path = config.search.template.filter(|_| !args.json);
    match template_path {
        Some(path) => {
            let source = fs::read(&path).map_err(|e| {
                SitefindError::ConfigError(format!("Can't read template {path:?}: {e}"))
            })?;
            let template = Template::parse(&source)?;
            render_template(&template, args.query.as_bytes(), &records, &mut out)?;
        }
        None => {
            render_results(&records, &mut out)?;
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}
