//! Scene-Scraper main entry point
//!
//! This is the command-line interface for the scene metadata scraper.

use anyhow::Context;
use clap::Parser;
use scene_scraper::config::load_config_with_hash;
use scene_scraper::sites::{register_from_config, JavLibrary};
use scene_scraper::state::{NoopSiteUpdater, SiteStateStore, SiteUpdater};
use scene_scraper::{Config, KnownScenes, Orchestrator, Registry, ScrapedScene};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Scene-Scraper: concurrent scene metadata scraping
///
/// Runs the selected site extractors in parallel and writes every scraped
/// scene as one JSON object per line.
#[derive(Parser, Debug)]
#[command(name = "scene-scraper")]
#[command(version)]
#[command(about = "Concurrent scene metadata scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Source id to scrape (repeatable); all sources when omitted
    #[arg(long = "site", value_name = "ID")]
    sites: Vec<String>,

    /// File of already-known scene URLs and ids, one per line
    #[arg(long, value_name = "FILE")]
    known: Option<PathBuf>,

    /// Record a "last updated" timestamp for every source that finishes its walk
    #[arg(long)]
    update_site: bool,

    /// Write JSON lines here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// List registered sources and exit
    #[arg(long, conflicts_with_all = ["sites", "jav"])]
    list: bool,

    /// Look up comma-separated DVD ids on JavLibrary instead of scraping sources
    #[arg(long, value_name = "QUERY", conflicts_with = "sites")]
    jav: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let registry = Arc::new(Registry::new());
    register_from_config(&registry, &config)?;

    if cli.list {
        return handle_list(&registry, cli.output.as_deref());
    }

    let known = match &cli.known {
        Some(path) => KnownScenes::load(path)
            .with_context(|| format!("Failed to read known scenes from {}", path.display()))?,
        None => KnownScenes::new(),
    };
    tracing::info!("{} known scenes loaded", known.len());

    let mut out = open_output(cli.output.as_deref())?;

    match &cli.jav {
        Some(query) => handle_jav(&config, &known, query, &mut out).await?,
        None => handle_scrape(&config, registry, &cli, known, &mut out).await?,
    }

    out.flush()?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays pure JSON lines.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scene_scraper=info,warn"),
            1 => EnvFilter::new("scene_scraper=debug,info"),
            2 => EnvFilter::new("scene_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    })
}

/// Handles --list: one JSON object per registered source
fn handle_list(registry: &Registry, output: Option<&Path>) -> anyhow::Result<()> {
    let mut out = open_output(output)?;
    for info in registry.list() {
        writeln!(out, "{}", serde_json::to_string(&info)?)?;
    }
    out.flush()?;
    Ok(())
}

/// Handles --jav: JavLibrary lookups by DVD id
async fn handle_jav(
    config: &Config,
    known: &KnownScenes,
    query: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let jav = JavLibrary::new(&config.sites.javlibrary_base_url, config.collector.clone());
    let scenes = jav.search(known, query).await?;
    tracing::info!("JavLibrary returned {} scenes", scenes.len());

    for scene in &scenes {
        write_scene(out, scene)?;
    }
    Ok(())
}

/// Default mode: run the selected sources and stream their scenes out
async fn handle_scrape(
    config: &Config,
    registry: Arc<Registry>,
    cli: &Cli,
    known: KnownScenes,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let site_updater: Arc<dyn SiteUpdater> = match &config.state.site_state_path {
        Some(path) => Arc::new(SiteStateStore::open(Path::new(path))?),
        None => Arc::new(NoopSiteUpdater),
    };

    let orchestrator =
        Orchestrator::new(registry, &config.orchestrator).with_site_updater(site_updater);

    let mut run = if cli.sites.is_empty() {
        orchestrator.run_all(known, cli.update_site)
    } else {
        orchestrator.run(&cli.sites, known, cli.update_site)
    };

    if !run.unknown_sources().is_empty() {
        tracing::warn!("Unknown sources: {}", run.unknown_sources().join(", "));
    }

    let mut count = 0usize;
    while let Some(scene) = run.recv().await {
        if let Err(e) = write_scene(out, &scene) {
            run.abort();
            return Err(e);
        }
        count += 1;
    }

    tracing::info!(
        "Scraped {} scenes from {} sources",
        count,
        run.started_sources().len()
    );
    Ok(())
}

fn write_scene(out: &mut dyn Write, scene: &ScrapedScene) -> anyhow::Result<()> {
    writeln!(out, "{}", scene.to_json()?)?;
    Ok(())
}
