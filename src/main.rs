use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod models;
mod parsers;
mod scrapers;
mod storage;
mod utils;

use crate::config::Config;
use crate::scrapers::{
    CategoryScraper, CharacterDetailScraper, CharacterScraper, DemonWedgeScraper, GeniemonScraper,
    RunSummary, WeaponScraper,
};
use crate::storage::PageStore;

#[derive(Parser)]
#[command(
    name = "boarhat",
    version,
    about = "Duet Night Abyss data scraper for boarhat.gg"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// URL or file path to scrape instead of the category default
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Output directory for extracted JSON
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Force a fresh fetch, ignoring any cached page
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the character listing
    Characters,
    /// Scrape one character's detail page
    CharacterDetail {
        /// Character slug, e.g. "berenica"
        slug: String,
    },
    /// Scrape the weapon listing
    Weapons,
    /// Scrape the geniemon listing
    Geniemon,
    /// Scrape the demon wedge listing
    DemonWedges,
    /// Run every listing scraper in sequence
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("boarhat=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(output) = cli.output.clone() {
        config.output_dir = output;
    }
    let config = Arc::new(config);

    let store = PageStore::new(&config.cache_dir, &config.output_dir)?;
    let client = utils::http::create_client(&config.user_agent)?;

    let scrapers: Vec<Box<dyn CategoryScraper>> = match &cli.command {
        Command::Characters => vec![Box::new(CharacterScraper::new(
            config.clone(),
            cli.source.clone(),
        ))],
        Command::CharacterDetail { slug } => vec![Box::new(CharacterDetailScraper::new(
            config.clone(),
            slug,
            cli.source.clone(),
        ))],
        Command::Weapons => vec![Box::new(WeaponScraper::new(
            config.clone(),
            cli.source.clone(),
        ))],
        Command::Geniemon => vec![Box::new(GeniemonScraper::new(
            config.clone(),
            cli.source.clone(),
        ))],
        Command::DemonWedges => vec![Box::new(DemonWedgeScraper::new(
            config.clone(),
            cli.source.clone(),
        ))],
        Command::All => vec![
            Box::new(CharacterScraper::new(config.clone(), None)),
            Box::new(WeaponScraper::new(config.clone(), None)),
            Box::new(GeniemonScraper::new(config.clone(), None)),
            Box::new(DemonWedgeScraper::new(config.clone(), None)),
        ],
    };

    info!(
        "--- Scrape run started at {} ---",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let single_category = scrapers.len() == 1;
    let mut summaries: Vec<RunSummary> = Vec::new();
    let mut failed_categories = 0;

    for scraper in &scrapers {
        if cli.no_cache {
            store.clear_cached(&scraper.category_name())?;
        }

        match scraper.run(&client, &store).await {
            Ok(summary) => {
                info!(
                    "[{}] Found {} records ({} skipped), saved to {}",
                    summary.category,
                    summary.found,
                    summary.skipped,
                    summary.output.display()
                );
                summaries.push(summary);
            }
            Err(e) => {
                error!("[{}] Scrape failed: {:#}", scraper.category_name(), e);
                if single_category {
                    // The page itself could not be obtained; nothing to report.
                    return Err(e);
                }
                failed_categories += 1;
            }
        }
    }

    let found: usize = summaries.iter().map(|s| s.found).sum();
    let skipped: usize = summaries.iter().map(|s| s.skipped).sum();
    info!(
        "Run complete: {} records found, {} cards skipped, {} categories failed",
        found, skipped, failed_categories
    );

    Ok(())
}
