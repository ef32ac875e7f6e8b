use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::parsers::element_text;
use crate::storage::PageStore;

mod character;
mod character_detail;
mod demon_wedge;
mod geniemon;
mod weapon;

pub use character::CharacterScraper;
pub use character_detail::CharacterDetailScraper;
pub use demon_wedge::DemonWedgeScraper;
pub use geniemon::GeniemonScraper;
pub use weapon::WeaponScraper;

/// Entity name headings share one signature across the card-grid pages.
static CARD_HEADING: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2.text-xl.font-bold.text-white").expect("Invalid card heading selector")
});

#[async_trait]
pub trait CategoryScraper: Send + Sync {
    /// Stable category key, used for cache and output file naming.
    fn category_name(&self) -> String;

    /// Fetch (or load from cache), extract, and persist one category.
    async fn run(&self, client: &Client, store: &PageStore) -> Result<RunSummary>;
}

#[derive(Debug)]
pub struct RunSummary {
    pub category: String,
    pub found: usize,
    pub skipped: usize,
    pub output: PathBuf,
}

/// Why one card was dropped. Never aborts the surrounding run.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("card has no usable name")]
    MissingName,
    #[error("malformed card: {0}")]
    Malformed(String),
}

/// The markup subtree for one entity, plus the heading it was located by.
pub struct Card<'a> {
    pub heading: String,
    pub heading_node: ElementRef<'a>,
    pub node: ElementRef<'a>,
}

/// Per-category card location parameters: which heading texts are column
/// labels rather than entity names, and the container's class signature.
pub struct CardSignature {
    pub denylist: &'static [&'static str],
    pub container_class: &'static str,
}

/// Partition a listing document into entity cards, in document order.
/// Denylisted headings are column labels and are excluded outright (they
/// never count as skipped cards); a heading without a card container is
/// dropped with a log line.
pub fn locate_cards<'a>(doc: &'a Html, sig: &CardSignature) -> Vec<Card<'a>> {
    let mut cards = Vec::new();
    for heading in doc.select(&CARD_HEADING) {
        let text = element_text(heading);
        if sig.denylist.contains(&text.as_str()) {
            continue;
        }
        match crate::parsers::ancestor_with_class(heading, "div", sig.container_class) {
            Some(container) => cards.push(Card {
                heading: text,
                heading_node: heading,
                node: container,
            }),
            None => debug!("Heading '{}' has no card container, dropping", text),
        }
    }
    cards
}

/// All records a run produces, plus how many cards had to be dropped.
#[derive(Debug)]
pub struct Harvest<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Run the assembler over every located card. A failing card is logged
/// with its heading text and counted, never propagated: one bad card must
/// not abort the batch.
pub fn assemble_cards<'a, T>(
    cards: Vec<Card<'a>>,
    assemble: impl Fn(&Card<'a>) -> Result<T, CardError>,
) -> Harvest<T> {
    let mut records = Vec::new();
    let mut skipped = 0;
    for card in &cards {
        match assemble(card) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Failed to parse card '{}': {}", card.heading, e);
                skipped += 1;
            }
        }
    }
    Harvest { records, skipped }
}
