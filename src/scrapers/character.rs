use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{Character, Element, Rarity, Role, Tier};
use crate::parsers::{
    absolutize, class_attr, descendant_with_classes, element_text, labeled_tag_list,
};
use crate::scrapers::{CardError, CategoryScraper, Harvest, RunSummary};
use crate::storage::PageStore;

const CATEGORY: &str = "characters";

/// Character cards are anchors into the character section, not headed
/// card divs like the other listing pages.
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[href*="/character/"]"#).expect("Invalid character anchor selector")
});

static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.text-sm").expect("Invalid name selector"));

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.text-xs.text-gray-400.text-center").expect("Invalid meta selector")
});

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("Invalid img selector"));

static TIER_GRID_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.grid-cols-2").expect("Invalid tier grid selector"));

static TIER_ITEM_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.flex-col").expect("Invalid tier item selector"));

static TIER_LABEL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.font-bold.text-white").expect("Invalid tier label selector")
});

pub struct CharacterScraper {
    config: Arc<Config>,
    source: String,
}

impl CharacterScraper {
    pub fn new(config: Arc<Config>, source: Option<String>) -> Self {
        let source = source.unwrap_or_else(|| config.source_for(CATEGORY));
        Self { config, source }
    }
}

#[async_trait]
impl CategoryScraper for CharacterScraper {
    fn category_name(&self) -> String {
        CATEGORY.to_string()
    }

    async fn run(&self, client: &Client, store: &PageStore) -> Result<RunSummary> {
        info!("Scraping characters from {}", self.source);
        let html = store.load_page(client, CATEGORY, &self.source).await?;
        let doc = Html::parse_document(&html);
        let harvest = extract(&doc, &self.config.base_url);
        let output = store.save_json(&format!("{}.json", CATEGORY), &harvest.records)?;
        Ok(RunSummary {
            category: CATEGORY.to_string(),
            found: harvest.records.len(),
            skipped: harvest.skipped,
            output,
        })
    }
}

/// Pure extraction over an already-parsed character listing page.
pub fn extract(doc: &Html, base_url: &str) -> Harvest<Character> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for anchor in doc.select(&ANCHOR_SELECTOR) {
        let href = anchor.value().attr("href").unwrap_or("");
        if href.is_empty() || href.ends_with("/character/") {
            // The section index link, not an entity card.
            continue;
        }
        match assemble_character(anchor, href, base_url) {
            Ok(character) => records.push(character),
            Err(e) => {
                warn!("Failed to parse character card '{}': {}", href, e);
                skipped += 1;
            }
        }
    }

    Harvest { records, skipped }
}

fn assemble_character(
    anchor: ElementRef,
    href: &str,
    base_url: &str,
) -> Result<Character, CardError> {
    let name = anchor
        .select(&NAME_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();
    if name.is_empty() {
        return Err(CardError::MissingName);
    }

    let rarity = descendant_with_classes(anchor, "div", &["border-"])
        .map(|div| Rarity::from_border_class(class_attr(div)))
        .unwrap_or(Rarity::Unknown);

    // Element and role share one "Pyro | DPS" line under the portrait.
    let mut element = Element::Unknown;
    let mut role = Role::Unknown;
    if let Some(meta) = anchor.select(&META_SELECTOR).next() {
        let text = element_text(meta);
        let parts: Vec<&str> = text.split('|').map(str::trim).collect();
        if parts.len() >= 2 {
            element = Element::from_name(parts[0]).unwrap_or(Element::Unknown);
            role = Role::from_name(parts[1]);
        }
    }

    let image_url = anchor
        .select(&IMG_SELECTOR)
        .next()
        .and_then(|img| img.value().attr("src"))
        .unwrap_or("")
        .to_string();

    // Proficiency, features, and tier hide in the hover tooltip.
    let mut proficiency = Vec::new();
    let mut features = Vec::new();
    let mut tier = Tier::default();
    if let Some(tooltip) = descendant_with_classes(anchor, "div", &["group-hover:flex"]) {
        proficiency = labeled_tag_list(tooltip, "Proficiency:");
        features = labeled_tag_list(tooltip, "Feature:");
        tier = extract_tier(tooltip);
    }

    Ok(Character {
        name,
        element,
        role,
        rarity,
        proficiency,
        features,
        tier,
        image_url,
        url: absolutize(base_url, href),
    })
}

fn extract_tier(tooltip: ElementRef) -> Tier {
    let mut tier = Tier::default();
    if let Some(grid) = tooltip.select(&TIER_GRID_SELECTOR).next() {
        for item in grid.select(&TIER_ITEM_SELECTOR) {
            let label = item.select(&TIER_LABEL_SELECTOR).next().map(element_text);
            let value = descendant_with_classes(item, "span", &["bg-"]).map(element_text);
            if let (Some(label), Some(value)) = (label, value) {
                if label.contains("Farming") {
                    tier.farming = value;
                } else if label.contains("Boss") {
                    tier.boss = value;
                }
            }
        }
    }
    tier
}
