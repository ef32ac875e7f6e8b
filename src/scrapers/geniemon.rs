use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::models::{CompanionType, Element, Geniemon, UNKNOWN};
use crate::parsers::{
    background_image_url, classify, collect_badges, descendant_with_classes, element_text,
    list_after_heading, text_after_heading, BadgeRole, GENIEMON_BADGE_RULES,
};
use crate::scrapers::{
    assemble_cards, locate_cards, Card, CardError, CardSignature, CategoryScraper, Harvest,
    RunSummary,
};
use crate::storage::PageStore;

const CATEGORY: &str = "geniemon";

const SIGNATURE: CardSignature = CardSignature {
    denylist: &["GENIEMON", "Element", "Type", "Rarity"],
    container_class: "bg-gray-900",
};

pub struct GeniemonScraper {
    config: Arc<Config>,
    source: String,
}

impl GeniemonScraper {
    pub fn new(config: Arc<Config>, source: Option<String>) -> Self {
        let source = source.unwrap_or_else(|| config.source_for(CATEGORY));
        Self { config, source }
    }
}

#[async_trait]
impl CategoryScraper for GeniemonScraper {
    fn category_name(&self) -> String {
        CATEGORY.to_string()
    }

    async fn run(&self, client: &Client, store: &PageStore) -> Result<RunSummary> {
        info!("Scraping geniemon from {}", self.source);
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

/// Pure extraction over an already-parsed geniemon listing page.
pub fn extract(doc: &Html, base_url: &str) -> Harvest<Geniemon> {
    let cards = locate_cards(doc, &SIGNATURE);
    assemble_cards(cards, |card| assemble_geniemon(card, base_url))
}

fn assemble_geniemon(card: &Card, base_url: &str) -> Result<Geniemon, CardError> {
    if card.heading.is_empty() {
        return Err(CardError::MissingName);
    }

    let mut element = None;
    let mut geniemon_type = None;
    let mut rarity = None;

    for badge in collect_badges(card.node) {
        match classify(&badge, GENIEMON_BADGE_RULES) {
            Some(BadgeRole::CompanionType) if geniemon_type.is_none() => {
                geniemon_type = Some(CompanionType::from_name(&badge.text));
            }
            Some(BadgeRole::Rarity) if rarity.is_none() => rarity = Some(badge.text),
            Some(BadgeRole::Element) if element.is_none() => {
                element = Element::from_name(&badge.text);
            }
            _ => {}
        }
    }

    Ok(Geniemon {
        name: card.heading.clone(),
        element: element.unwrap_or(Element::Neutral),
        geniemon_type: geniemon_type.unwrap_or(CompanionType::Unknown),
        rarity: rarity.unwrap_or_else(|| UNKNOWN.to_string()),
        image_url: background_image_url(card.node, base_url),
        active_skill: text_after_heading(card.node, "Active Skill", false),
        cooldown: text_after_heading(card.node, "Cooldown", true),
        passive_skill: text_after_heading(card.node, "Passive Skill", false),
        ascensions: list_after_heading(card.node, "Smelt", true),
        location: text_after_heading(card.node, "Location", true),
        lore: lore_text(card.node),
    })
}

/// The flavor text sits in the card's italic footer div.
fn lore_text(card: ElementRef) -> String {
    descendant_with_classes(card, "div", &["italic"])
        .map(element_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://boarhat.gg";

    fn geniemon_page(card_body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div class="p-4 bg-gray-900 rounded">{}</div></body></html>"#,
            card_body
        ))
    }

    #[test]
    fn full_card_is_assembled() {
        let doc = geniemon_page(
            r#"<h2 class="text-xl font-bold text-white">Fenny</h2>
               <span class="px-2 py-1 bg-blue-500">Hydro</span>
               <span class="px-2 py-1 bg-gray-700">Active</span>
               <span class="px-2 py-1 text-yellow-400">5★</span>
               <div style="background-image:url(/images/geniemon/fenny.png)"></div>
               <div><h3>Active Skill (Lv.1)</h3><p>Summons a tide.</p></div>
               <div><h3>Cooldown</h3><p>30s</p></div>
               <div><h3>Passive Skill</h3><p>Boosts Hydro DMG.</p></div>
               <div><h3>Smelt</h3><ul><li>Lv.20: Hydro Shard x3</li><li>Lv.40: Hydro Core x1</li></ul></div>
               <div><h3>Location</h3><p>Mistfall Valley</p></div>
               <div class="italic text-gray-500">A spirit of quiet rivers.</div>"#,
        );
        let harvest = extract(&doc, BASE);
        assert_eq!(harvest.skipped, 0);
        let geniemon = &harvest.records[0];
        assert_eq!(geniemon.name, "Fenny");
        assert_eq!(geniemon.element, Element::Hydro);
        assert_eq!(geniemon.geniemon_type, CompanionType::Active);
        assert_eq!(geniemon.rarity, "5★");
        assert_eq!(
            geniemon.image_url,
            "https://boarhat.gg/images/geniemon/fenny.png"
        );
        assert_eq!(geniemon.active_skill, "Summons a tide.");
        assert_eq!(geniemon.cooldown, "30s");
        assert_eq!(geniemon.passive_skill, "Boosts Hydro DMG.");
        assert_eq!(
            geniemon.ascensions,
            vec!["Lv.20: Hydro Shard x3".to_string(), "Lv.40: Hydro Core x1".to_string()]
        );
        assert_eq!(geniemon.location, "Mistfall Valley");
        assert_eq!(geniemon.lore, "A spirit of quiet rivers.");
    }

    #[test]
    fn missing_cooldown_heading_yields_empty_string() {
        let doc = geniemon_page(
            r#"<h2 class="text-xl font-bold text-white">Fenny</h2>
               <div><h3>Active Skill</h3><p>Summons a tide.</p></div>"#,
        );
        let harvest = extract(&doc, BASE);
        assert_eq!(harvest.skipped, 0);
        assert_eq!(harvest.records[0].cooldown, "");
    }

    #[test]
    fn badge_free_card_gets_neutral_defaults() {
        let doc = geniemon_page(r#"<h2 class="text-xl font-bold text-white">Fenny</h2>"#);
        let harvest = extract(&doc, BASE);
        let geniemon = &harvest.records[0];
        assert_eq!(geniemon.element, Element::Neutral);
        assert_eq!(geniemon.geniemon_type, CompanionType::Unknown);
        assert_eq!(geniemon.rarity, "Unknown");
    }

    #[test]
    fn column_label_headings_are_excluded() {
        let doc = geniemon_page(r#"<h2 class="text-xl font-bold text-white">GENIEMON</h2>"#);
        let harvest = extract(&doc, BASE);
        assert!(harvest.records.is_empty());
        assert_eq!(harvest.skipped, 0);
    }
}
