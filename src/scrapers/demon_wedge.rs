use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::models::{DemonWedge, Element, UNKNOWN};
use crate::parsers::{
    background_image_url, classify, collect_badges, descendant_with_classes, element_text,
    list_after_heading, next_sibling_tag, BadgeRole, WEDGE_BADGE_RULES,
};
use crate::scrapers::{
    assemble_cards, locate_cards, Card, CardError, CardSignature, CategoryScraper, Harvest,
    RunSummary,
};
use crate::storage::PageStore;

const CATEGORY: &str = "demon_wedges";

const SIGNATURE: CardSignature = CardSignature {
    denylist: &["DEMON WEDGE", "Polarity", "Restriction", "Source", "Rarity"],
    container_class: "bg-gray-900",
};

static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("Invalid p selector"));

pub struct DemonWedgeScraper {
    config: Arc<Config>,
    source: String,
}

impl DemonWedgeScraper {
    pub fn new(config: Arc<Config>, source: Option<String>) -> Self {
        let source = source.unwrap_or_else(|| config.source_for(CATEGORY));
        Self { config, source }
    }
}

#[async_trait]
impl CategoryScraper for DemonWedgeScraper {
    fn category_name(&self) -> String {
        CATEGORY.to_string()
    }

    async fn run(&self, client: &Client, store: &PageStore) -> Result<RunSummary> {
        info!("Scraping demon wedges from {}", self.source);
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

/// Pure extraction over an already-parsed demon wedge listing page.
pub fn extract(doc: &Html, base_url: &str) -> Harvest<DemonWedge> {
    let cards = locate_cards(doc, &SIGNATURE);
    assemble_cards(cards, |card| assemble_wedge(card, base_url))
}

fn assemble_wedge(card: &Card, base_url: &str) -> Result<DemonWedge, CardError> {
    if card.heading.is_empty() {
        return Err(CardError::MissingName);
    }

    // Subtype (Volition, Spectrum, ...) sits in the paragraph right after
    // the name heading.
    let subtype = next_sibling_tag(card.heading_node, "p")
        .map(element_text)
        .unwrap_or_else(|| UNKNOWN.to_string());

    let mut rarity = None;
    let mut restriction = None;
    let mut polarity = None;
    let mut element = None;

    for badge in collect_badges(card.node) {
        match classify(&badge, WEDGE_BADGE_RULES) {
            Some(BadgeRole::Rarity) if rarity.is_none() => rarity = Some(badge.text),
            Some(BadgeRole::Restriction) if restriction.is_none() => {
                restriction = Some(badge.text);
            }
            Some(BadgeRole::Polarity) if polarity.is_none() => polarity = Some(badge.text),
            Some(BadgeRole::Element) if element.is_none() => {
                element = Element::from_name(&badge.text);
            }
            _ => {}
        }
    }

    let (tolerance, track, source) = footer_fields(card.node);

    Ok(DemonWedge {
        name: card.heading.clone(),
        subtype,
        rarity: rarity.unwrap_or_else(|| UNKNOWN.to_string()),
        restriction: restriction.unwrap_or_else(|| UNKNOWN.to_string()),
        element: element.unwrap_or(Element::Unknown),
        polarity: polarity.unwrap_or_default(),
        image_url: background_image_url(card.node, base_url),
        main_attributes: non_empty(list_after_heading(card.node, "Main Attribute", true)),
        effects: non_empty(list_after_heading(card.node, "Effect", true)),
        tolerance,
        track,
        source,
    })
}

fn non_empty(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter(|t| !t.is_empty()).collect()
}

/// Tolerance, track, and source live as labeled paragraphs in the card's
/// small gray footer.
fn footer_fields(card: ElementRef) -> (String, String, String) {
    let mut tolerance = String::new();
    let mut track = String::new();
    let mut source = String::new();

    if let Some(info) = descendant_with_classes(card, "div", &["text-gray-400", "text-xs"]) {
        for p in info.select(&P_SELECTOR) {
            let text = element_text(p);
            if let Some(rest) = text.strip_prefix("Tolerance:") {
                tolerance = rest.trim().to_string();
            } else if let Some(rest) = text.strip_prefix("Track:") {
                track = rest.trim().to_string();
            } else if let Some(rest) = text.strip_prefix("Source:") {
                source = rest.trim().to_string();
            }
        }
    }

    (tolerance, track, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://boarhat.gg";

    fn wedge_page(card_body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div class="p-4 bg-gray-900 rounded">{}</div></body></html>"#,
            card_body
        ))
    }

    #[test]
    fn full_card_is_assembled() {
        let doc = wedge_page(
            r#"<div>
                 <h2 class="text-xl font-bold text-white">Hollow Crown</h2>
                 <p class="text-sm text-gray-400">Volition</p>
               </div>
               <span class="px-2 py-1 text-yellow-400">5★</span>
               <span class="px-2 py-1 bg-gray-700">Characters</span>
               <span class="px-2 py-1" title="Polarity">◬</span>
               <span class="px-2 py-1 bg-purple-500">Umbro</span>
               <div style="background-image:url(/images/wedges/hollow-crown.png)"></div>
               <div><h3>Main Attribute</h3><ul><li>HP +12%</li></ul></div>
               <div><h3>Effect</h3><ul><li>On kill, restore 3% HP.</li><li></li></ul></div>
               <div class="text-gray-400 text-xs">
                 <p>Tolerance: 8</p>
                 <p>Track: Nocturne</p>
                 <p>Source: Abyss Shop</p>
               </div>"#,
        );
        let harvest = extract(&doc, BASE);
        assert_eq!(harvest.skipped, 0);
        let wedge = &harvest.records[0];
        assert_eq!(wedge.name, "Hollow Crown");
        assert_eq!(wedge.subtype, "Volition");
        assert_eq!(wedge.rarity, "5★");
        assert_eq!(wedge.restriction, "Characters");
        assert_eq!(wedge.polarity, "◬");
        assert_eq!(wedge.element, Element::Umbro);
        assert_eq!(
            wedge.image_url,
            "https://boarhat.gg/images/wedges/hollow-crown.png"
        );
        assert_eq!(wedge.main_attributes, vec!["HP +12%".to_string()]);
        // The empty list item is dropped
        assert_eq!(wedge.effects, vec!["On kill, restore 3% HP.".to_string()]);
        assert_eq!(wedge.tolerance, "8");
        assert_eq!(wedge.track, "Nocturne");
        assert_eq!(wedge.source, "Abyss Shop");
    }

    #[test]
    fn subtype_defaults_to_unknown_without_sibling_paragraph() {
        let doc = wedge_page(r#"<h2 class="text-xl font-bold text-white">Hollow Crown</h2>"#);
        let harvest = extract(&doc, BASE);
        let wedge = &harvest.records[0];
        assert_eq!(wedge.subtype, "Unknown");
        assert_eq!(wedge.polarity, "");
        assert_eq!(wedge.element, Element::Unknown);
    }

    #[test]
    fn neutral_badge_never_sets_wedge_element() {
        let doc = wedge_page(
            r#"<h2 class="text-xl font-bold text-white">Hollow Crown</h2>
               <span class="px-2 py-1">Neutral</span>"#,
        );
        let harvest = extract(&doc, BASE);
        let wedge = &harvest.records[0];
        assert_eq!(wedge.element, Element::Unknown);
    }

    #[test]
    fn column_label_headings_are_excluded() {
        let doc = wedge_page(r#"<h2 class="text-xl font-bold text-white">Polarity</h2>"#);
        let harvest = extract(&doc, BASE);
        assert!(harvest.records.is_empty());
        assert_eq!(harvest.skipped, 0);
    }
}
