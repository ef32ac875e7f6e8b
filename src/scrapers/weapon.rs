use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::models::{Element, Weapon, UNKNOWN};
use crate::parsers::{
    ancestor_tag, background_image_url, classify, collect_badges, element_text, find_heading,
    list_after_heading, split_key_value, BadgeRole, WEAPON_BADGE_RULES,
};
use crate::scrapers::{
    assemble_cards, locate_cards, Card, CardError, CardSignature, CategoryScraper, Harvest,
    RunSummary,
};
use crate::storage::PageStore;

const CATEGORY: &str = "weapons";

const SIGNATURE: CardSignature = CardSignature {
    denylist: &["WEAPON", "Element", "Type", "Attack Type"],
    container_class: "bg-gray-900",
};

pub struct WeaponScraper {
    config: Arc<Config>,
    source: String,
}

impl WeaponScraper {
    pub fn new(config: Arc<Config>, source: Option<String>) -> Self {
        let source = source.unwrap_or_else(|| config.source_for(CATEGORY));
        Self { config, source }
    }
}

#[async_trait]
impl CategoryScraper for WeaponScraper {
    fn category_name(&self) -> String {
        CATEGORY.to_string()
    }

    async fn run(&self, client: &Client, store: &PageStore) -> Result<RunSummary> {
        info!("Scraping weapons from {}", self.source);
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

/// Pure extraction over an already-parsed weapon listing page.
pub fn extract(doc: &Html, base_url: &str) -> Harvest<Weapon> {
    let cards = locate_cards(doc, &SIGNATURE);
    assemble_cards(cards, |card| assemble_weapon(card, base_url))
}

fn assemble_weapon(card: &Card, base_url: &str) -> Result<Weapon, CardError> {
    if card.heading.is_empty() {
        return Err(CardError::MissingName);
    }

    let mut element = None;
    let mut weapon_type = None;
    let mut attack_type = None;

    for badge in collect_badges(card.node) {
        match classify(&badge, WEAPON_BADGE_RULES) {
            Some(BadgeRole::WeaponType) if weapon_type.is_none() => weapon_type = Some(badge.text),
            Some(BadgeRole::Element) if element.is_none() => {
                element = Element::from_name(&badge.text);
            }
            Some(BadgeRole::AttackType) if attack_type.is_none() => attack_type = Some(badge.text),
            _ => {}
        }
    }

    Ok(Weapon {
        name: card.heading.clone(),
        element: element.unwrap_or(Element::Neutral),
        weapon_type: weapon_type.unwrap_or_else(|| UNKNOWN.to_string()),
        attack_type: attack_type.unwrap_or_else(|| UNKNOWN.to_string()),
        image_url: background_image_url(card.node, base_url),
        skill: skill_text(card.node),
        base_stats: key_value_items(card.node, "Stats", false),
        attributes: key_value_items(card.node, "Attributes", true),
    })
}

/// The skill blurb shares a div with its "Skill" heading; strip the
/// heading's text off the front.
fn skill_text(card: ElementRef) -> String {
    if let Some(heading) = find_heading(card, "h3", "Skill", true) {
        if let Some(holder) = ancestor_tag(heading, "div") {
            return element_text(holder).replacen("Skill", "", 1).trim().to_string();
        }
    }
    String::new()
}

fn key_value_items(card: ElementRef, heading: &str, exact: bool) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for item in list_after_heading(card, heading, exact) {
        if let Some((key, value)) = split_key_value(&item) {
            map.insert(key, value);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://boarhat.gg";

    fn weapon_page(card_body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div class="p-4 bg-gray-900 rounded">{}</div></body></html>"#,
            card_body
        ))
    }

    #[test]
    fn badges_fill_element_attack_and_type() {
        let doc = weapon_page(
            r#"<h2 class="text-xl font-bold text-white">Moonpiercer</h2>
               <span class="px-2 py-1 rounded bg-red-500">Pyro</span>
               <span class="px-2 py-1 rounded">Slash</span>
               <span class="px-2 py-1 rounded bg-gray-700">Sword</span>"#,
        );
        let harvest = extract(&doc, BASE);
        assert_eq!(harvest.skipped, 0);
        let weapon = &harvest.records[0];
        assert_eq!(weapon.name, "Moonpiercer");
        assert_eq!(weapon.element, Element::Pyro);
        assert_eq!(weapon.attack_type, "Slash");
        assert_eq!(weapon.weapon_type, "Sword");
    }

    #[test]
    fn gray_chip_wins_over_element_vocabulary() {
        // A type chip whose text collides with an element name must still
        // land in weapon_type, leaving the element at Neutral.
        let doc = weapon_page(
            r#"<h2 class="text-xl font-bold text-white">Oddity</h2>
               <span class="px-2 py-1 bg-gray-700">Pyro</span>"#,
        );
        let harvest = extract(&doc, BASE);
        let weapon = &harvest.records[0];
        assert_eq!(weapon.weapon_type, "Pyro");
        assert_eq!(weapon.element, Element::Neutral);
    }

    #[test]
    fn column_label_headings_are_excluded() {
        let doc = weapon_page(r#"<h2 class="text-xl font-bold text-white">WEAPON</h2>"#);
        let harvest = extract(&doc, BASE);
        assert!(harvest.records.is_empty());
        assert_eq!(harvest.skipped, 0);
    }

    #[test]
    fn skill_text_drops_heading_prefix() {
        let doc = weapon_page(
            r#"<h2 class="text-xl font-bold text-white">Moonpiercer</h2>
               <div><h3>Skill</h3> Ignites the target on hit.</div>"#,
        );
        let harvest = extract(&doc, BASE);
        let weapon = &harvest.records[0];
        assert_eq!(weapon.skill, "Ignites the target on hit.");
    }

    #[test]
    fn stats_and_attributes_become_normalized_maps() {
        let doc = weapon_page(
            r#"<h2 class="text-xl font-bold text-white">Moonpiercer</h2>
               <div><h3>Base Stats</h3><ul><li>Base ATK: 42</li><li>Crit Rate: 5%</li></ul></div>
               <div><h3>Attributes</h3><ul><li>Fire-Rate: 1.2</li></ul></div>"#,
        );
        let harvest = extract(&doc, BASE);
        let weapon = &harvest.records[0];
        assert_eq!(weapon.base_stats.get("base_atk"), Some(&"42".to_string()));
        assert_eq!(weapon.base_stats.get("crit_rate"), Some(&"5%".to_string()));
        assert_eq!(weapon.attributes.get("fire_rate"), Some(&"1.2".to_string()));
    }

    #[test]
    fn background_image_is_absolutized() {
        let doc = weapon_page(
            r#"<h2 class="text-xl font-bold text-white">Moonpiercer</h2>
               <div style="background-image:url(/images/weapons/moonpiercer.png)"></div>"#,
        );
        let harvest = extract(&doc, BASE);
        let weapon = &harvest.records[0];
        assert_eq!(
            weapon.image_url,
            "https://boarhat.gg/images/weapons/moonpiercer.png"
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let doc = weapon_page(
            r#"<h2 class="text-xl font-bold text-white">Moonpiercer</h2>
               <span class="px-2 py-1 bg-gray-700">Sword</span>"#,
        );
        let first = extract(&doc, BASE);
        let second = extract(&doc, BASE);
        assert_eq!(first.records, second.records);
        assert_eq!(first.skipped, second.skipped);
    }
}
