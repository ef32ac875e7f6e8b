use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::models::{BaseStat, CharacterDetail, Profile, Skill, SkillStat, Trait, UNKNOWN};
use crate::parsers::{element_text, following_elements, has_class_substr};
use crate::scrapers::{CategoryScraper, RunSummary};
use crate::storage::PageStore;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Invalid title selector"));

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("Invalid img selector"));

static DATA_TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.table-auto").expect("Invalid data table selector"));

static BASE_STATS_HEADER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2#base-stats").expect("Invalid base stats selector"));

static SKILL_HEADER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2#skill").expect("Invalid skill header selector"));

static SKILL_TYPE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("b.bg-gray-800").expect("Invalid skill type selector"));

static BOLD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("b").expect("Invalid bold selector"));

static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.text-white").expect("Invalid description selector"));

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Invalid table selector"));

static BODY_ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody tr").expect("Invalid body row selector"));

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Invalid row selector"));

static HEADER_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("Invalid header cell selector"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Invalid cell selector"));

pub struct CharacterDetailScraper {
    slug: String,
    source: String,
}

impl CharacterDetailScraper {
    pub fn new(config: Arc<Config>, slug: &str, source: Option<String>) -> Self {
        let source = source.unwrap_or_else(|| {
            format!(
                "{}/games/duet-night-abyss/character/{}/",
                config.base_url, slug
            )
        });
        Self {
            slug: slug.to_string(),
            source,
        }
    }
}

#[async_trait]
impl CategoryScraper for CharacterDetailScraper {
    fn category_name(&self) -> String {
        format!("character_{}", self.slug)
    }

    async fn run(&self, client: &Client, store: &PageStore) -> Result<RunSummary> {
        info!("Scraping character detail from {}", self.source);
        let html = store
            .load_page(client, &self.category_name(), &self.source)
            .await?;
        let doc = Html::parse_document(&html);
        let detail = extract(&doc, &self.source, &self.slug);
        let output = store.save_json(
            &format!("{}_detail.json", self.slug),
            std::slice::from_ref(&detail),
        )?;
        Ok(RunSummary {
            category: self.category_name(),
            found: 1,
            skipped: 0,
            output,
        })
    }
}

/// Pure extraction over an already-parsed character detail page.
pub fn extract(doc: &Html, source: &str, fallback_slug: &str) -> CharacterDetail {
    let name = doc
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .and_then(|t| t.split('|').next().map(|n| n.trim().to_string()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let slug = if source.starts_with("http") && source.contains("character/") {
        source
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(fallback_slug)
            .to_string()
    } else {
        fallback_slug.to_string()
    };

    let url = if source.starts_with("http") {
        source.to_string()
    } else {
        String::new()
    };

    // The hero portrait is the image alt-ed with the character's name.
    let image_url = doc
        .select(&IMG_SELECTOR)
        .find(|img| img.value().attr("alt") == Some(name.as_str()))
        .and_then(|img| img.value().attr("src"))
        .unwrap_or("")
        .to_string();

    CharacterDetail {
        name,
        slug,
        url,
        image_url,
        profile: extract_profile(doc),
        traits: extract_traits(doc),
        base_stats: extract_base_stats(doc),
        skills: extract_skills(doc),
    }
}

/// First two-column table carrying a "Gender" row is the profile.
fn extract_profile(doc: &Html) -> Option<Profile> {
    for table in doc.select(&DATA_TABLE_SELECTOR) {
        let mut fields: HashMap<String, String> = HashMap::new();
        for row in table.select(&ROW_SELECTOR) {
            let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
            if cells.len() == 2 {
                fields.insert(element_text(cells[0]).to_lowercase(), element_text(cells[1]));
            }
        }
        if fields.contains_key("gender") {
            return Some(Profile {
                gender: fields.remove("gender").unwrap_or_default(),
                birthplace: fields.remove("birthplace").unwrap_or_default(),
                birthday: fields.remove("birthday").unwrap_or_default(),
                allegiance: fields.remove("allegiance").unwrap_or_default(),
            });
        }
    }
    None
}

/// Trait tables are recognized by their NAME and EFFECT column headers.
fn extract_traits(doc: &Html) -> Vec<Trait> {
    let mut traits = Vec::new();
    for table in doc.select(&DATA_TABLE_SELECTOR) {
        let headers: Vec<String> = table.select(&HEADER_CELL_SELECTOR).map(element_text).collect();
        if !headers.iter().any(|h| h == "NAME") || !headers.iter().any(|h| h == "EFFECT") {
            continue;
        }
        for row in table.select(&BODY_ROW_SELECTOR) {
            let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
            if cells.len() >= 2 {
                traits.push(Trait {
                    name: element_text(cells[0]),
                    effect: element_text(cells[1]),
                });
            }
        }
    }
    traits
}

fn extract_base_stats(doc: &Html) -> Vec<BaseStat> {
    let mut stats = Vec::new();
    if let Some(header) = doc.select(&BASE_STATS_HEADER_SELECTOR).next() {
        let table = following_elements(doc.root_element(), header)
            .into_iter()
            .find(|el| el.value().name() == "table" && has_class_substr(*el, "table-auto"));
        if let Some(table) = table {
            for row in table.select(&BODY_ROW_SELECTOR) {
                let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
                if cells.len() == 3 {
                    stats.push(BaseStat {
                        stat: element_text(cells[0]),
                        level_1: element_text(cells[1]),
                        level_max: element_text(cells[2]),
                    });
                } else if cells.len() == 2 && cells[0].value().attr("colspan").is_some() {
                    // Full-width rows (Feature, Weapon Proficiency) carry
                    // one value for both level columns.
                    let value = element_text(cells[1]);
                    stats.push(BaseStat {
                        stat: element_text(cells[0]),
                        level_1: value.clone(),
                        level_max: value,
                    });
                }
            }
        }
    }
    stats
}

fn extract_skills(doc: &Html) -> Vec<Skill> {
    let mut skills = Vec::new();
    if let Some(header) = doc.select(&SKILL_HEADER_SELECTOR).next() {
        let grid = following_elements(doc.root_element(), header)
            .into_iter()
            .find(|el| el.value().name() == "div" && has_class_substr(*el, "grid"));
        if let Some(grid) = grid {
            for container in grid.children().filter_map(ElementRef::wrap) {
                if container.value().name() != "div" {
                    continue;
                }
                if let Some(skill) = assemble_skill(container) {
                    skills.push(skill);
                }
            }
        }
    }
    skills
}

fn assemble_skill(container: ElementRef) -> Option<Skill> {
    // A block without a type chip is layout filler, not a skill.
    let type_el = container.select(&SKILL_TYPE_SELECTOR).next()?;
    let kind = element_text(type_el);

    // The type chip is bold too; the name is the first other bold node.
    let name = container
        .select(&BOLD_SELECTOR)
        .find(|b| b.id() != type_el.id() && has_class_substr(*b, "font-bold"))
        .map(element_text)
        .unwrap_or_else(|| UNKNOWN.to_string());

    let description = container
        .select(&DESCRIPTION_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let mut stats = BTreeMap::new();
    if let Some(table) = container.select(&TABLE_SELECTOR).next() {
        for row in table.select(&BODY_ROW_SELECTOR) {
            let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
            if cells.len() == 3 {
                stats.insert(
                    element_text(cells[0]),
                    SkillStat {
                        level_1: element_text(cells[1]),
                        level_max: element_text(cells[2]),
                    },
                );
            }
        }
    }

    Some(Skill {
        name,
        kind,
        description,
        stats,
    })
}
