use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::env;
use std::fs;

/// Probe a saved boarhat.gg page for the markup shapes the scrapers rely
/// on. Handy when the site restyles and selectors stop matching.
fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .context("Usage: analyze_html <saved-page.html>")?;

    let html = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;
    let document = Html::parse_document(&html);

    let card_headings = Selector::parse("h2.text-xl.font-bold.text-white").unwrap();
    let headings: Vec<String> = document
        .select(&card_headings)
        .map(|h| h.text().collect::<String>().trim().to_string())
        .collect();
    println!("Found {} card headings", headings.len());
    for heading in &headings {
        println!("  h2: {}", heading);
    }

    let character_anchors = Selector::parse(r#"a[href*="/character/"]"#).unwrap();
    println!(
        "Found {} character anchors",
        document.select(&character_anchors).count()
    );

    // Other shapes worth watching when the layout shifts
    let probes = vec![
        ("card containers", "div.bg-gray-900"),
        ("badge spans", "span.px-2.py-1"),
        ("data tables", "table.table-auto"),
        ("base stats header", "h2#base-stats"),
        ("skill header", "h2#skill"),
    ];

    for (label, selector_str) in probes {
        if let Ok(selector) = Selector::parse(selector_str) {
            let count = document.select(&selector).count();
            if count > 0 {
                println!("Selector '{}' ({}) matched {} elements", selector_str, label, count);
            }
        }
    }

    Ok(())
}
