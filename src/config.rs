use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    /// Default listing URL per category key.
    pub sources: HashMap<String, String>,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    pub user_agent: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let base_url = "https://boarhat.gg".to_string();
        let game_root = format!("{}/games/duet-night-abyss", base_url);

        let mut sources = HashMap::new();
        sources.insert("characters".to_string(), format!("{}/character/", game_root));
        sources.insert("weapons".to_string(), format!("{}/weapon/", game_root));
        sources.insert("geniemon".to_string(), format!("{}/geniemon/", game_root));
        sources.insert(
            "demon_wedges".to_string(),
            format!("{}/demon-wedge/", game_root),
        );

        Ok(Config {
            base_url,
            sources,
            cache_dir: PathBuf::from("data/raw"),
            output_dir: PathBuf::from("data/processed"),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        })
    }

    /// Default source URL for a category. Categories are fixed at compile
    /// time, so a missing key is a programming error.
    pub fn source_for(&self, category: &str) -> String {
        self.sources
            .get(category)
            .cloned()
            .unwrap_or_else(|| panic!("No source configured for category '{}'", category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_list_category_has_a_source() {
        let config = Config::load().unwrap();
        for category in ["characters", "weapons", "geniemon", "demon_wedges"] {
            assert!(config.source_for(category).starts_with("https://boarhat.gg"));
        }
    }
}
