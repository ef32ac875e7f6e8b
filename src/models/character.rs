use serde::{Deserialize, Serialize};

use super::{Element, Rarity, Role};

/// Tier placement across the two endgame modes. "TBD" until the site
/// publishes a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    #[serde(default = "Tier::tbd")]
    pub farming: String,
    #[serde(default = "Tier::tbd")]
    pub boss: String,
}

impl Tier {
    fn tbd() -> String {
        "TBD".to_string()
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self {
            farming: Tier::tbd(),
            boss: Tier::tbd(),
        }
    }
}

/// One entry of the character listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub proficiency: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub url: String,
}
