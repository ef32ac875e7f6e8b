use serde::{Deserialize, Serialize};

use super::Element;

/// One entry of the demon wedge listing page. Polarity is the bare glyph
/// shown on the card (◊, ◬, ☽, ⊙), empty when the card carries none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemonWedge {
    pub name: String,
    #[serde(default = "unknown")]
    pub subtype: String,
    #[serde(default = "unknown")]
    pub rarity: String,
    #[serde(default = "unknown")]
    pub restriction: String,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub polarity: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub main_attributes: Vec<String>,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub tolerance: String,
    #[serde(default)]
    pub track: String,
    #[serde(default)]
    pub source: String,
}

fn unknown() -> String {
    super::UNKNOWN.to_string()
}
