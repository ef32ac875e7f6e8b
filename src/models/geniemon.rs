use serde::{Deserialize, Serialize};

use super::{CompanionType, Element};

/// One entry of the geniemon listing page. Rarity keeps the site's star
/// notation ("5★") rather than a tiered enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geniemon {
    pub name: String,
    #[serde(default = "Element::neutral")]
    pub element: Element,
    #[serde(default)]
    pub geniemon_type: CompanionType,
    #[serde(default = "unknown")]
    pub rarity: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub active_skill: String,
    #[serde(default)]
    pub cooldown: String,
    #[serde(default)]
    pub passive_skill: String,
    #[serde(default)]
    pub ascensions: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub lore: String,
}

fn unknown() -> String {
    super::UNKNOWN.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialization_fills_defaults() {
        let geniemon: Geniemon = serde_json::from_str(r#"{"name": "Fenny"}"#).unwrap();
        assert_eq!(geniemon.element, Element::Neutral);
        assert_eq!(geniemon.geniemon_type, CompanionType::Unknown);
        assert_eq!(geniemon.rarity, "Unknown");
        assert_eq!(geniemon.cooldown, "");
        assert!(geniemon.ascensions.is_empty());
    }

    #[test]
    fn star_rarity_survives_serialization() {
        let geniemon = Geniemon {
            name: "Fenny".to_string(),
            element: Element::Hydro,
            geniemon_type: CompanionType::Active,
            rarity: "5★".to_string(),
            image_url: String::new(),
            active_skill: "Summons a tide.".to_string(),
            cooldown: "30s".to_string(),
            passive_skill: String::new(),
            ascensions: vec!["Lv.20: Hydro Shard x3".to_string()],
            location: "Mistfall Valley".to_string(),
            lore: "A spirit of quiet rivers.".to_string(),
        };
        let json = serde_json::to_string_pretty(&geniemon).unwrap();
        assert!(json.contains("5★"));
        let back: Geniemon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, geniemon);
    }
}
