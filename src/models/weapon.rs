use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Element;

/// One entry of the weapon listing page. Stats and attributes are
/// normalized key → display-value maps ("base_atk" → "42").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    #[serde(default = "Element::neutral")]
    pub element: Element,
    #[serde(default = "unknown")]
    pub weapon_type: String,
    #[serde(default = "unknown")]
    pub attack_type: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub base_stats: BTreeMap<String, String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
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
        let weapon: Weapon = serde_json::from_str(r#"{"name": "Moonpiercer"}"#).unwrap();
        assert_eq!(weapon.element, Element::Neutral);
        assert_eq!(weapon.weapon_type, "Unknown");
        assert_eq!(weapon.attack_type, "Unknown");
        assert!(weapon.base_stats.is_empty());
    }

    #[test]
    fn round_trips_through_json() {
        let mut base_stats = BTreeMap::new();
        base_stats.insert("base_atk".to_string(), "42".to_string());
        let weapon = Weapon {
            name: "Moonpiercer".to_string(),
            element: Element::Pyro,
            weapon_type: "Sword".to_string(),
            attack_type: "Slash".to_string(),
            image_url: "https://boarhat.gg/images/moonpiercer.png".to_string(),
            skill: "Ignites on hit.".to_string(),
            base_stats,
            attributes: BTreeMap::new(),
        };
        let json = serde_json::to_string(&weapon).unwrap();
        let back: Weapon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, weapon);
    }
}
