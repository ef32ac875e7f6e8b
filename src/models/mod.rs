pub mod character;
pub mod character_detail;
pub mod demon_wedge;
pub mod geniemon;
pub mod weapon;

pub use character::{Character, Tier};
pub use character_detail::{BaseStat, CharacterDetail, Profile, Skill, SkillStat, Trait};
pub use demon_wedge::DemonWedge;
pub use geniemon::Geniemon;
pub use weapon::Weapon;

use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN: &str = "Unknown";

/// Closed element vocabulary, shared between card location and badge
/// classification so the two never drift apart.
pub const ELEMENT_NAMES: [&str; 7] = [
    "Pyro", "Anemo", "Hydro", "Lumino", "Electro", "Umbro", "Neutral",
];

pub const ATTACK_TYPES: [&str; 3] = ["Slash", "Spike", "Smash"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Pyro,
    Anemo,
    Hydro,
    Lumino,
    Electro,
    Umbro,
    Neutral,
    Unknown,
}

impl Element {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Pyro" => Some(Element::Pyro),
            "Anemo" => Some(Element::Anemo),
            "Hydro" => Some(Element::Hydro),
            "Lumino" => Some(Element::Lumino),
            "Electro" => Some(Element::Electro),
            "Umbro" => Some(Element::Umbro),
            "Neutral" => Some(Element::Neutral),
            _ => None,
        }
    }

    /// Default for categories where an unbadged entry means "no element".
    pub fn neutral() -> Self {
        Element::Neutral
    }
}

impl Default for Element {
    fn default() -> Self {
        Element::Unknown
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Pyro => "Pyro",
            Element::Anemo => "Anemo",
            Element::Hydro => "Hydro",
            Element::Lumino => "Lumino",
            Element::Electro => "Electro",
            Element::Umbro => "Umbro",
            Element::Neutral => "Neutral",
            Element::Unknown => UNKNOWN,
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "DPS")]
    Dps,
    Support,
    Unknown,
}

impl Role {
    pub fn from_name(name: &str) -> Self {
        match name {
            "DPS" => Role::Dps,
            "Support" => Role::Support,
            _ => Role::Unknown,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Unknown
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Dps => write!(f, "DPS"),
            Role::Support => write!(f, "Support"),
            Role::Unknown => write!(f, "{}", UNKNOWN),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "SSR")]
    Ssr,
    #[serde(rename = "SR")]
    Sr,
    R,
    Unknown,
}

impl Rarity {
    /// Character cards encode rarity as the portrait's border color class.
    pub fn from_border_class(classes: &str) -> Self {
        if classes.contains("border-red-400") {
            Rarity::Ssr
        } else if classes.contains("border-green-400") {
            Rarity::Sr
        } else if classes.contains("border-blue-400") {
            Rarity::R
        } else {
            Rarity::Unknown
        }
    }
}

impl Default for Rarity {
    fn default() -> Self {
        Rarity::Unknown
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rarity::Ssr => write!(f, "SSR"),
            Rarity::Sr => write!(f, "SR"),
            Rarity::R => write!(f, "R"),
            Rarity::Unknown => write!(f, "{}", UNKNOWN),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanionType {
    Active,
    Inactive,
    Unknown,
}

impl CompanionType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Active" => CompanionType::Active,
            "Inactive" => CompanionType::Inactive,
            _ => CompanionType::Unknown,
        }
    }
}

impl Default for CompanionType {
    fn default() -> Self {
        CompanionType::Unknown
    }
}

impl fmt::Display for CompanionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanionType::Active => write!(f, "Active"),
            CompanionType::Inactive => write!(f, "Inactive"),
            CompanionType::Unknown => write!(f, "{}", UNKNOWN),
        }
    }
}
