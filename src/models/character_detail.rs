use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Biography table found on most character pages. Absent entirely when the
/// page carries no profile table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub birthplace: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub allegiance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    pub effect: String,
}

/// One row of the base-stats table: value at level 1 and at level cap.
/// Full-width label rows (Feature, Weapon Proficiency) carry the same
/// value in both columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub stat: String,
    pub level_1: String,
    pub level_max: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillStat {
    pub level_1: String,
    pub level_max: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Type tag as displayed, e.g. "Skill - DMG" or "Ultimate - Buff".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stats: BTreeMap<String, SkillStat>,
}

/// Everything scraped from one character's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDetail {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub base_stats: Vec<BaseStat>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn skill_kind_serializes_as_type() {
        let skill = Skill {
            name: "Blazing Arc".to_string(),
            kind: "Skill - DMG".to_string(),
            description: "Sweeps the blade in a burning arc.".to_string(),
            stats: BTreeMap::new(),
        };
        let json = serde_json::to_string(&skill).unwrap();
        assert!(json.contains("\"type\":\"Skill - DMG\""));
    }

    #[test]
    fn profile_is_nullable() {
        let detail: CharacterDetail =
            serde_json::from_str(r#"{"name": "Berenica", "slug": "berenica"}"#).unwrap();
        assert_eq!(detail.profile, None);
        assert!(detail.traits.is_empty());
        assert!(detail.base_stats.is_empty());
        assert!(detail.skills.is_empty());
    }
}
