use scraper::ElementRef;

use super::{class_attr, element_text};
use crate::models::{ATTACK_TYPES, ELEMENT_NAMES};

/// A small inline chip on a card encoding one categorical attribute.
/// Which attribute is only recoverable from incidental styling, glyphs,
/// or vocabulary membership of its text.
#[derive(Debug, Clone)]
pub struct Badge {
    pub text: String,
    pub classes: String,
    pub polarity_tagged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRole {
    Element,
    AttackType,
    WeaponType,
    CompanionType,
    Restriction,
    Rarity,
    Polarity,
}

/// One classification rule: first rule whose predicate matches decides
/// the badge's role, so rule order encodes precedence.
pub struct BadgeRule {
    pub role: BadgeRole,
    pub applies: fn(&Badge) -> bool,
}

fn type_styled(badge: &Badge) -> bool {
    badge.classes.contains("bg-gray-700")
}

fn starred(badge: &Badge) -> bool {
    badge.text.contains('★')
}

fn polarity_tagged(badge: &Badge) -> bool {
    badge.polarity_tagged
}

fn element_name(badge: &Badge) -> bool {
    ELEMENT_NAMES.contains(&badge.text.as_str())
}

/// Wedges never carry a Neutral element badge.
fn attuned_element_name(badge: &Badge) -> bool {
    badge.text != "Neutral" && element_name(badge)
}

fn attack_type_name(badge: &Badge) -> bool {
    ATTACK_TYPES.contains(&badge.text.as_str())
}

/// The gray type chip outranks vocabulary matches: a weapon type named
/// like an element still classifies as the weapon type.
pub const WEAPON_BADGE_RULES: &[BadgeRule] = &[
    BadgeRule { role: BadgeRole::WeaponType, applies: type_styled },
    BadgeRule { role: BadgeRole::Element, applies: element_name },
    BadgeRule { role: BadgeRole::AttackType, applies: attack_type_name },
];

pub const GENIEMON_BADGE_RULES: &[BadgeRule] = &[
    BadgeRule { role: BadgeRole::CompanionType, applies: type_styled },
    BadgeRule { role: BadgeRole::Rarity, applies: starred },
    BadgeRule { role: BadgeRole::Element, applies: element_name },
];

pub const WEDGE_BADGE_RULES: &[BadgeRule] = &[
    BadgeRule { role: BadgeRole::Rarity, applies: starred },
    BadgeRule { role: BadgeRole::Restriction, applies: type_styled },
    BadgeRule { role: BadgeRole::Polarity, applies: polarity_tagged },
    BadgeRule { role: BadgeRole::Element, applies: attuned_element_name },
];

/// All badge spans of a card, in document order. Badges are the spans
/// carrying both `px-2` and `py-1` in their class list.
pub fn collect_badges(card: ElementRef) -> Vec<Badge> {
    let mut badges = Vec::new();
    for node in card.descendants() {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() != "span" {
                continue;
            }
            let classes = class_attr(el);
            if classes.contains("px-2") && classes.contains("py-1") {
                badges.push(Badge {
                    text: element_text(el),
                    classes: classes.to_string(),
                    polarity_tagged: el.value().attr("title") == Some("Polarity"),
                });
            }
        }
    }
    badges
}

/// Role of a badge under the given rule set, or None for badges no rule
/// claims (those are silently ignored by assemblers).
pub fn classify(badge: &Badge, rules: &[BadgeRule]) -> Option<BadgeRole> {
    rules
        .iter()
        .find(|rule| (rule.applies)(badge))
        .map(|rule| rule.role)
}
