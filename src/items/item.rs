//! Item definitions
//!
//! Core item types, rarities, and the mundane base items that variants are layered onto.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Words that mark a unique artifact's power state rather than a composable item
const VESTIGE_WORDS: &[&str] = &["vestige", "dormant", "awakened", "exalted"];

/// Item rarity tiers, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rarity {
    None,       // Mundane gear, no rarity at all
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
    Artifact,
}

impl Rarity {
    /// All rarities in ascending order
    pub const ALL: [Rarity; 7] = [
        Rarity::None,
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::VeryRare,
        Rarity::Legendary,
        Rarity::Artifact,
    ];

    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::None => "none",
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::VeryRare => "Very Rare",
            Rarity::Legendary => "Legendary",
            Rarity::Artifact => "Artifact",
        }
    }

    /// Get numeric value for sorting (higher = rarer)
    pub fn sort_value(&self) -> u8 {
        match self {
            Rarity::None => 0,
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 3,
            Rarity::VeryRare => 4,
            Rarity::Legendary => 5,
            Rarity::Artifact => 6,
        }
    }

    /// Inverse of [`Rarity::sort_value`]
    pub fn from_sort_value(value: u8) -> Option<Rarity> {
        Self::ALL.get(value as usize).copied()
    }

    /// Parse the loose rarity strings found in catalog data.
    ///
    /// Returns `None` for strings that name no known tier (`"varies"`,
    /// `"unknown (magic)"`), which is distinct from `Some(Rarity::None)`.
    pub fn parse(raw: &str) -> Option<Rarity> {
        let key: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();

        match key.as_str() {
            "" | "none" | "mundane" => Some(Rarity::None),
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "veryrare" => Some(Rarity::VeryRare),
            "legendary" => Some(Rarity::Legendary),
            "artifact" => Some(Rarity::Artifact),
            _ => None,
        }
    }

    /// Check if this rarity denotes plain, non-magical gear
    pub fn is_mundane(&self) -> bool {
        matches!(self, Rarity::None)
    }

    /// Move by a relative number of tiers.
    ///
    /// Mundane counts as Common before the step, and the result is clamped
    /// into `Common..=Artifact`.
    pub fn bumped(&self, delta: i8) -> Rarity {
        let start = self.sort_value().max(Rarity::Common.sort_value()) as i16;
        let target = (start + delta as i16).clamp(
            Rarity::Common.sort_value() as i16,
            Rarity::Artifact.sort_value() as i16,
        );
        Self::from_sort_value(target as u8).unwrap_or(Rarity::Artifact)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Rarity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rarity::parse(&value).ok_or_else(|| format!("unknown rarity '{}'", value))
    }
}

impl From<Rarity> for String {
    fn from(rarity: Rarity) -> Self {
        rarity.name().to_string()
    }
}

/// Equipment categories that can receive variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemCategory {
    Weapon,
    Armor,
    Shield,
    Ammunition,
}

impl ItemCategory {
    /// Lowercase keyword used in catalog files
    pub fn key(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
            ItemCategory::Shield => "shield",
            ItemCategory::Ammunition => "ammunition",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "Weapon",
            ItemCategory::Armor => "Armor",
            ItemCategory::Shield => "Shield",
            ItemCategory::Ammunition => "Ammunition",
        }
    }

    /// Get all categories in display order
    pub fn all() -> &'static [ItemCategory] {
        &[
            ItemCategory::Weapon,
            ItemCategory::Armor,
            ItemCategory::Shield,
            ItemCategory::Ammunition,
        ]
    }

    /// Parse a category keyword (`"weapon"`, `"Shield"`, ...)
    pub fn parse(raw: &str) -> Option<ItemCategory> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weapon" | "weapons" => Some(ItemCategory::Weapon),
            "armor" | "armour" => Some(ItemCategory::Armor),
            "shield" | "shields" => Some(ItemCategory::Shield),
            "ammunition" | "ammo" => Some(ItemCategory::Ammunition),
            _ => None,
        }
    }
}

impl TryFrom<String> for ItemCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ItemCategory::parse(&value).ok_or_else(|| format!("unknown item category '{}'", value))
    }
}

impl From<ItemCategory> for String {
    fn from(category: ItemCategory) -> Self {
        category.key().to_string()
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Item weight as it appears in catalog data: a number of pounds or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    Pounds(f64),
    Text(String),
}

/// Numeric bonuses an item or variant grants
///
/// Absent fields contribute nothing. Bonuses of the same kind never stack;
/// merging keeps the best single value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusFields {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "bonusWeapon")]
    pub attack: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "bonusWeaponDamage")]
    pub damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "bonusAc")]
    pub ac: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "bonusSpellAttack")]
    pub spell_attack: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "bonusSpellSaveDc")]
    pub spell_save_dc: Option<i32>,
}

impl BonusFields {
    /// Keep the larger value of each field
    pub fn merge_max(&mut self, other: &BonusFields) {
        fn best(current: &mut Option<i32>, next: Option<i32>) {
            if let Some(value) = next {
                if current.map_or(true, |c| value > c) {
                    *current = Some(value);
                }
            }
        }

        best(&mut self.attack, other.attack);
        best(&mut self.damage, other.damage);
        best(&mut self.ac, other.ac);
        best(&mut self.spell_attack, other.spell_attack);
        best(&mut self.spell_save_dc, other.spell_save_dc);
    }

    /// Check if no field is set
    pub fn is_empty(&self) -> bool {
        self.attack.is_none()
            && self.damage.is_none()
            && self.ac.is_none()
            && self.spell_attack.is_none()
            && self.spell_save_dc.is_none()
    }

    /// Highest value across all fields (0 when empty)
    pub fn highest(&self) -> i32 {
        [self.attack, self.damage, self.ac, self.spell_attack, self.spell_save_dc]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(0)
    }
}

/// Array-valued traits, merged by union
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitFields {
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "property")]
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "resist")]
    pub resistances: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "conditionImmune")]
    pub condition_immunities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mastery: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub misc_tags: Vec<String>,
}

impl TraitFields {
    /// Union another set of traits into this one, keeping first-seen order
    pub fn merge_union(&mut self, other: &TraitFields) {
        push_unique(&mut self.properties, &other.properties);
        push_unique(&mut self.resistances, &other.resistances);
        push_unique(&mut self.condition_immunities, &other.condition_immunities);
        push_unique(&mut self.mastery, &other.mastery);
        push_unique(&mut self.misc_tags, &other.misc_tags);
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.resistances.is_empty()
            && self.condition_immunities.is_empty()
            && self.mastery.is_empty()
            && self.misc_tags.is_empty()
    }
}

/// Append values not already present (exact, case-sensitive match)
fn push_unique(target: &mut Vec<String>, values: &[String]) {
    for value in values {
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

/// A mundane piece of equipment eligible to be enchanted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseItem {
    /// Display name, also the lookup key
    pub name: String,
    pub category: ItemCategory,
    #[serde(default = "mundane")]
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    /// Short trait names (Light, Finesse, Thrown...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    /// Provenance tag (source book)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, alias = "reqAttune", skip_serializing_if = "is_false")]
    pub requires_attunement: bool,
}

fn mundane() -> Rarity {
    Rarity::None
}

impl BaseItem {
    /// Create a mundane base item with no description or traits
    pub fn new(name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            name: name.into(),
            category,
            rarity: Rarity::None,
            description: None,
            weight: None,
            properties: Vec::new(),
            source: None,
            tags: Vec::new(),
            requires_attunement: false,
        }
    }

    /// Traits this base contributes to a composition
    pub fn trait_fields(&self) -> TraitFields {
        TraitFields {
            properties: self.properties.clone(),
            misc_tags: self.tags.clone(),
            ..TraitFields::default()
        }
    }

    /// Check if the name or tags mark this as a vestige of an artifact
    pub fn is_vestige(&self) -> bool {
        is_vestige_name(&self.name) || self.tags.iter().any(|t| is_vestige_name(t))
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Split a name into lowercase alphanumeric words
pub fn name_words(name: &str) -> impl Iterator<Item = String> + '_ {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// Check if a name carries a vestige qualifier (dormant/awakened/exalted)
pub fn is_vestige_name(name: &str) -> bool {
    name_words(name).any(|w| VESTIGE_WORDS.contains(&w.as_str()))
}
