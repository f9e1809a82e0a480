//! Raw catalog records
//!
//! Catalog exports come in several shapes: 5etools `items-base.json`, flat
//! inventory rows (`item_name`, `item_type`...), and hand-written RON. This
//! module reads all of them into one `RawItem` and classifies it into a
//! `CatalogRecord`. Nothing past this boundary looks at type codes.

use serde::{Deserialize, Deserializer, Serialize};

use crate::items::{BaseItem, ItemCategory, Rarity, Weight};

/// Weapon type codes (melee, ranged)
const WEAPON_CODES: &[&str] = &["M", "R"];
/// Light, medium, heavy armor
const ARMOR_CODES: &[&str] = &["LA", "MA", "HA"];
const SHIELD_CODES: &[&str] = &["S"];
/// Ammunition and futuristic ammunition
const AMMUNITION_CODES: &[&str] = &["A", "AF"];

/// Type codes that are definitely not equipment (potions, scrolls, gear...)
const NON_GEAR_CODES: &[&str] = &[
    "P", "SC", "WD", "RD", "RG", "G", "AT", "GS", "INS", "T", "TG", "TAH", "MNT", "VEH", "SHP",
    "AIR", "FD", "TB", "OTH", "SCF", "EXP", "$", "$A", "$C", "$G",
];

/// Property codes and their display names
const PROPERTY_NAMES: &[(&str, &str)] = &[
    ("A", "Ammunition"),
    ("AF", "Ammunition (Futuristic)"),
    ("BF", "Burst Fire"),
    ("F", "Finesse"),
    ("H", "Heavy"),
    ("L", "Light"),
    ("LD", "Loading"),
    ("R", "Reach"),
    ("RLD", "Reload"),
    ("S", "Special"),
    ("T", "Thrown"),
    ("2H", "Two-Handed"),
    ("V", "Versatile"),
];

const AMMUNITION_WORDS: &[&str] = &[
    "arrow", "arrows", "bolt", "bolts", "bullet", "bullets", "needle", "needles", "ammunition",
];
const ARMOR_WORDS: &[&str] = &[
    "armor", "armour", "breastplate", "mail", "plate", "padded", "hide", "brigandine", "splint",
    "scale", "leather",
];
const WEAPON_WORDS: &[&str] = &[
    "sword", "shortsword", "longsword", "greatsword", "scimitar", "rapier", "dagger", "axe",
    "handaxe", "battleaxe", "greataxe", "mace", "maul", "club", "greatclub", "flail", "glaive",
    "halberd", "lance", "pike", "spear", "trident", "warhammer", "hammer", "pick", "morningstar",
    "whip", "sickle", "javelin", "quarterstaff", "bow", "longbow", "shortbow", "crossbow", "sling",
    "dart", "blowgun", "net",
];

/// Remove a `|SOURCE` suffix from a tagged value (`"V|XPHB"` -> `"V"`)
pub fn strip_source_tag(value: &str) -> &str {
    value.split('|').next().unwrap_or(value).trim()
}

/// Expand a property code to its display name; unknown values pass through
pub fn property_name(value: &str) -> String {
    let code = strip_source_tag(value);
    PROPERTY_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Map a 5etools type code to a category
pub fn category_from_code(code: &str) -> Option<ItemCategory> {
    let code = strip_source_tag(code).to_ascii_uppercase();
    let code = code.as_str();
    if WEAPON_CODES.contains(&code) {
        Some(ItemCategory::Weapon)
    } else if ARMOR_CODES.contains(&code) {
        Some(ItemCategory::Armor)
    } else if SHIELD_CODES.contains(&code) {
        Some(ItemCategory::Shield)
    } else if AMMUNITION_CODES.contains(&code) {
        Some(ItemCategory::Ammunition)
    } else {
        None
    }
}

/// Attunement requirement: `true`, or a text like "by a cleric"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attunement {
    Flag(bool),
    Text(String),
}

impl Attunement {
    pub fn is_required(&self) -> bool {
        match self {
            Attunement::Flag(flag) => *flag,
            Attunement::Text(text) => {
                let text = text.trim();
                !text.is_empty() && !text.eq_ignore_ascii_case("false") && !text.eq_ignore_ascii_case("no")
            }
        }
    }
}

/// Property list entry: a bare code or an object carrying a `uid`
#[derive(Deserialize)]
#[serde(untagged)]
enum PropertyRef {
    Code(String),
    Tagged { uid: String },
}

fn property_codes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Vec::<PropertyRef>::deserialize(deserializer)?;
    Ok(refs
        .into_iter()
        .map(|r| match r {
            PropertyRef::Code(code) => code,
            PropertyRef::Tagged { uid } => uid,
        })
        .collect())
}

/// One element of a 5etools `entries` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Text(String),
    Block {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, alias = "items", skip_serializing_if = "Vec::is_empty")]
        entries: Vec<RawEntry>,
    },
}

/// Flatten entries into paragraphs with inline `{@tag ...}` markup removed
pub fn flatten_entries(entries: &[RawEntry]) -> Vec<String> {
    let mut out = Vec::new();
    for entry in entries {
        match entry {
            RawEntry::Text(text) => {
                let text = scrub_inline_tags(text);
                if !text.trim().is_empty() {
                    out.push(text.trim().to_string());
                }
            }
            RawEntry::Block { name, entries } => {
                let mut inner = flatten_entries(entries);
                if let (Some(name), Some(first)) = (name, inner.first_mut()) {
                    *first = format!("{}. {}", name.trim(), first);
                }
                out.extend(inner);
            }
        }
    }
    out
}

/// Replace `{@tag body|source|display}` markup with readable text
pub fn scrub_inline_tags(text: &str) -> String {
    let mut out = text.to_string();
    // Innermost first, so nested tags unwind one layer per pass
    while let Some(start) = out.rfind("{@") {
        let Some(len) = out[start..].find('}') else {
            break;
        };
        let inner = &out[start + 2..start + len];
        let (tag, body) = inner.split_once(' ').unwrap_or((inner, ""));
        let parts: Vec<&str> = body.split('|').collect();
        let shown = match parts.len() {
            0 | 1 => body.to_string(),
            _ => parts
                .get(2)
                .filter(|d| !d.is_empty())
                .unwrap_or(&parts[0])
                .to_string(),
        };
        let replacement = match tag {
            "dc" => format!("DC {}", shown),
            "hit" if !shown.starts_with('-') && !shown.starts_with('+') => format!("+{}", shown),
            _ => shown,
        };
        out.replace_range(start..start + len + 1, &replacement);
    }
    out
}

/// A catalog record exactly as read, before classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default, alias = "item_name", alias = "title", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Type code (`"M"`, `"LA|XPHB"`) or free text (`"Weapon"`)
    #[serde(
        default,
        rename = "type",
        alias = "item_type",
        alias = "category",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, alias = "item_rarity", skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, alias = "item_description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<RawEntry>,
    #[serde(default, alias = "item_weight", skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(
        default,
        alias = "property",
        deserialize_with = "property_codes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        default,
        rename = "reqAttune",
        alias = "attunement",
        alias = "req_attune",
        skip_serializing_if = "Option::is_none"
    )]
    pub attunement: Option<Attunement>,
    #[serde(default, alias = "item_tags", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Damage dice; only weapons carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmg1: Option<String>,
    #[serde(default, rename = "weaponCategory", skip_serializing_if = "Option::is_none")]
    pub weapon_category: Option<String>,
}

impl RawItem {
    /// Build a record the way a 5etools base item looks
    pub fn coded(name: &str, code: &str, weight: f64, properties: &[&str]) -> Self {
        Self {
            name: Some(name.to_string()),
            kind: Some(code.to_string()),
            rarity: Some("none".to_string()),
            weight: Some(Weight::Pounds(weight)),
            properties: properties.iter().map(|p| p.to_string()).collect(),
            source: Some("PHB".to_string()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Classify into a normalized record; `None` when the record has no name
    pub fn classify(&self) -> Option<CatalogRecord> {
        let name = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;

        let raw_rarity = self.rarity.clone().unwrap_or_default();
        let description = self
            .description
            .as_deref()
            .map(scrub_inline_tags)
            .filter(|d| !d.trim().is_empty())
            .or_else(|| {
                let paragraphs = flatten_entries(&self.entries);
                (!paragraphs.is_empty()).then(|| paragraphs.join("\n\n"))
            });

        Some(CatalogRecord {
            name: name.to_string(),
            category: self.category(name),
            rarity: Rarity::parse(&raw_rarity),
            raw_rarity,
            description,
            weight: self.weight.clone(),
            properties: self.properties.iter().map(|p| property_name(p)).collect(),
            source: self.source.as_deref().map(strip_source_tag).map(str::to_string),
            tags: self.tags.clone(),
            requires_attunement: self.attunement.as_ref().map_or(false, Attunement::is_required),
        })
    }

    fn category(&self, name: &str) -> Option<ItemCategory> {
        let kind = self.kind.as_deref().map(str::trim).unwrap_or("");
        if !kind.is_empty() {
            if let Some(category) = category_from_code(kind) {
                return Some(category);
            }
            let code = strip_source_tag(kind).to_ascii_uppercase();
            if NON_GEAR_CODES.contains(&code.as_str()) {
                return None;
            }
            let lower = kind.to_ascii_lowercase();
            if lower.contains("ammunition") {
                return Some(ItemCategory::Ammunition);
            }
            if lower.contains("shield") {
                return Some(ItemCategory::Shield);
            }
            if lower.contains("armor") || lower.contains("armour") {
                return Some(ItemCategory::Armor);
            }
            if lower.contains("weapon") {
                return Some(ItemCategory::Weapon);
            }
        }
        self.guess_category(name)
    }

    /// Best-effort guess from weapon stats and name words
    fn guess_category(&self, name: &str) -> Option<ItemCategory> {
        let words: Vec<String> = crate::items::item::name_words(name).collect();
        let has = |list: &[&str]| words.iter().any(|w| list.contains(&w.as_str()));

        if has(AMMUNITION_WORDS) {
            Some(ItemCategory::Ammunition)
        } else if words.iter().any(|w| w == "shield") {
            Some(ItemCategory::Shield)
        } else if self.dmg1.is_some() || self.weapon_category.is_some() || has(WEAPON_WORDS) {
            Some(ItemCategory::Weapon)
        } else if has(ARMOR_WORDS) {
            Some(ItemCategory::Armor)
        } else {
            None
        }
    }
}

/// A classified catalog record, ready for filtering
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub name: String,
    /// `None` when the record is not equipment we understand
    pub category: Option<ItemCategory>,
    /// `None` when the rarity string did not parse (`"varies"`)
    pub rarity: Option<Rarity>,
    pub raw_rarity: String,
    pub description: Option<String>,
    pub weight: Option<Weight>,
    pub properties: Vec<String>,
    pub source: Option<String>,
    pub tags: Vec<String>,
    pub requires_attunement: bool,
}

impl CatalogRecord {
    /// Convert to a base item. Unparseable rarity is treated as mundane; the
    /// filters decide whether such a record is offered at all.
    pub fn to_base_item(&self) -> Option<BaseItem> {
        let category = self.category?;
        Some(BaseItem {
            name: self.name.clone(),
            category,
            rarity: self.rarity.unwrap_or(Rarity::None),
            description: self.description.clone(),
            weight: self.weight.clone(),
            properties: self.properties.clone(),
            source: self.source.clone(),
            tags: self.tags.clone(),
            requires_attunement: self.requires_attunement,
        })
    }
}
