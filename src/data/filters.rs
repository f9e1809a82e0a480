//! Base pool filters
//!
//! Only plain, mundane equipment may be offered as a base. Catalogs are
//! full of finished magic items, so anything that already looks enchanted
//! is rejected by name.

use crate::items::item::name_words;
use crate::items::{is_vestige_name, Rarity};

use super::raw::CatalogRecord;

/// Famous named items that are never a valid base
const NAMED_MAGIC_ITEMS: &[&str] = &[
    "blackrazor",
    "dawnbringer",
    "defender",
    "dragon slayer",
    "dwarven thrower",
    "flame tongue",
    "frost brand",
    "giant slayer",
    "hazirawn",
    "holy avenger",
    "luck blade",
    "moonblade",
    "nine lives stealer",
    "oathbow",
    "sun blade",
    "sword of sharpness",
    "vorpal sword",
    "wave",
    "whelm",
];

/// Materials already baked into a name
const MATERIAL_WORDS: &[&str] = &["adamantine", "mithral", "silvered", "ruidium", "dragonhide"];

/// Firearms and other future tech that variants don't cover
const FUTURE_TECH: &[&str] = &[
    "antimatter",
    "automatic",
    "pistol",
    "rifle",
    "revolver",
    "shotgun",
    "grenade",
    "bomb",
    "laser",
    "power armor",
];

/// Words that mark wondrous or consumable items mislabeled as equipment
const MAGIC_WORDS: &[&str] = &["spell", "scroll", "wand", "amulet", "rod", "cloak"];

/// How the base pool was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Mundane rarity only
    Strict,
    /// Strict matched nothing; Common and unknown rarities let through
    Relaxed,
}

/// Check a name against the named-magic deny list and its patterns
pub fn is_named_magic_name(name: &str) -> bool {
    let words: Vec<String> = name_words(name).collect();
    let phrase = format!(" {} ", words.join(" "));
    let contains_phrase = |p: &str| phrase.contains(&format!(" {} ", p));

    // "+1 Longsword", "Longsword (+1)"
    if has_plus_token(name) {
        return true;
    }
    if words.iter().any(|w| w == "of") {
        return true;
    }
    if NAMED_MAGIC_ITEMS.iter().any(|n| contains_phrase(n)) {
        return true;
    }
    if words.iter().any(|w| MATERIAL_WORDS.contains(&w.as_str())) || contains_phrase("cold iron") {
        return true;
    }
    if FUTURE_TECH.iter().any(|t| contains_phrase(t)) {
        return true;
    }
    words.iter().any(|w| MAGIC_WORDS.contains(&w.as_str()))
}

fn has_plus_token(name: &str) -> bool {
    name.char_indices()
        .any(|(i, c)| c == '+' && name[i + 1..].starts_with(|d: char| d.is_ascii_digit()))
}

fn passes_common(record: &CatalogRecord) -> bool {
    record.category.is_some()
        && !record.requires_attunement
        && !is_named_magic_name(&record.name)
        && !is_vestige_name(&record.name)
        && !record.tags.iter().any(|t| is_vestige_name(t))
}

/// Mundane rarity and nothing that looks enchanted
pub fn passes_strict(record: &CatalogRecord) -> bool {
    record.rarity == Some(Rarity::None) && passes_common(record)
}

/// Like strict, but Common and unparseable rarities are also accepted
pub fn passes_relaxed(record: &CatalogRecord) -> bool {
    matches!(record.rarity, None | Some(Rarity::None) | Some(Rarity::Common)) && passes_common(record)
}

pub fn passes(record: &CatalogRecord, mode: FilterMode) -> bool {
    match mode {
        FilterMode::Strict => passes_strict(record),
        FilterMode::Relaxed => passes_relaxed(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::raw::RawItem;

    fn record(name: &str, rarity: &str) -> CatalogRecord {
        let mut raw = RawItem::coded(name, "M", 3.0, &[]);
        raw.rarity = Some(rarity.to_string());
        raw.classify().unwrap()
    }

    #[test]
    fn test_named_magic_patterns() {
        assert!(is_named_magic_name("+1 Longsword"));
        assert!(is_named_magic_name("Longsword (+2)"));
        assert!(is_named_magic_name("Mace of Disruption"));
        assert!(is_named_magic_name("Blackrazor"));
        assert!(is_named_magic_name("Flame Tongue Shortsword"));
        assert!(is_named_magic_name("Adamantine Breastplate"));
        assert!(is_named_magic_name("Cold Iron Dagger"));
        assert!(is_named_magic_name("Laser Rifle"));
        assert!(is_named_magic_name("Power Armor"));
        assert!(is_named_magic_name("Wand of Webs"));

        assert!(!is_named_magic_name("Longsword"));
        assert!(!is_named_magic_name("Quarterstaff"));
        assert!(!is_named_magic_name("Chain Mail"));
        assert!(!is_named_magic_name("Light Crossbow"));
        assert!(!is_named_magic_name("Warhammer"));
        assert!(!is_named_magic_name("Ring Mail"));
    }

    #[test]
    fn test_strict_requires_mundane() {
        assert!(passes_strict(&record("Longsword", "none")));
        assert!(!passes_strict(&record("Longsword", "Common")));
        assert!(!passes_strict(&record("Longsword", "varies")));
        assert!(!passes_strict(&record("Longsword", "Rare")));
    }

    #[test]
    fn test_relaxed_admits_common_and_unknown() {
        assert!(passes_relaxed(&record("Longsword", "Common")));
        assert!(passes_relaxed(&record("Longsword", "varies")));
        assert!(!passes_relaxed(&record("Longsword", "Uncommon")));
        assert!(!passes_relaxed(&record("Sun Blade", "none")));
    }

    #[test]
    fn test_attunement_and_vestiges_rejected() {
        let mut attuned = record("Longsword", "none");
        attuned.requires_attunement = true;
        assert!(!passes(&attuned, FilterMode::Relaxed));

        assert!(!passes_strict(&record("Dormant Greatsword", "none")));

        let mut tagged = record("Greatsword", "none");
        tagged.tags.push("Vestige".into());
        assert!(!passes_strict(&tagged));
    }

    #[test]
    fn test_uncategorized_rejected() {
        let mut gear = record("Rope", "none");
        gear.category = None;
        assert!(!passes(&gear, FilterMode::Relaxed));
    }
}
