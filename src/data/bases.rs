//! Base item catalog
//!
//! Records are stored in their raw catalog shape so that edited files,
//! 5etools dumps and the built-in defaults all go through one classifier.

use serde::{Deserialize, Serialize};

use super::raw::RawItem;

/// Collection of raw base records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseCatalog {
    #[serde(alias = "baseitem", alias = "item")]
    pub items: Vec<RawItem>,
}

impl BaseCatalog {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Create the default base catalog (hardcoded fallback)
pub fn default_base_catalog() -> BaseCatalog {
    BaseCatalog {
        items: vec![
            // === SIMPLE MELEE ===
            RawItem::coded("Club", "M", 2.0, &["L"]),
            RawItem::coded("Dagger", "M", 1.0, &["F", "L", "T"])
                .with_description("Proficiency with a dagger allows you to add your proficiency bonus to the attack roll."),
            RawItem::coded("Handaxe", "M", 2.0, &["L", "T"]),
            RawItem::coded("Javelin", "M", 2.0, &["T"]),
            RawItem::coded("Mace", "M", 4.0, &[]),
            RawItem::coded("Quarterstaff", "M", 4.0, &["V"]),
            RawItem::coded("Spear", "M", 3.0, &["T", "V"]),

            // === MARTIAL MELEE ===
            RawItem::coded("Battleaxe", "M", 4.0, &["V"]),
            RawItem::coded("Greatsword", "M", 6.0, &["H", "2H"]),
            RawItem::coded("Longsword", "M", 3.0, &["V"]),
            RawItem::coded("Rapier", "M", 2.0, &["F"]),
            RawItem::coded("Scimitar", "M", 3.0, &["F", "L"]),
            RawItem::coded("Shortsword", "M", 2.0, &["F", "L"]),
            RawItem::coded("Warhammer", "M", 2.0, &["V"]),

            // === RANGED ===
            RawItem::coded("Light Crossbow", "R", 5.0, &["A", "LD", "2H"]),
            RawItem::coded("Longbow", "R", 2.0, &["A", "H", "2H"]),
            RawItem::coded("Shortbow", "R", 2.0, &["A", "2H"]),
            RawItem::coded("Sling", "R", 0.0, &["A"]),

            // === ARMOR ===
            RawItem::coded("Leather Armor", "LA", 10.0, &[]),
            RawItem::coded("Studded Leather Armor", "LA", 13.0, &[]),
            RawItem::coded("Chain Shirt", "MA", 20.0, &[]),
            RawItem::coded("Breastplate", "MA", 20.0, &[])
                .with_description("This armor consists of a fitted metal chest piece worn with supple leather."),
            RawItem::coded("Half Plate Armor", "MA", 40.0, &[]),
            RawItem::coded("Chain Mail", "HA", 55.0, &[])
                .with_description("Made of interlocking metal rings, chain mail includes a layer of quilted fabric."),
            RawItem::coded("Splint Armor", "HA", 60.0, &[]),
            RawItem::coded("Plate Armor", "HA", 65.0, &[]),

            // === SHIELDS ===
            RawItem::coded("Shield", "S", 6.0, &[])
                .with_description("A shield is made from wood or metal and is carried in one hand."),

            // === AMMUNITION ===
            RawItem::coded("Arrows (20)", "A", 1.0, &[]),
            RawItem::coded("Crossbow Bolts (20)", "A", 1.5, &[]),
            RawItem::coded("Sling Bullets (20)", "A", 1.5, &[]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::passes_strict;
    use crate::items::ItemCategory;

    #[test]
    fn test_defaults_are_all_strict_bases() {
        let catalog = default_base_catalog();
        assert!(!catalog.is_empty());
        for raw in &catalog.items {
            let record = raw.classify().unwrap();
            assert!(passes_strict(&record), "{} rejected", record.name);
        }
    }

    #[test]
    fn test_defaults_cover_every_category() {
        let catalog = default_base_catalog();
        for category in ItemCategory::all() {
            let found = catalog
                .items
                .iter()
                .filter_map(|r| r.classify())
                .any(|r| r.category == Some(*category));
            assert!(found, "no default {}", category);
        }
    }
}
