//! Variant catalog and built-in variant definitions

use serde::{Deserialize, Serialize};

use crate::items::{
    BonusFields, ItemCategory, NameRole, OptionSlot, Prerequisite, Rarity, TraitFields,
    VariantDefinition,
};

/// Damage types offered by resistance variants
pub const DAMAGE_TYPES: &[&str] = &[
    "Acid", "Cold", "Fire", "Force", "Lightning", "Necrotic", "Poison", "Psychic", "Radiant",
    "Thunder",
];

/// Collection of variant definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantCatalog {
    #[serde(alias = "magicvariant")]
    pub variants: Vec<VariantDefinition>,
}

impl VariantCatalog {
    /// Find a variant by name or key (case-insensitive)
    pub fn find(&self, name_or_key: &str) -> Option<&VariantDefinition> {
        let wanted = name_or_key.trim();
        self.variants
            .iter()
            .find(|v| v.canonical_key().eq_ignore_ascii_case(wanted))
            .or_else(|| self.variants.iter().find(|v| v.name.eq_ignore_ascii_case(wanted)))
    }

    /// Get all variants for a category
    pub fn for_category(&self, category: ItemCategory) -> Vec<&VariantDefinition> {
        self.variants.iter().filter(|v| v.category == category).collect()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

fn enhancement(bonus: i32, category: ItemCategory, rarity: Rarity) -> VariantDefinition {
    let mut v = VariantDefinition::new(
        format!("+{} {}", bonus, category.name()),
        category,
        NameRole::EnhancementPrefix,
    );
    v.rarity = Some(rarity);
    v.stack_group = Some("enhancement".to_string());
    v.bonuses = match category {
        ItemCategory::Armor | ItemCategory::Shield => BonusFields {
            ac: Some(bonus),
            ..Default::default()
        },
        ItemCategory::Weapon | ItemCategory::Ammunition => BonusFields {
            attack: Some(bonus),
            damage: Some(bonus),
            ..Default::default()
        },
    };
    v.entries = vec![match category {
        ItemCategory::Armor => format!("You have a +{} bonus to AC while wearing this armor.", bonus),
        ItemCategory::Shield => format!(
            "While holding this shield, you have a +{} bonus to AC. This bonus is in addition to the shield's normal bonus to AC.",
            bonus
        ),
        ItemCategory::Weapon => format!(
            "You have a +{} bonus to attack and damage rolls made with this magic weapon.",
            bonus
        ),
        ItemCategory::Ammunition => format!(
            "You have a +{} bonus to attack and damage rolls made with this piece of magic ammunition. Once it hits a target, the ammunition is no longer magical.",
            bonus
        ),
    }];
    v
}

fn material(name: &str, category: ItemCategory, text: &str) -> VariantDefinition {
    let mut v = VariantDefinition::new(name, category, NameRole::MaterialPrefix);
    v.stack_group = Some("material".to_string());
    v.entries = vec![text.to_string()];
    v
}

fn property(name: &str, category: ItemCategory, rarity: Rarity, text: &str) -> VariantDefinition {
    let mut v = VariantDefinition::new(name, category, NameRole::infer(name));
    v.rarity = Some(rarity);
    v.entries = vec![text.to_string()];
    v
}

/// Create the default variant catalog (hardcoded fallback)
pub fn default_variant_catalog() -> VariantCatalog {
    let mut variants = Vec::new();

    // === ENHANCEMENT BONUSES ===
    let tiers = [
        (ItemCategory::Weapon, [Rarity::Uncommon, Rarity::Rare, Rarity::VeryRare]),
        (ItemCategory::Armor, [Rarity::Rare, Rarity::VeryRare, Rarity::Legendary]),
        (ItemCategory::Shield, [Rarity::Uncommon, Rarity::Rare, Rarity::VeryRare]),
        (ItemCategory::Ammunition, [Rarity::Uncommon, Rarity::Rare, Rarity::VeryRare]),
    ];
    for (category, rarities) in tiers {
        for (bonus, rarity) in (1..=3).zip(rarities) {
            variants.push(enhancement(bonus, category, rarity));
        }
    }

    // === MATERIALS ===
    let mut adamantine_weapon = material(
        "Adamantine",
        ItemCategory::Weapon,
        "Whenever this weapon hits an object, the hit is a critical hit.",
    );
    adamantine_weapon.key = Some("adamantine-weapon".to_string());
    adamantine_weapon.rarity = Some(Rarity::Uncommon);
    variants.push(adamantine_weapon);

    let mut adamantine_armor = material(
        "Adamantine",
        ItemCategory::Armor,
        "While you're wearing this armor, any critical hit against you becomes a normal hit.",
    );
    adamantine_armor.key = Some("adamantine-armor".to_string());
    adamantine_armor.rarity = Some(Rarity::Uncommon);
    adamantine_armor.traits = TraitFields {
        misc_tags: vec!["Critical Immunity".to_string()],
        ..Default::default()
    };
    variants.push(adamantine_armor);

    let mut mithral = material(
        "Mithral",
        ItemCategory::Armor,
        "Mithral is a light, flexible metal. If the armor normally imposes disadvantage on Dexterity (Stealth) checks or has a Strength requirement, the mithral version of the armor doesn't.",
    );
    mithral.rarity = Some(Rarity::Uncommon);
    variants.push(mithral);

    let mut silvered = material(
        "Silvered",
        ItemCategory::Weapon,
        "An alchemical process has bonded silver to this weapon, allowing it to overcome resistances of shapechangers.",
    );
    silvered.bump = Some(1);
    variants.push(silvered);

    let mut silvered_ammo = material(
        "Silvered",
        ItemCategory::Ammunition,
        "An alchemical process has bonded silver to this ammunition.",
    );
    silvered_ammo.key = Some("silvered-ammunition".to_string());
    silvered_ammo.bump = Some(1);
    variants.push(silvered_ammo);

    // === WEAPON PROPERTIES ===
    let mut warning = property(
        "Weapon of Warning",
        ItemCategory::Weapon,
        Rarity::Uncommon,
        "This magic weapon warns you of danger. While the weapon is on your person, you have advantage on initiative rolls.",
    );
    warning.attunement_required = true;
    variants.push(warning);

    let mut vicious = property(
        "Vicious",
        ItemCategory::Weapon,
        Rarity::Rare,
        "When you roll a 20 on your attack roll with this magic weapon, the target takes an extra 7 damage of the weapon's type.",
    );
    vicious.traits.properties = vec!["Vicious".to_string()];
    variants.push(vicious);

    let mut dancing = property(
        "Dancing",
        ItemCategory::Weapon,
        Rarity::VeryRare,
        "You can use a bonus action to toss this magic sword into the air. The sword begins to hover, flies up to 30 feet, and attacks one creature of your choice within 5 feet of it.",
    );
    dancing.excludes_vestiges = true;
    dancing.attunement_required = true;
    variants.push(dancing);

    let mut vorpal = property(
        "Vorpal",
        ItemCategory::Weapon,
        Rarity::Legendary,
        "When you attack a creature that has at least one head with this weapon and roll a 20 on the attack roll, you cut off one of the creature's heads.",
    );
    vorpal.prerequisite = Some(Prerequisite::MinEnhancement(3));
    vorpal.excludes_vestiges = true;
    vorpal.attunement_required = true;
    variants.push(vorpal);

    let mut slaying = property(
        "Weapon of Slaying",
        ItemCategory::Weapon,
        Rarity::Rare,
        "When you hit a creature of the chosen type with this weapon, the creature takes an extra 3d6 damage of the weapon's type.",
    );
    slaying.option_slot = Some(OptionSlot {
        kind: "creature type".to_string(),
        choices: Vec::new(),
        template: None,
    });
    variants.push(slaying);

    // === ARMOR PROPERTIES ===
    let mut resistance = property(
        "Armor of Resistance",
        ItemCategory::Armor,
        Rarity::Rare,
        "You have resistance to one type of damage while you wear this armor.",
    );
    resistance.option_slot = Some(OptionSlot {
        kind: "damage type".to_string(),
        choices: DAMAGE_TYPES.iter().map(|d| d.to_string()).collect(),
        template: None,
    });
    resistance.attunement_required = true;
    variants.push(resistance);

    let mut mariners = property(
        "Mariner's",
        ItemCategory::Armor,
        Rarity::Uncommon,
        "While wearing this armor, you have a swimming speed equal to your walking speed.",
    );
    mariners.traits.misc_tags = vec!["Swim Speed".to_string()];
    variants.push(mariners);

    // === SHIELD PROPERTIES ===
    variants.push(property(
        "Sentinel",
        ItemCategory::Shield,
        Rarity::Uncommon,
        "While holding this shield, you have advantage on initiative rolls and Wisdom (Perception) checks.",
    ));

    let mut arrow_catching = property(
        "Arrow-Catching",
        ItemCategory::Shield,
        Rarity::Rare,
        "You gain a +2 bonus to AC against ranged attacks while you wield this shield.",
    );
    arrow_catching.bump = Some(2);
    arrow_catching.rarity = None;
    arrow_catching.attunement_required = true;
    variants.push(arrow_catching);

    // === AMMUNITION PROPERTIES ===
    variants.push(property(
        "Walloping",
        ItemCategory::Ammunition,
        Rarity::Common,
        "A creature hit by this ammunition must succeed on a DC 10 Strength saving throw or be knocked prone.",
    ));

    let mut ammo_slaying = property(
        "Ammunition of Slaying",
        ItemCategory::Ammunition,
        Rarity::VeryRare,
        "When a creature of the chosen type takes damage from this ammunition, it must make a DC 17 Constitution saving throw, taking an extra 6d10 piercing damage on a failed save.",
    );
    ammo_slaying.key = Some("ammunition-of-slaying".to_string());
    ammo_slaying.option_slot = Some(OptionSlot {
        kind: "creature type".to_string(),
        choices: Vec::new(),
        template: None,
    });
    variants.push(ammo_slaying);

    VariantCatalog { variants }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_keys_unique() {
        let catalog = default_variant_catalog();
        let mut seen = HashSet::new();
        for v in &catalog.variants {
            assert!(
                seen.insert(v.canonical_key().to_lowercase()),
                "duplicate key {}",
                v.canonical_key()
            );
        }
    }

    #[test]
    fn test_enhancement_tiers() {
        let catalog = default_variant_catalog();
        let plus_two = catalog.find("+2 Armor").unwrap();
        assert_eq!(plus_two.bonuses.ac, Some(2));
        assert_eq!(plus_two.rarity, Some(Rarity::VeryRare));
        assert_eq!(plus_two.label(), "+2");
        assert_eq!(plus_two.enhancement_bonus(), 2);
        assert_eq!(catalog.for_category(ItemCategory::Shield).iter().filter(|v| v.enhancement_bonus() > 0).count(), 3);
    }

    #[test]
    fn test_find_by_key_or_name() {
        let catalog = default_variant_catalog();
        assert_eq!(
            catalog.find("adamantine-armor").map(|v| v.category),
            Some(ItemCategory::Armor)
        );
        // Name lookup returns the first match
        assert_eq!(catalog.find("adamantine").map(|v| v.category), Some(ItemCategory::Weapon));
        assert_eq!(catalog.find("vorpal").map(|v| v.name.as_str()), Some("Vorpal"));
        assert!(catalog.find("Holy Avenger").is_none());
    }

    #[test]
    fn test_roles_and_labels() {
        let catalog = default_variant_catalog();
        let warning = catalog.find("Weapon of Warning").unwrap();
        assert_eq!(warning.role(), NameRole::OfSuffix);
        assert_eq!(warning.label(), "Warning");
        assert_eq!(catalog.find("Vicious").unwrap().role(), NameRole::Prefix);
        assert_eq!(catalog.find("Mithral").unwrap().role(), NameRole::MaterialPrefix);
    }

    #[test]
    fn test_attunement_flags() {
        let catalog = default_variant_catalog();
        for name in ["Weapon of Warning", "Dancing", "Vorpal", "Armor of Resistance", "Arrow-Catching"] {
            assert!(catalog.find(name).unwrap().attunement_required, "{} should need attunement", name);
        }
        assert!(!catalog.find("Vicious").unwrap().attunement_required);
        assert!(!catalog.find("+1 Weapon").unwrap().attunement_required);
    }

    #[test]
    fn test_defaults_have_no_vestiges() {
        assert!(default_variant_catalog().variants.iter().all(|v| !v.is_vestige()));
    }
}
