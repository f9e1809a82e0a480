//! Compatibility and selection gating
//!
//! Decides which variants may be offered for a base item given what is
//! already chosen. Exclusion here is the main defense; composition only
//! warns about what slips through.

use super::item::BaseItem;
use super::variant::{NameRole, VariantChoice, VariantDefinition};

/// Maximum number of variants on one item
pub const MAX_VARIANTS: usize = 4;

/// Check if a variant can apply to a base at all
pub fn is_compatible(base: &BaseItem, variant: &VariantDefinition) -> bool {
    if variant.category != base.category {
        return false;
    }
    if variant.excludes_vestiges && base.is_vestige() {
        return false;
    }
    true
}

/// Enhancement bonus established by the chosen variants (0 if none)
pub fn enhancement_bonus(choices: &[VariantChoice]) -> i32 {
    choices
        .iter()
        .map(|c| c.variant.enhancement_bonus())
        .max()
        .unwrap_or(0)
}

/// Check if a variant duplicates or shares a stack group with a chosen one
pub fn conflicts_with(variant: &VariantDefinition, chosen: &[VariantChoice]) -> bool {
    chosen.iter().any(|c| {
        if c.variant.name == variant.name || c.variant.canonical_key() == variant.canonical_key() {
            return true;
        }
        match (&c.variant.stack_group, &variant.stack_group) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    })
}

/// Check if a variant's prerequisite holds for the chosen variants
pub fn prerequisite_met(variant: &VariantDefinition, chosen: &[VariantChoice]) -> bool {
    variant
        .prerequisite
        .map_or(true, |p| p.is_met(enhancement_bonus(chosen)))
}

/// Variants that may still be added, in catalog order.
///
/// Re-evaluated on every call, so raising or lowering the chosen
/// enhancement immediately changes what is offered.
pub fn filter_selectable<'a>(
    base: &BaseItem,
    candidates: &'a [VariantDefinition],
    already_chosen: &[VariantChoice],
) -> Vec<&'a VariantDefinition> {
    if already_chosen.len() >= MAX_VARIANTS {
        return Vec::new();
    }

    candidates
        .iter()
        .filter(|v| !v.is_vestige())
        .filter(|v| is_compatible(base, v))
        .filter(|v| !conflicts_with(v, already_chosen))
        .filter(|v| prerequisite_met(v, already_chosen))
        .collect()
}

/// Ordered, capped set of chosen variants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    choices: Vec<VariantChoice>,
}

impl Selection {
    pub fn new() -> Self {
        Self { choices: Vec::new() }
    }

    /// Add a choice. Returns false (and changes nothing) when the selection
    /// is full, the variant is already chosen, or its stack group is taken.
    pub fn add(&mut self, choice: VariantChoice) -> bool {
        if self.is_full() {
            log::debug!("Selection full, ignoring {}", choice.variant.name);
            return false;
        }
        if conflicts_with(&choice.variant, &self.choices) {
            log::debug!("Ignoring conflicting variant {}", choice.variant.name);
            return false;
        }
        self.choices.push(choice);
        true
    }

    /// Remove a choice by variant name
    pub fn remove(&mut self, name: &str) -> Option<VariantChoice> {
        let index = self.choices.iter().position(|c| c.variant.name == name)?;
        Some(self.choices.remove(index))
    }

    /// Swap the chosen enhancement bonus, or clear it with `None`
    pub fn set_enhancement(&mut self, choice: Option<VariantChoice>) -> bool {
        self.choices
            .retain(|c| c.variant.role() != NameRole::EnhancementPrefix);
        match choice {
            Some(choice) => self.add(choice),
            None => true,
        }
    }

    /// Drop choices whose prerequisite no longer holds, returning them
    pub fn prune_unmet(&mut self) -> Vec<VariantChoice> {
        let enhancement = enhancement_bonus(&self.choices);
        let (kept, dropped): (Vec<_>, Vec<_>) = self
            .choices
            .drain(..)
            .partition(|c| c.variant.prerequisite.map_or(true, |p| p.is_met(enhancement)));
        self.choices = kept;
        dropped
    }

    pub fn clear(&mut self) {
        self.choices.clear();
    }

    pub fn choices(&self) -> &[VariantChoice] {
        &self.choices
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.choices.len() >= MAX_VARIANTS
    }

    pub fn enhancement_bonus(&self) -> i32 {
        enhancement_bonus(&self.choices)
    }

    /// Variants that may still be added to this selection
    pub fn selectable<'a>(
        &self,
        base: &BaseItem,
        candidates: &'a [VariantDefinition],
    ) -> Vec<&'a VariantDefinition> {
        filter_selectable(base, candidates, &self.choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::{BonusFields, ItemCategory};
    use crate::items::variant::Prerequisite;

    fn plus(n: i32) -> VariantDefinition {
        let mut v = VariantDefinition::new(format!("+{}", n), ItemCategory::Weapon, NameRole::EnhancementPrefix);
        v.bonuses = BonusFields {
            attack: Some(n),
            damage: Some(n),
            ..Default::default()
        };
        v.stack_group = Some("enhancement".into());
        v
    }

    fn material(name: &str) -> VariantDefinition {
        let mut v = VariantDefinition::new(name, ItemCategory::Weapon, NameRole::MaterialPrefix);
        v.stack_group = Some("material".into());
        v
    }

    fn prefix(name: &str) -> VariantDefinition {
        VariantDefinition::new(name, ItemCategory::Weapon, NameRole::Prefix)
    }

    fn vorpal() -> VariantDefinition {
        let mut v = prefix("Vorpal");
        v.prerequisite = Some(Prerequisite::MinEnhancement(3));
        v
    }

    fn names(list: &[&VariantDefinition]) -> Vec<String> {
        list.iter().map(|v| v.name.clone()).collect()
    }

    #[test]
    fn test_category_must_match() {
        let sword = BaseItem::new("Longsword", ItemCategory::Weapon);
        let arrows = BaseItem::new("Arrows", ItemCategory::Ammunition);
        let flaming = prefix("Flaming");
        assert!(is_compatible(&sword, &flaming));
        assert!(!is_compatible(&arrows, &flaming));
    }

    #[test]
    fn test_excludes_vestiges() {
        let mut base = BaseItem::new("Dormant Blade", ItemCategory::Weapon);
        let mut variant = prefix("Keen");
        assert!(is_compatible(&base, &variant));
        variant.excludes_vestiges = true;
        assert!(!is_compatible(&base, &variant));
        base.name = "Blade".into();
        assert!(is_compatible(&base, &variant));
    }

    #[test]
    fn test_prerequisite_gating_follows_bonus() {
        let base = BaseItem::new("Longsword", ItemCategory::Weapon);
        let candidates = vec![vorpal()];

        assert!(filter_selectable(&base, &candidates, &[]).is_empty());
        for n in 1..=2 {
            let chosen = [VariantChoice::new(plus(n))];
            assert!(filter_selectable(&base, &candidates, &chosen).is_empty(), "+{} unlocked vorpal", n);
        }
        let chosen = [VariantChoice::new(plus(3))];
        assert_eq!(names(&filter_selectable(&base, &candidates, &chosen)), vec!["Vorpal"]);
    }

    #[test]
    fn test_stack_group_exclusion() {
        let base = BaseItem::new("Longsword", ItemCategory::Weapon);
        let candidates = vec![material("Adamantine"), material("Silvered"), prefix("Flaming")];

        let chosen = [VariantChoice::new(material("Adamantine"))];
        let offered = names(&filter_selectable(&base, &candidates, &chosen));
        assert_eq!(offered, vec!["Flaming"]);
    }

    #[test]
    fn test_selection_cap() {
        let mut selection = Selection::new();
        for name in ["A", "B", "C", "D"] {
            assert!(selection.add(VariantChoice::new(prefix(name))));
        }
        assert!(selection.is_full());
        assert!(!selection.add(VariantChoice::new(prefix("E"))));
        assert_eq!(selection.len(), MAX_VARIANTS);

        let base = BaseItem::new("Longsword", ItemCategory::Weapon);
        let candidates = vec![prefix("E")];
        assert!(selection.selectable(&base, &candidates).is_empty());
    }

    #[test]
    fn test_selection_add_is_idempotent() {
        let mut selection = Selection::new();
        assert!(selection.add(VariantChoice::new(prefix("Flaming"))));
        assert!(!selection.add(VariantChoice::new(prefix("Flaming"))));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_selection_rejects_stack_conflict() {
        let mut selection = Selection::new();
        assert!(selection.add(VariantChoice::new(material("Mithral"))));
        assert!(!selection.add(VariantChoice::new(material("Adamantine"))));
        assert!(selection.remove("Mithral").is_some());
        assert!(selection.add(VariantChoice::new(material("Adamantine"))));
    }

    #[test]
    fn test_set_enhancement_and_prune() {
        let mut selection = Selection::new();
        assert!(selection.set_enhancement(Some(VariantChoice::new(plus(3)))));
        assert!(selection.add(VariantChoice::new(vorpal())));
        assert_eq!(selection.enhancement_bonus(), 3);

        selection.set_enhancement(Some(VariantChoice::new(plus(1))));
        assert_eq!(selection.enhancement_bonus(), 1);
        let dropped = selection.prune_unmet();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].variant.name, "Vorpal");
        assert_eq!(selection.len(), 1);
    }
}
