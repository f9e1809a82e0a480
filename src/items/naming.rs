//! Composed item names
//!
//! `[+N] [prefixes...] Base Name [of Suffix and Suffix]`

use super::variant::{NameRole, VariantChoice};

/// Render the display name for a base item with variants applied
pub fn render_name(base_name: &str, choices: &[VariantChoice]) -> String {
    if choices.is_empty() {
        return base_name.to_string();
    }

    let mut enhancement = Vec::new();
    let mut prefixes = Vec::new();
    let mut suffixes = Vec::new();

    for choice in choices {
        let label = choice.label();
        if label.is_empty() {
            continue;
        }
        match choice.variant.role() {
            NameRole::EnhancementPrefix => enhancement.push(label),
            NameRole::MaterialPrefix | NameRole::Prefix => prefixes.push(label),
            NameRole::OfSuffix => suffixes.push(label),
        }
    }

    let mut parts = enhancement;
    parts.extend(prefixes);
    parts.push(base_name.trim().to_string());
    if !suffixes.is_empty() {
        parts.push(format!("of {}", suffixes.join(" and ")));
    }

    // Collapse any doubled whitespace coming from labels
    parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::ItemCategory;
    use crate::items::variant::{OptionSlot, VariantDefinition};

    fn pick(name: &str, role: NameRole) -> VariantChoice {
        VariantChoice::new(VariantDefinition::new(name, ItemCategory::Weapon, role))
    }

    #[test]
    fn test_no_variants_keeps_base_name() {
        assert_eq!(render_name("Shortsword", &[]), "Shortsword");
    }

    #[test]
    fn test_enhancement_goes_first() {
        let choices = [
            pick("of Warning", NameRole::OfSuffix),
            pick("Vicious", NameRole::Prefix),
            pick("+1", NameRole::EnhancementPrefix),
        ];
        assert_eq!(render_name("Shortsword", &choices), "+1 Vicious Shortsword of Warning");
    }

    #[test]
    fn test_prefixes_keep_selection_order() {
        let choices = [
            pick("Silvered", NameRole::MaterialPrefix),
            pick("Dancing", NameRole::Prefix),
        ];
        assert_eq!(render_name("Scimitar", &choices), "Silvered Dancing Scimitar");

        let reversed = [
            pick("Dancing", NameRole::Prefix),
            pick("Silvered", NameRole::MaterialPrefix),
        ];
        assert_eq!(render_name("Scimitar", &reversed), "Dancing Silvered Scimitar");
    }

    #[test]
    fn test_multiple_suffixes_joined_with_and() {
        let mut slaying = VariantDefinition::new("of Slaying", ItemCategory::Weapon, NameRole::OfSuffix);
        slaying.option_slot = Some(OptionSlot {
            kind: "creature type".into(),
            choices: Vec::new(),
            template: None,
        });
        let choices = [
            pick("Weapon of Warning", NameRole::OfSuffix),
            VariantChoice::with_option(slaying, "Dragons"),
        ];
        assert_eq!(
            render_name("Longbow", &choices),
            "Longbow of Warning and Slaying (Dragons)"
        );
    }
}
