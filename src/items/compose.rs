//! Variant composition
//!
//! Merges a mundane base item with up to four variants into one derived
//! item. Composition is pure: inputs are never touched and every call
//! builds a fresh [`ComposedItem`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::flavor::FlavorIndex;
use super::gating::{conflicts_with, enhancement_bonus, is_compatible, MAX_VARIANTS};
use super::identity::compute_item_id;
use super::item::{BaseItem, BonusFields, ItemCategory, Rarity, TraitFields, Weight};
use super::naming::render_name;
use super::variant::{VariantChoice, VariantDefinition};

/// Errors for inputs that should never reach composition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("no base item supplied")]
    MissingBase,
    #[error("vestige items are excluded from variant building: {0}")]
    VestigeBase(String),
}

/// The derived item produced by applying variants to a base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedItem {
    pub item_id: String,
    pub name: String,
    pub base_name: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    /// Set when the base or any applied variant requires attunement
    #[serde(default)]
    pub attunement: bool,
    pub bonuses: BonusFields,
    pub traits: TraitFields,
    /// Paragraphs joined by blank lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub entries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Override blurb matched on the composed name, then the base name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// Applied variant names, option included
    #[serde(default)]
    pub provenance: Vec<String>,
    /// Problems found while composing; never persisted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ComposedItem {
    /// Check if any variant was applied
    pub fn is_derived(&self) -> bool {
        !self.provenance.is_empty()
    }
}

/// Compose a base item with the chosen variants.
///
/// Only a missing or vestige base is an error. Selections that break the
/// gating rules are skipped or flagged in `warnings` instead.
pub fn compose(base: &BaseItem, choices: &[VariantChoice]) -> Result<ComposedItem, ComposeError> {
    compose_with_flavor(base, choices, None)
}

/// Same as [`compose`], also attaching override flavor text when the index
/// has an entry for the composed or base name
pub fn compose_with_flavor(
    base: &BaseItem,
    choices: &[VariantChoice],
    flavors: Option<&FlavorIndex>,
) -> Result<ComposedItem, ComposeError> {
    if base.name.trim().is_empty() {
        return Err(ComposeError::MissingBase);
    }
    if base.is_vestige() {
        return Err(ComposeError::VestigeBase(base.name.clone()));
    }

    let mut warnings = Vec::new();
    let applied = applicable_choices(base, choices, &mut warnings);

    let rarity = merge_rarity(base.rarity, applied.iter().map(|c| &c.variant));

    let mut bonuses = BonusFields::default();
    let mut traits = base.trait_fields();
    for choice in &applied {
        bonuses.merge_max(&choice.variant.bonuses);
        traits.merge_union(&choice.variant.traits);
    }

    let mut entries = Vec::new();
    if let Some(description) = &base.description {
        push_paragraph(&mut entries, description);
    }
    for choice in &applied {
        for entry in &choice.variant.entries {
            push_paragraph(&mut entries, entry);
        }
    }

    let enhancement = enhancement_bonus(&applied);
    for choice in &applied {
        if let Some(prereq) = choice.variant.prerequisite {
            if !prereq.is_met(enhancement) {
                log::debug!(
                    "{} applied without its prerequisite (enhancement +{})",
                    choice.variant.name,
                    enhancement
                );
                let line = prereq.warning();
                push_paragraph(&mut entries, &line);
                warnings.push(format!("{}: {}", choice.variant.name, line));
            }
        }
    }

    let description = if entries.is_empty() {
        None
    } else {
        Some(entries.join("\n\n"))
    };

    let attunement = base.requires_attunement
        || applied.iter().any(|c| c.variant.attunement_required);

    let name = render_name(&base.name, &applied);
    let flavor = flavors.and_then(|index| {
        index
            .get(&name)
            .or_else(|| index.get(&base.name))
            .map(str::to_string)
    });

    Ok(ComposedItem {
        item_id: compute_item_id(&base.name, &applied),
        name,
        base_name: base.name.clone(),
        category: base.category,
        rarity,
        attunement,
        bonuses,
        traits,
        description,
        entries,
        weight: base.weight.clone(),
        source: base.source.clone(),
        flavor,
        provenance: applied.iter().map(VariantChoice::display_name).collect(),
        warnings,
    })
}

/// Filter a raw selection down to what may legally apply.
///
/// Keeps at most [`MAX_VARIANTS`] entries and skips duplicates, stack-group
/// conflicts, vestige variants and category mismatches.
fn applicable_choices(
    base: &BaseItem,
    choices: &[VariantChoice],
    warnings: &mut Vec<String>,
) -> Vec<VariantChoice> {
    let mut applied: Vec<VariantChoice> = Vec::new();

    for (index, choice) in choices.iter().enumerate() {
        let variant = &choice.variant;
        let skip_reason = if index >= MAX_VARIANTS {
            Some("selection limit reached")
        } else if variant.is_vestige() {
            Some("vestige states are not variants")
        } else if !is_compatible(base, variant) {
            Some("not compatible with this base")
        } else if conflicts_with(variant, &applied) {
            Some("duplicate or stack-group conflict")
        } else {
            None
        };

        if let Some(reason) = skip_reason {
            log::debug!("Skipping variant {}: {}", variant.name, reason);
            warnings.push(format!("{} skipped: {}", variant.name, reason));
            continue;
        }

        if choice.option_rejected() {
            warnings.push(format!(
                "{}: option '{}' is not a valid choice",
                variant.name,
                choice.option.as_deref().unwrap_or_default()
            ));
        }

        applied.push(choice.clone());
    }

    applied
}

/// Merge rarities: explicit rarities take the max, bumps step relative to
/// the running value, and a composed item is never left mundane.
pub fn merge_rarity<'a>(
    base: Rarity,
    variants: impl IntoIterator<Item = &'a VariantDefinition>,
) -> Rarity {
    let mut current = base;
    // Highest explicit contributor; bumps may never drop below it
    let mut floor = base;
    let mut any_applied = false;

    for variant in variants {
        any_applied = true;
        if let Some(rarity) = variant.rarity {
            current = current.max(rarity);
            floor = floor.max(rarity);
        } else if let Some(delta) = variant.bump {
            current = current.bumped(delta);
        }
    }

    let merged = current.max(floor);
    if any_applied && merged.is_mundane() {
        Rarity::Uncommon
    } else {
        merged
    }
}

/// Append a paragraph unless an equivalent one is already present
fn push_paragraph(entries: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let normalized = normalize_whitespace(text);
    if entries.iter().any(|e| normalize_whitespace(e) == normalized) {
        return;
    }
    entries.push(text.to_string());
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
