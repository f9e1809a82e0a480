//! Export of composed items
//!
//! Nothing here touches the filesystem; callers decide where the JSON goes.

use serde::{Deserialize, Serialize};

use crate::items::{ComposedItem, Weight};

/// Flat inventory row handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistablePayload {
    pub item_id: String,
    pub item_name: String,
    pub item_type: String,
    pub item_rarity: String,
    pub item_description: Option<String>,
    pub item_weight: Option<Weight>,
    /// Pricing is not derived
    pub item_cost: Option<String>,
}

/// Pretty-printed JSON of the full composed record
pub fn export_json(item: &ComposedItem) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(item)
}

/// Reduce a composed item to the inventory row shape, dropping warnings
/// and provenance
pub fn to_persistable_payload(item: &ComposedItem) -> PersistablePayload {
    PersistablePayload {
        item_id: item.item_id.clone(),
        item_name: item.name.clone(),
        item_type: item.category.name().to_string(),
        item_rarity: item.rarity.name().to_string(),
        item_description: item.description.clone(),
        item_weight: item.weight.clone(),
        item_cost: None,
    }
}

/// Suggested download file name: `"+1 Shortsword"` -> `"1-Shortsword.json"`
pub fn export_file_name(item: &ComposedItem) -> String {
    let name = item.name.trim();
    let mut out = String::with_capacity(name.len() + 5);
    let mut in_gap = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('-');
            in_gap = true;
        }
    }

    let mut out = out.trim_matches('-').to_string();
    if out.is_empty() {
        return "item.json".to_string();
    }
    out.push_str(".json");
    out
}
