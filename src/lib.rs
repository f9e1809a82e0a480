//! Variant Forge - magic item variants for tabletop campaigns
//!
//! Takes a mundane weapon, armor, shield or ammunition and layers up to
//! four variants on it: enhancement bonuses, special materials and magical
//! properties. Composition is deterministic, so the same picks always give
//! the same item and id.

pub mod items;
pub mod data;
pub mod export;

// Re-export commonly used types
pub use items::{
    compose, compose_with_flavor, BaseItem, ComposeError, ComposedItem, FlavorIndex, ItemCategory,
    Rarity, Selection, VariantChoice, VariantDefinition,
};
pub use data::{BasePool, CatalogError, DataManager, FilterMode};
pub use export::{export_file_name, export_json, to_persistable_payload, PersistablePayload};
