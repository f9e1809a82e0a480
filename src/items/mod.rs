//! Item system
//!
//! Domain types for bases and variants, selection gating, and the
//! composition engine that turns a base plus picks into a derived item.

pub mod item;
pub mod variant;
pub mod gating;
pub mod naming;
pub mod identity;
pub mod compose;
pub mod flavor;

pub use item::{BaseItem, ItemCategory, Rarity, Weight, BonusFields, TraitFields, is_vestige_name};
pub use variant::{VariantDefinition, VariantChoice, NameRole, Prerequisite, OptionSlot};
pub use gating::{is_compatible, filter_selectable, enhancement_bonus, Selection, MAX_VARIANTS};
pub use naming::render_name;
pub use identity::{compute_item_id, short_hash, slugify, ITEM_ID_PREFIX};
pub use compose::{compose, compose_with_flavor, merge_rarity, ComposedItem, ComposeError};
pub use flavor::FlavorIndex;
