//! Catalog loading
//!
//! Base items and variant definitions come from external RON/JSON files,
//! falling back to built-in catalogs, so campaigns can add homebrew without
//! touching code.

pub mod bases;
pub mod filters;
pub mod loader;
pub mod paths;
pub mod raw;
pub mod variants;

pub use bases::{default_base_catalog, BaseCatalog};
pub use filters::FilterMode;
pub use loader::{export_default_data, BasePool, CatalogError, DataManager};
pub use paths::resolve_data_dir;
pub use raw::{CatalogRecord, RawItem};
pub use variants::{default_variant_catalog, VariantCatalog};
