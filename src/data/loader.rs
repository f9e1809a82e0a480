//! Catalog loader
//!
//! Loads base items and variant definitions from RON or JSON files, with
//! fallback to the built-in catalogs. Loading never fails: unreadable data
//! is logged and replaced with an empty list.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::items::{BaseItem, FlavorIndex, ItemCategory, VariantDefinition};

use super::bases::{default_base_catalog, BaseCatalog};
use super::filters::{self, FilterMode};
use super::paths::resolve_data_dir;
use super::raw::{CatalogRecord, RawItem};
use super::variants::{default_variant_catalog, VariantCatalog};

pub const BASES_FILE: &str = "bases";
pub const VARIANTS_FILE: &str = "variants";
pub const HOMEBREW_FILE: &str = "variants.homebrew";
pub const FLAVOR_FILE: &str = "flavor-overrides";
/// Second flavor file; only fills names the first one lacks
pub const FINISHED_FLAVOR_FILE: &str = "flavor-overrides.finished";

/// Wrapper keys a catalog document may keep its record list under
const BASE_LIST_KEYS: &[&str] = &["items", "baseitem", "item"];
const VARIANT_LIST_KEYS: &[&str] = &["variants", "magicvariant"];

/// Key prefix given to homebrew variants that collide with the primary set
pub const HOMEBREW_PREFIX: &str = "hb_";

/// Errors raised while reading or writing catalog files
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize {what}: {message}")]
    Serialize { what: &'static str, message: String },
}

/// Base items that passed filtering, and how hard the filter had to bend
#[derive(Debug, Clone, PartialEq)]
pub struct BasePool {
    pub items: Vec<BaseItem>,
    pub mode: FilterMode,
}

impl BasePool {
    pub fn is_degraded(&self) -> bool {
        self.mode == FilterMode::Relaxed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ron,
    Json,
}

/// Manages the loaded catalogs
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Raw base records as loaded
    pub bases: BaseCatalog,
    /// Variant definitions, homebrew merged in
    pub variants: VariantCatalog,
    /// Flavor text overrides keyed by item name
    pub flavor: FlavorIndex,
    /// Classified base records
    records: Vec<CatalogRecord>,
}

impl DataManager {
    /// Create a new DataManager from the default data directory
    pub fn new() -> Self {
        Self::load_from_dir(&resolve_data_dir(None))
    }

    /// Build from already-loaded catalogs
    pub fn from_catalogs(bases: BaseCatalog, variants: VariantCatalog) -> Self {
        let records = bases.items.iter().filter_map(RawItem::classify).collect();
        Self {
            bases,
            variants,
            flavor: FlavorIndex::default(),
            records,
        }
    }

    /// Attach flavor overrides
    pub fn with_flavor(mut self, flavor: FlavorIndex) -> Self {
        self.flavor = flavor;
        self
    }

    /// Load catalogs from a directory; missing files use the defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let bases = Self::load_base_catalog(dir);
        let mut variants = Self::load_variant_catalog(dir);
        let homebrew = Self::load_homebrew(dir);
        if !homebrew.is_empty() {
            merge_homebrew(&mut variants.variants, homebrew);
        }

        let flavor = Self::load_flavor(dir);

        log::info!(
            "Loaded {} base records, {} variants and {} flavor overrides from {}",
            bases.len(),
            variants.len(),
            flavor.len(),
            dir.display()
        );
        Self::from_catalogs(bases, variants).with_flavor(flavor)
    }

    fn load_base_catalog(dir: &Path) -> BaseCatalog {
        let Some((path, format)) = find_catalog_file(dir, BASES_FILE) else {
            log::debug!("No base catalog in {}, using defaults", dir.display());
            return default_base_catalog();
        };
        match read_records::<RawItem>(&path, format, BASE_LIST_KEYS) {
            Ok(items) => BaseCatalog { items },
            Err(e) => {
                log::warn!("{}", e);
                BaseCatalog::default()
            }
        }
    }

    fn load_variant_catalog(dir: &Path) -> VariantCatalog {
        let Some((path, format)) = find_catalog_file(dir, VARIANTS_FILE) else {
            log::debug!("No variant catalog in {}, using defaults", dir.display());
            return default_variant_catalog();
        };
        match read_records(&path, format, VARIANT_LIST_KEYS) {
            Ok(variants) => VariantCatalog { variants },
            Err(e) => {
                log::warn!("{}", e);
                VariantCatalog::default()
            }
        }
    }

    fn load_homebrew(dir: &Path) -> Vec<VariantDefinition> {
        let Some((path, format)) = find_catalog_file(dir, HOMEBREW_FILE) else {
            return Vec::new();
        };
        match read_records::<VariantDefinition>(&path, format, VARIANT_LIST_KEYS) {
            Ok(variants) => {
                log::info!("Merging {} homebrew variants from {}", variants.len(), path.display());
                variants
            }
            Err(e) => {
                log::warn!("{}", e);
                Vec::new()
            }
        }
    }

    fn load_flavor(dir: &Path) -> FlavorIndex {
        let mut index = FlavorIndex::new();
        for stem in [FLAVOR_FILE, FINISHED_FLAVOR_FILE] {
            let Some((path, format)) = find_catalog_file(dir, stem) else {
                continue;
            };
            match read_flavor(&path, format) {
                Ok(more) => index.extend_missing(more),
                Err(e) => log::warn!("{}", e),
            }
        }
        index
    }

    /// Filtered base pool for a category, or every category.
    ///
    /// Each category falls back to the relaxed filter on its own when the
    /// strict one leaves it empty.
    pub fn base_pool(&self, category: Option<ItemCategory>) -> BasePool {
        let Some(category) = category else {
            let mut pool = BasePool {
                items: Vec::new(),
                mode: FilterMode::Strict,
            };
            for category in ItemCategory::all() {
                let part = self.category_pool(*category);
                if part.is_degraded() && !part.items.is_empty() {
                    pool.mode = FilterMode::Relaxed;
                }
                pool.items.extend(part.items);
            }
            return pool;
        };
        self.category_pool(category)
    }

    fn category_pool(&self, category: ItemCategory) -> BasePool {
        let strict = self.filtered_bases(Some(category), FilterMode::Strict);
        if !strict.is_empty() {
            return BasePool {
                items: strict,
                mode: FilterMode::Strict,
            };
        }

        let relaxed = self.filtered_bases(Some(category), FilterMode::Relaxed);
        if !relaxed.is_empty() {
            log::warn!(
                "No mundane {} bases found, using relaxed filter ({} items)",
                category.name(),
                relaxed.len()
            );
        }
        BasePool {
            items: relaxed,
            mode: FilterMode::Relaxed,
        }
    }

    fn filtered_bases(&self, category: Option<ItemCategory>, mode: FilterMode) -> Vec<BaseItem> {
        self.records
            .iter()
            .filter(|r| category.map_or(true, |c| r.category == Some(c)))
            .filter(|r| {
                let keep = filters::passes(r, mode);
                if !keep {
                    log::debug!("Filtered out base {:?} ({:?})", r.name, mode);
                }
                keep
            })
            .filter_map(CatalogRecord::to_base_item)
            .collect()
    }

    /// Base items eligible for variants
    pub fn load_bases(&self, category: Option<ItemCategory>) -> Vec<BaseItem> {
        self.base_pool(category).items
    }

    /// Variant definitions, vestige states excluded
    pub fn load_variants(&self, category: Option<ItemCategory>) -> Vec<VariantDefinition> {
        self.variants
            .variants
            .iter()
            .filter(|v| !v.is_vestige())
            .filter(|v| category.map_or(true, |c| v.category == c))
            .cloned()
            .collect()
    }

    /// Find an eligible base by name, ignoring case and spacing
    pub fn find_base(&self, name: &str) -> Option<BaseItem> {
        let wanted = normalize_name(name);
        self.load_bases(None)
            .into_iter()
            .find(|b| normalize_name(&b.name) == wanted)
    }

    /// Find a variant by key or name
    pub fn find_variant(&self, name_or_key: &str) -> Option<&VariantDefinition> {
        self.variants.find(name_or_key).filter(|v| !v.is_vestige())
    }

    /// Find a variant for a category, where names like "Adamantine" repeat
    pub fn find_variant_for(&self, name_or_key: &str, category: ItemCategory) -> Option<&VariantDefinition> {
        let wanted = name_or_key.trim();
        let candidates = || {
            self.variants
                .variants
                .iter()
                .filter(move |v| v.category == category && !v.is_vestige())
        };
        candidates()
            .find(|v| v.canonical_key().eq_ignore_ascii_case(wanted))
            .or_else(|| candidates().find(|v| v.name.eq_ignore_ascii_case(wanted)))
            .or_else(|| candidates().find(|v| v.label().eq_ignore_ascii_case(wanted)))
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self::from_catalogs(default_base_catalog(), default_variant_catalog())
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Append homebrew variants, re-keying any whose key is already taken
pub fn merge_homebrew(primary: &mut Vec<VariantDefinition>, homebrew: Vec<VariantDefinition>) {
    for mut variant in homebrew {
        let key = variant.canonical_key().to_string();
        let taken = |k: &str| {
            primary
                .iter()
                .any(|v| v.canonical_key().eq_ignore_ascii_case(k))
        };
        if taken(&key) {
            let renamed = format!("{}{}", HOMEBREW_PREFIX, key);
            log::warn!("Duplicate variant key '{}'; homebrew copy renamed to '{}'", key, renamed);
            variant.key = Some(renamed);
        }
        primary.push(variant);
    }
}

fn find_catalog_file(dir: &Path, stem: &str) -> Option<(PathBuf, Format)> {
    [("ron", Format::Ron), ("json", Format::Json)]
        .into_iter()
        .map(|(ext, format)| (dir.join(format!("{}.{}", stem, ext)), format))
        .find(|(path, _)| path.exists())
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a list of records, skipping the ones that fail to decode.
///
/// The document is either a bare list or an object holding the list under
/// one of `list_keys`. Only an unreadable or unparseable document is an
/// error.
fn read_records<T: DeserializeOwned>(
    path: &Path,
    format: Format,
    list_keys: &[&str],
) -> Result<Vec<T>, CatalogError> {
    let content = read_file(path)?;
    let document: Value = decode(path, format, &content)?;
    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut object) => list_keys
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or_else(|| CatalogError::Parse {
                path: path.to_path_buf(),
                message: format!("expected a list under one of {:?}", list_keys),
            })?,
        _ => {
            return Err(CatalogError::Parse {
                path: path.to_path_buf(),
                message: "expected a list of records".to_string(),
            })
        }
    };

    let total = records.len();
    let decoded: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let label = record_label(&record, index);
            match serde_json::from_value(record) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Skipping record {} in {}: {}", label, path.display(), e);
                    None
                }
            }
        })
        .collect();
    if decoded.len() < total {
        log::warn!(
            "Kept {} of {} records from {}",
            decoded.len(),
            total,
            path.display()
        );
    }
    Ok(decoded)
}

fn record_label(record: &Value, index: usize) -> String {
    ["name", "item_name", "title"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .map(|name| format!("'{}'", name))
        .unwrap_or_else(|| format!("#{}", index))
}

#[derive(Debug, Deserialize)]
struct FlavorRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    flavor: Option<String>,
}

/// Read a flavor file: `{ "Name": { flavor } }` or `{ items: [{ name, flavor }] }`
fn read_flavor(path: &Path, format: Format) -> Result<FlavorIndex, CatalogError> {
    let content = read_file(path)?;
    let document: Value = decode(path, format, &content)?;
    let mut index = FlavorIndex::new();

    if let Some(rows) = document.get("items").and_then(Value::as_array) {
        for row in rows {
            if let Ok(FlavorRow { name: Some(name), flavor: Some(flavor) }) =
                FlavorRow::deserialize(row)
            {
                index.insert(&name, flavor);
            }
        }
    } else if let Some(object) = document.as_object() {
        for (name, entry) in object {
            if let Some(flavor) = entry.get("flavor").and_then(Value::as_str) {
                index.insert(name, flavor);
            }
        }
    } else {
        return Err(CatalogError::Parse {
            path: path.to_path_buf(),
            message: "expected a map of names or an items list".to_string(),
        });
    }

    log::debug!("Read {} flavor overrides from {}", index.len(), path.display());
    Ok(index)
}

fn decode<T: DeserializeOwned>(path: &Path, format: Format, content: &str) -> Result<T, CatalogError> {
    let result = match format {
        Format::Ron => ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    result.map_err(|message| CatalogError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn to_ron<T: serde::Serialize>(value: &T, what: &'static str) -> Result<String, CatalogError> {
    let config = ron::ser::PrettyConfig::default()
        .extensions(ron::extensions::Extensions::IMPLICIT_SOME);
    ron::ser::to_string_pretty(value, config).map_err(|e| CatalogError::Serialize {
        what,
        message: e.to_string(),
    })
}

fn write_file(path: &Path, content: String) -> Result<(), CatalogError> {
    fs::write(path, content).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Export the built-in catalogs to RON files for easy editing
pub fn export_default_data(dir: &Path) -> Result<(), CatalogError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    // Export bases
    let bases_ron = to_ron(&default_base_catalog(), "bases")?;
    write_file(&dir.join(format!("{}.ron", BASES_FILE)), bases_ron)?;

    // Export variants
    let variants_ron = to_ron(&default_variant_catalog(), "variants")?;
    write_file(&dir.join(format!("{}.ron", VARIANTS_FILE)), variants_ron)?;

    log::info!("Exported default catalogs to {}", dir.display());
    Ok(())
}
