//! Catalog directory resolution

use std::path::{Path, PathBuf};

/// Data directory relative to the working directory
pub const ASSETS_DATA_DIR: &str = "assets/data";

/// Get the per-user catalog directory
pub fn user_catalog_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "variantforge", "VariantForge") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("catalog");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./catalog")
    }
}

/// Pick the directory catalogs are read from.
///
/// An explicit path always wins; otherwise `assets/data` if it exists,
/// then the per-user directory.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let assets = Path::new(ASSETS_DATA_DIR);
    if assets.is_dir() {
        return assets.to_path_buf();
    }
    user_catalog_directory()
}
