//! File system scanner for discovering map documents.
//!
//! Arguments may name `.tmx` files directly or directories, which are walked
//! recursively.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;

/// Extension of map documents.
pub const MAP_EXTENSION: &str = "tmx";

/// Returns true if the path looks like a map document.
pub fn is_map_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MAP_EXTENSION))
}

/// Recursively find map documents under `root`, sorted by path.
pub fn scan_directory(root: &Path, config: &Config) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let mut maps: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_map_file(path))
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            !config.is_excluded(relative)
        })
        .collect();

    maps.sort();
    maps
}

/// Expand command line paths into map documents.
///
/// Files are taken as given, even without the `.tmx` extension; directories
/// are scanned.
pub fn discover_maps(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut maps = Vec::new();

    for path in paths {
        if path.is_dir() {
            maps.extend(scan_directory(path, config));
        } else {
            maps.push(path.clone());
        }
    }

    maps
}
