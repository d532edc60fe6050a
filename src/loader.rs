//! Listing file discovery and loading
//!
//! A listing file holds either one listing object or an array of them.

use crate::cache::CACHE_FILENAME;
use crate::config::{is_ignored, CONFIG_FILENAME};
use crate::history::HISTORY_FILENAME;
use crate::ListingInput;
use globset::GlobSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Files the tool writes itself; never treated as listings
const OWN_FILES: [&str; 3] = [CONFIG_FILENAME, CACHE_FILENAME, HISTORY_FILENAME];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid listing JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} contains no listings", path.display())]
    Empty { path: PathBuf },
}

/// A listing together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedListing {
    /// SKU when present, otherwise derived from the file name
    pub id: String,
    pub source: PathBuf,
    pub input: ListingInput,
}

/// Load every listing in one file
pub fn load_file(path: &Path) -> Result<Vec<LoadedListing>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json_err = |source: serde_json::Error| LoadError::Json {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(&content).map_err(json_err)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "listing".to_string());

    let listings = match value {
        serde_json::Value::Array(items) => {
            if items.is_empty() {
                return Err(LoadError::Empty {
                    path: path.to_path_buf(),
                });
            }
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    let input: ListingInput = serde_json::from_value(item).map_err(json_err)?;
                    let fallback = format!("{}#{}", stem, index);
                    Ok(listing(path, input, fallback))
                })
                .collect::<Result<Vec<_>, LoadError>>()?
        }
        other => {
            let input: ListingInput = serde_json::from_value(other).map_err(json_err)?;
            vec![listing(path, input, stem)]
        }
    };

    debug!(path = %path.display(), count = listings.len(), "loaded listings");
    Ok(listings)
}

fn listing(path: &Path, input: ListingInput, fallback_id: String) -> LoadedListing {
    let id = input
        .sku
        .as_deref()
        .map(str::trim)
        .filter(|sku| !sku.is_empty())
        .map(str::to_string)
        .unwrap_or(fallback_id);
    LoadedListing {
        id,
        source: path.to_path_buf(),
        input,
    }
}

/// True for `*.json` files that are not one of the tool's own files
pub fn is_listing_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if OWN_FILES.contains(&name) {
        return false;
    }
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Collect listing files under `path` (or `path` itself when it is a file), sorted
pub fn collect_listing_files(
    path: &Path,
    ignore_set: Option<&GlobSet>,
) -> anyhow::Result<Vec<PathBuf>> {
    let ignored = |p: &Path| ignore_set.is_some_and(|set| is_ignored(p, set));

    if path.is_file() {
        if ignored(path) {
            return Ok(vec![]);
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_listing_file(p) && !ignored(p.as_path()))
        .collect();

    files.sort();
    debug!(root = %path.display(), files = files.len(), "collected listing files");
    Ok(files)
}
