//! Score result caching
//!
//! Results are keyed by the SHA-256 of the listing's canonical JSON, so an
//! unchanged listing is never re-scored while its entry is fresh.

use crate::{ListingInput, ScoreResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// On-disk format version. Bump when `CacheData` or `CacheEntry` change shape.
const CACHE_VERSION: u32 = 1;
pub const CACHE_FILENAME: &str = ".listaudit-cache.json";
pub const DEFAULT_TTL_SECONDS: u64 = 86_400;

/// Key -> result store consulted before scoring
pub trait ResultCache {
    fn get(&self, key: &str) -> Option<ScoreResult>;
    fn put(&mut self, key: &str, result: ScoreResult);
}

/// Cache key for a listing: hex SHA-256 of the crate version and the
/// listing's canonical JSON. A new release never serves scores computed
/// by an older rule table.
pub fn cache_key(input: &ListingInput) -> String {
    // Serializing a plain struct of strings, numbers and vecs cannot fail
    let canonical = serde_json::to_string(input).unwrap_or_default();
    hash_content(&format!("{}\n{}", env!("CARGO_PKG_VERSION"), canonical))
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    result: ScoreResult,
    /// Unix seconds after which the entry is stale
    expires_at: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheData {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// TTL cache of score results, optionally persisted to disk
pub struct ScoreCache {
    /// None for a memory-only cache
    cache_path: Option<PathBuf>,
    data: CacheData,
    ttl_seconds: u64,
    dirty: bool,
    enabled: bool,
}

impl ScoreCache {
    /// Open the cache file under `root`, starting empty when it is missing,
    /// unreadable or written by another format version
    pub fn new(root: &Path, ttl_seconds: u64) -> Self {
        let cache_path = root.join(CACHE_FILENAME);
        let data = Self::load_cache(&cache_path).unwrap_or_default();
        debug!(
            path = %cache_path.display(),
            entries = data.entries.len(),
            "opened score cache"
        );

        Self {
            cache_path: Some(cache_path),
            data,
            ttl_seconds,
            dirty: false,
            enabled: true,
        }
    }

    /// Cache that lives only as long as the process
    pub fn in_memory(ttl_seconds: u64) -> Self {
        Self {
            cache_path: None,
            data: CacheData::default(),
            ttl_seconds,
            dirty: false,
            enabled: true,
        }
    }

    /// Create a disabled cache (no-op)
    pub fn disabled() -> Self {
        Self {
            cache_path: None,
            data: CacheData::default(),
            ttl_seconds: 0,
            dirty: false,
            enabled: false,
        }
    }

    fn load_cache(path: &Path) -> Option<CacheData> {
        let content = fs::read_to_string(path).ok()?;
        let data: CacheData = serde_json::from_str(&content).ok()?;

        if data.version != CACHE_VERSION {
            debug!(found = data.version, expected = CACHE_VERSION, "discarding cache");
            return None;
        }

        Some(data)
    }

    /// Write the cache back to disk if it changed
    pub fn save(&self) -> Result<()> {
        let path = match &self.cache_path {
            Some(path) if self.enabled && self.dirty => path,
            _ => return Ok(()),
        };

        let content =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize cache")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write cache to {}", path.display()))?;

        Ok(())
    }

    /// Drop entries whose TTL has passed
    pub fn purge_expired(&mut self) -> usize {
        let now = unix_now();
        let before = self.data.entries.len();
        self.data.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.data.entries.len();
        if removed > 0 {
            debug!(removed, "purged expired cache entries");
            self.dirty = true;
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.data.entries.len(),
            enabled: self.enabled,
            ttl_seconds: self.ttl_seconds,
        }
    }

    /// Clear all cached entries
    pub fn clear(&mut self) {
        self.data.entries.clear();
        self.dirty = true;
    }
}

impl ResultCache for ScoreCache {
    fn get(&self, key: &str) -> Option<ScoreResult> {
        if !self.enabled {
            return None;
        }

        let entry = self.data.entries.get(key)?;
        if entry.is_expired(unix_now()) {
            debug!(key, "cache entry expired");
            return None;
        }

        Some(entry.result.clone())
    }

    fn put(&mut self, key: &str, result: ScoreResult) {
        if !self.enabled {
            return;
        }

        let entry = CacheEntry {
            result,
            expires_at: unix_now().saturating_add(self.ttl_seconds),
        };
        self.data.entries.insert(key.to_string(), entry);
        self.dirty = true;
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entries: usize,
    pub enabled: bool,
    pub ttl_seconds: u64,
}
