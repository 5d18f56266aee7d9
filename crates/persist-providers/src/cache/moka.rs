//! Moka in-memory metadata cache provider
//!
//! Concurrent in-memory cache with bounded capacity and entry TTL.
//!
//! ## Example
//!
//! ```ignore
//! use persist_providers::cache::MokaMetadataCache;
//! use std::time::Duration;
//!
//! let cache = MokaMetadataCache::with_config(1000, Duration::from_secs(300));
//! ```

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use persist_domain::constants::{METADATA_CACHE_DEFAULT_CAPACITY, METADATA_CACHE_DEFAULT_TTL_SECS};
use persist_domain::error::{Error, Result};
use persist_domain::ports::{
    METADATA_CACHE_PROVIDERS, MetadataCache, MetadataCacheProviderConfig,
    MetadataCacheProviderEntry,
};

/// Moka-based in-memory metadata cache
#[derive(Clone)]
pub struct MokaMetadataCache {
    cache: Cache<String, String>,
    max_capacity: u64,
}

impl Default for MokaMetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MokaMetadataCache {
    /// Create a cache with default capacity and TTL
    pub fn new() -> Self {
        Self::with_config(
            METADATA_CACHE_DEFAULT_CAPACITY,
            Duration::from_secs(METADATA_CACHE_DEFAULT_TTL_SECS),
        )
    }

    /// Create a cache holding at most `max_capacity` entries, without expiry
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self {
            cache,
            max_capacity,
        }
    }

    /// Create a cache with custom capacity and entry TTL
    pub fn with_config(max_capacity: u64, time_to_live: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(time_to_live)
            .build();
        Self {
            cache,
            max_capacity,
        }
    }

    /// Maximum number of entries
    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    /// Approximate number of entries
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl MetadataCache for MokaMetadataCache {
    fn fetch(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        if self.max_capacity == 0 {
            return Err(Error::cache("Metadata cache has zero capacity"));
        }
        self.cache.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).is_some())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.cache.contains_key(key))
    }

    fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaMetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaMetadataCache")
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}

fn moka_cache_factory(
    config: &MetadataCacheProviderConfig,
) -> std::result::Result<Arc<dyn MetadataCache>, String> {
    if config.max_capacity == 0 {
        return Err("moka metadata cache requires a non-zero capacity".to_string());
    }
    Ok(Arc::new(MokaMetadataCache::with_config(
        config.max_capacity,
        Duration::from_secs(config.ttl_secs),
    )))
}

#[linkme::distributed_slice(METADATA_CACHE_PROVIDERS)]
static MOKA_METADATA_CACHE: MetadataCacheProviderEntry = MetadataCacheProviderEntry {
    name: "moka",
    description: "In-memory metadata cache (Moka)",
    factory: moka_cache_factory,
};
