//! Null metadata cache provider
//!
//! A cache provider implementation that doesn't store anything.
//! Useful for testing and disabling caching.

use std::sync::Arc;

use persist_domain::error::Result;
use persist_domain::ports::{
    METADATA_CACHE_PROVIDERS, MetadataCache, MetadataCacheProviderConfig,
    MetadataCacheProviderEntry,
};

/// Null cache provider that doesn't store anything
///
/// Every fetch is a miss and every save is accepted and dropped.
///
/// # Example
///
/// ```rust
/// use persist_domain::ports::MetadataCache;
/// use persist_providers::cache::NullMetadataCache;
///
/// let cache = NullMetadataCache::new();
/// cache.save("Foo$CLASSMETADATA", "{}").unwrap();
/// assert!(cache.fetch("Foo$CLASSMETADATA").unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NullMetadataCache;

impl NullMetadataCache {
    /// Create a new null cache provider
    pub fn new() -> Self {
        Self
    }
}

impl MetadataCache for NullMetadataCache {
    fn fetch(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    fn contains(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

fn null_cache_factory(
    _config: &MetadataCacheProviderConfig,
) -> std::result::Result<Arc<dyn MetadataCache>, String> {
    Ok(Arc::new(NullMetadataCache::new()))
}

#[linkme::distributed_slice(METADATA_CACHE_PROVIDERS)]
static NULL_METADATA_CACHE: MetadataCacheProviderEntry = MetadataCacheProviderEntry {
    name: "null",
    description: "No-op metadata cache (testing, disabled caching)",
    factory: null_cache_factory,
};
