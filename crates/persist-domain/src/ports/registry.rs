//! Metadata Cache Provider Registry
//!
//! Auto-registration system for metadata cache providers.
//! Providers register themselves into a `linkme` distributed slice and are
//! discovered at runtime by name.

use std::sync::Arc;

use crate::constants::{METADATA_CACHE_DEFAULT_CAPACITY, METADATA_CACHE_DEFAULT_TTL_SECS};
use crate::ports::cache::MetadataCache;

/// Configuration for metadata cache provider creation
///
/// Providers use what they need and ignore the rest.
#[derive(Debug, Clone)]
pub struct MetadataCacheProviderConfig {
    /// Provider name (e.g., "moka", "null")
    pub provider: String,
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Entry TTL in seconds
    pub ttl_secs: u64,
}

impl MetadataCacheProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            max_capacity: METADATA_CACHE_DEFAULT_CAPACITY,
            ttl_secs: METADATA_CACHE_DEFAULT_TTL_SECS,
        }
    }

    /// Set the max capacity
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Set the TTL in seconds
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

/// Registry entry for metadata cache providers
pub struct MetadataCacheProviderEntry {
    /// Unique provider name (e.g., "moka", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&MetadataCacheProviderConfig) -> Result<Arc<dyn MetadataCache>, String>,
}

/// Providers submit entries at link time
#[linkme::distributed_slice]
pub static METADATA_CACHE_PROVIDERS: [MetadataCacheProviderEntry] = [..];

/// Resolve a metadata cache provider by name from the registry
///
/// # Returns
/// * `Ok(Arc<dyn MetadataCache>)` - Created provider instance
/// * `Err(String)` - Error message if provider not found or creation failed
pub fn resolve_metadata_cache(
    config: &MetadataCacheProviderConfig,
) -> Result<Arc<dyn MetadataCache>, String> {
    if let Some(entry) = METADATA_CACHE_PROVIDERS
        .iter()
        .find(|entry| entry.name == config.provider)
    {
        return (entry.factory)(config);
    }

    let available: Vec<&str> = METADATA_CACHE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(format!(
        "Unknown metadata cache provider '{}'. Available providers: {:?}",
        config.provider, available
    ))
}

/// List all registered metadata cache providers as (name, description)
pub fn list_metadata_cache_providers() -> Vec<(&'static str, &'static str)> {
    METADATA_CACHE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
