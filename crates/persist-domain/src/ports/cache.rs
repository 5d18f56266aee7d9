//! Metadata Cache Port
//!
//! Port for external metadata cache backends. Values are stored as JSON
//! strings; whether a payload actually is metadata is decided by the reader.
//!
//! ## Implementations
//!
//! - **Moka**: In-memory cache with capacity and TTL
//! - **Null**: No-op provider for testing and disabled caching

use crate::error::Result;

/// Metadata Cache Port
///
/// Arbitrary key/value store; no transactionality is required.
///
/// # Example
///
/// ```ignore
/// use persist_domain::ports::MetadataCache;
/// use persist_domain::value_objects::metadata_cache_key;
///
/// let key = metadata_cache_key("App\\Entity\\User");
/// cache.save(&key, &metadata.to_json()?)?;
/// let payload = cache.fetch(&key)?;
/// ```
pub trait MetadataCache: Send + Sync + std::fmt::Debug {
    /// Fetch the raw payload stored under `key`
    fn fetch(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous payload
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; returns whether it existed
    fn delete(&self, key: &str) -> Result<bool>;

    /// Whether `key` is present
    fn contains(&self, key: &str) -> Result<bool>;

    /// Remove every entry
    fn clear(&self) -> Result<()>;

    /// Provider identifier (e.g. "moka", "null")
    fn provider_name(&self) -> &str;
}
