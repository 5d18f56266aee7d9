//! Domain layer constants
//!
//! Literal contracts shared by the metadata factory, the manager registry
//! and the cache providers.

// ============================================================================
// CLASS NAMING CONSTANTS
// ============================================================================

/// Separator between namespace segments of a fully-qualified class name
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Separator between a namespace alias and the simple class name
pub const ALIAS_SEPARATOR: char = ':';

/// Namespace segment marking a generated proxy class
pub const PROXY_MARKER: &str = "__CG__";

// ============================================================================
// METADATA CACHE CONSTANTS
// ============================================================================

/// Suffix appended to a fully-qualified class name to form its cache key
pub const CLASS_METADATA_CACHE_SALT: &str = "$CLASSMETADATA";

/// Default TTL for metadata cache entries (1 hour)
pub const METADATA_CACHE_DEFAULT_TTL_SECS: u64 = 3600;

/// Default maximum number of metadata cache entries
pub const METADATA_CACHE_DEFAULT_CAPACITY: u64 = 10_000;

// ============================================================================
// REGISTRY CONSTANTS
// ============================================================================

/// Name used for the default connection and manager
pub const DEFAULT_SERVICE_NAME: &str = "default";
