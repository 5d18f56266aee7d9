//! Infrastructure constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "PERSIST";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "persist.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "persist";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "PERSIST_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// REGISTRY CONSTANTS
// ============================================================================

/// Default registry name, used in error messages
pub const DEFAULT_REGISTRY_NAME: &str = "ORM";

/// Default service identifier of the default connection
pub const DEFAULT_CONNECTION_SERVICE: &str = "default_connection";

/// Default service identifier of the default manager
pub const DEFAULT_MANAGER_SERVICE: &str = "default_manager";

/// Default marker interface implemented by generated proxies
pub const DEFAULT_PROXY_INTERFACE: &str = "Persistence\\Proxy";

// ============================================================================
// METADATA CACHE CONSTANTS
// ============================================================================

/// Default metadata cache provider
pub const DEFAULT_METADATA_CACHE_PROVIDER: &str = "moka";

/// Provider that accepts writes and stores nothing
pub const NULL_METADATA_CACHE_PROVIDER: &str = "null";

/// Provider name that disables the external metadata cache
pub const NO_METADATA_CACHE_PROVIDER: &str = "none";
