//! Configuration types

use std::path::PathBuf;

use persist_domain::constants::{
    DEFAULT_SERVICE_NAME, METADATA_CACHE_DEFAULT_CAPACITY, METADATA_CACHE_DEFAULT_TTL_SECS,
};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONNECTION_SERVICE, DEFAULT_LOG_LEVEL, DEFAULT_MANAGER_SERVICE,
    DEFAULT_METADATA_CACHE_PROVIDER, DEFAULT_PROXY_INTERFACE, DEFAULT_REGISTRY_NAME,
    NO_METADATA_CACHE_PROVIDER, NULL_METADATA_CACHE_PROVIDER,
};

/// Root application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging setup
    pub logging: LoggingConfig,
    /// Connections, managers and aliases
    pub registry: RegistryConfig,
    /// Metadata factory setup
    pub metadata: MetadataConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// A symbolic name bound to a service identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    /// Symbolic name ("default", "reporting", ...)
    pub name: String,
    /// Identifier handed to the service container
    pub service: String,
}

impl ServiceBinding {
    /// Bind `name` to `service`
    pub fn new<N: Into<String>, S: Into<String>>(name: N, service: S) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
        }
    }
}

/// A namespace alias usable as `alias:SimpleClassName`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasBinding {
    /// Alias prefix
    pub alias: String,
    /// Namespace it stands for
    pub namespace: String,
}

impl AliasBinding {
    /// Bind `alias` to `namespace`
    pub fn new<A: Into<String>, N: Into<String>>(alias: A, namespace: N) -> Self {
        Self {
            alias: alias.into(),
            namespace: namespace.into(),
        }
    }
}

/// Manager registry configuration
///
/// Bindings are kept in declaration order; managers are consulted in this
/// order when resolving the manager of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry name, used in error messages
    pub name: String,
    /// Name of the default connection
    pub default_connection: String,
    /// Name of the default manager
    pub default_manager: String,
    /// Connection name to service identifier
    pub connections: Vec<ServiceBinding>,
    /// Manager name to service identifier
    pub managers: Vec<ServiceBinding>,
    /// Marker interface implemented by generated proxies
    pub proxy_interface: String,
    /// Namespace aliases
    pub aliases: Vec<AliasBinding>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_REGISTRY_NAME.to_string(),
            default_connection: DEFAULT_SERVICE_NAME.to_string(),
            default_manager: DEFAULT_SERVICE_NAME.to_string(),
            connections: vec![ServiceBinding::new(
                DEFAULT_SERVICE_NAME,
                DEFAULT_CONNECTION_SERVICE,
            )],
            managers: vec![ServiceBinding::new(
                DEFAULT_SERVICE_NAME,
                DEFAULT_MANAGER_SERVICE,
            )],
            proxy_interface: DEFAULT_PROXY_INTERFACE.to_string(),
            aliases: Vec::new(),
        }
    }
}

/// Metadata factory configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// External metadata cache
    pub cache: MetadataCacheConfig,
}

/// External metadata cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCacheConfig {
    /// Whether an external cache is attached to metadata factories
    pub enabled: bool,
    /// Registered provider name ("moka", "null"), or "none"
    pub provider: String,
    /// Maximum number of cached entries
    pub max_capacity: u64,
    /// Entry TTL in seconds
    pub ttl_secs: u64,
}

impl MetadataCacheConfig {
    /// Whether a cache provider is to be created
    pub fn is_active(&self) -> bool {
        self.enabled && self.provider != NO_METADATA_CACHE_PROVIDER
    }

    /// Whether the selected provider keeps entries, so capacity and TTL apply
    pub fn stores_entries(&self) -> bool {
        self.is_active() && self.provider != NULL_METADATA_CACHE_PROVIDER
    }
}

impl Default for MetadataCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: DEFAULT_METADATA_CACHE_PROVIDER.to_string(),
            max_capacity: METADATA_CACHE_DEFAULT_CAPACITY,
            ttl_secs: METADATA_CACHE_DEFAULT_TTL_SECS,
        }
    }
}
