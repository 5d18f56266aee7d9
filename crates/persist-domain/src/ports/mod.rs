//! Domain Port Interfaces
//!
//! Boundary contracts between the persistence core and its collaborators.
//!
//! ## Organization
//!
//! - **mapping** - Mapping driver, reflection service, alias lookup, not-found fallback
//! - **cache** - External metadata cache backends
//! - **persistence** - Metadata factories, object managers, service containers
//! - **registry** - Link-time registry of metadata cache providers

/// External metadata cache port
pub mod cache;
/// Mapping strategy ports
pub mod mapping;
/// Manager-facing ports
pub mod persistence;
/// Metadata cache provider registry
pub mod registry;

pub use cache::MetadataCache;
pub use mapping::{AliasResolver, MappingDriver, NotFoundFallback, ReflectionService};
pub use persistence::{MetadataFactory, ObjectManager, ServiceContainer};
pub use registry::{
    METADATA_CACHE_PROVIDERS, MetadataCacheProviderConfig, MetadataCacheProviderEntry,
    list_metadata_cache_providers, resolve_metadata_cache,
};
