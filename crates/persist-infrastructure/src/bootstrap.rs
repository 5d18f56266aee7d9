//! Component assembly
//!
//! Builds metadata caches, metadata factories and manager registries from
//! [`AppConfig`].

use std::sync::Arc;

use persist_domain::error::{Error, Result};
use persist_domain::ports::{
    MappingDriver, MetadataCache, MetadataCacheProviderConfig, ReflectionService,
    resolve_metadata_cache,
};
use tracing::info;

use crate::config::{AppConfig, MetadataCacheConfig};
use crate::mapping::{ClassMetadataFactory, NamespaceAliases};
use crate::registry::{ManagerContainer, ManagerRegistry};

/// Create the external metadata cache described by `config`.
///
/// Returns `None` when the cache is disabled or the provider is `"none"`.
pub fn build_metadata_cache(config: &MetadataCacheConfig) -> Result<Option<Arc<dyn MetadataCache>>> {
    if !config.is_active() {
        info!("Metadata cache disabled");
        return Ok(None);
    }

    let provider_config = MetadataCacheProviderConfig::new(&config.provider)
        .with_max_capacity(config.max_capacity)
        .with_ttl_secs(config.ttl_secs);
    let cache = resolve_metadata_cache(&provider_config).map_err(Error::configuration)?;
    info!(provider = cache.provider_name(), "Metadata cache created");
    Ok(Some(cache))
}

/// Assemble a metadata factory with the configured aliases and cache
pub fn build_metadata_factory(
    config: &AppConfig,
    driver: Arc<dyn MappingDriver>,
    reflection: Arc<dyn ReflectionService>,
) -> Result<ClassMetadataFactory> {
    let aliases = NamespaceAliases::from_bindings(&config.registry.aliases);
    let factory = ClassMetadataFactory::new(driver, reflection).with_aliases(Arc::new(aliases));
    Ok(match build_metadata_cache(&config.metadata.cache)? {
        Some(cache) => factory.with_cache_driver(cache),
        None => factory,
    })
}

/// Assemble the manager registry over `managers`
pub fn build_manager_registry(
    config: &AppConfig,
    managers: ManagerContainer,
    reflection: Arc<dyn ReflectionService>,
) -> ManagerRegistry {
    let registry = ManagerRegistry::new(&config.registry, managers, reflection);
    info!(
        registry = registry.name(),
        managers = ?registry.manager_names(),
        "Manager registry created"
    );
    registry
}
