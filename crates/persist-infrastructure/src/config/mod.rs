//! Configuration
//!
//! Typed configuration and its figment-based loader.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AliasBinding, AppConfig, LoggingConfig, MetadataCacheConfig, MetadataConfig, RegistryConfig,
    ServiceBinding,
};
