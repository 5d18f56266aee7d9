//! Persistence Ports
//!
//! Contracts the manager registry consumes: managers expose a metadata
//! factory, and services are obtained from a container by identifier.

use std::sync::Arc;

use crate::error::Result;
use crate::value_objects::ClassMetadata;

/// Class metadata factory port
pub trait MetadataFactory: Send + Sync {
    /// Metadata for a (possibly alias-prefixed) class name, computed once
    fn get_metadata_for(&self, class_name: &str) -> Result<Arc<ClassMetadata>>;

    /// Whether metadata is already loaded under exactly this name
    fn has_metadata_for(&self, class_name: &str) -> bool;

    /// Install metadata directly, bypassing resolution
    fn set_metadata_for(&self, class_name: &str, metadata: Arc<ClassMetadata>);

    /// Whether the (possibly alias-prefixed) class has no mapping of its own
    fn is_transient(&self, class_name: &str) -> Result<bool>;

    /// Metadata for every class the mapping driver knows
    fn all_metadata(&self) -> Result<Vec<Arc<ClassMetadata>>>;

    /// Metadata loaded so far
    fn loaded_metadata(&self) -> Vec<Arc<ClassMetadata>>;
}

/// Object manager as seen by the registry
pub trait ObjectManager: Send + Sync {
    /// The metadata factory owned by this manager
    fn metadata_factory(&self) -> Arc<dyn MetadataFactory>;

    /// Metadata of a class managed here
    fn class_metadata(&self, class_name: &str) -> Result<Arc<ClassMetadata>> {
        self.metadata_factory().get_metadata_for(class_name)
    }
}

/// Service container port
///
/// Hands out lazily created services by identifier.
pub trait ServiceContainer<S: ?Sized>: Send + Sync {
    /// The service bound to `id`, created on first access
    fn get_service(&self, id: &str) -> Result<Arc<S>>;

    /// Drop the cached instance of `id` so the next access recreates it
    fn reset_service(&self, id: &str);
}
