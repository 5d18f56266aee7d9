//! Mapping Ports
//!
//! Strategy objects injected into the metadata factory: the mapping driver
//! that reads a class's mapping, the reflection service that knows which
//! classes exist and how they inherit, the alias table, and the fallback
//! consulted when a class has no mapping.

use std::sync::Arc;

use crate::error::Result;
use crate::value_objects::ClassMetadata;

/// Mapping driver port
///
/// Reads the mapping of a single class into a metadata object. Where the
/// mapping comes from (attributes, files, code) is up to the implementation.
pub trait MappingDriver: Send + Sync {
    /// Populate `metadata` with the fields and associations declared by
    /// `class_name` itself.
    ///
    /// Returns [`Error::MetadataNotFound`](crate::Error::MetadataNotFound) when
    /// the driver has no mapping for the class.
    fn load_metadata_for_class(&self, class_name: &str, metadata: &mut ClassMetadata)
        -> Result<()>;

    /// Every class name this driver maps
    fn all_class_names(&self) -> Result<Vec<String>>;

    /// Whether `class_name` has no mapping of its own
    fn is_transient(&self, class_name: &str) -> bool;

    /// One-time setup performed before the first load
    fn initialize(&self) -> Result<()> {
        Ok(())
    }
}

/// Reflection service port
///
/// Structural knowledge about classes: existence, ancestry, interfaces.
pub trait ReflectionService: Send + Sync {
    /// Whether `class_name` denotes an existing class or interface
    fn class_exists(&self, class_name: &str) -> bool;

    /// Ancestors of `class_name`, nearest first.
    ///
    /// Fails with [`Error::ClassNotFound`](crate::Error::ClassNotFound) for
    /// unknown classes.
    fn parent_classes(&self, class_name: &str) -> Result<Vec<String>>;

    /// Direct parent of `class_name`, if it has one
    fn parent_class(&self, class_name: &str) -> Result<Option<String>> {
        Ok(self.parent_classes(class_name)?.into_iter().next())
    }

    /// Whether `class_name` is an interface rather than a concrete class
    fn is_interface(&self, class_name: &str) -> bool;

    /// Whether `class_name` (or one of its ancestors) implements `interface`
    fn implements_interface(&self, class_name: &str, interface: &str) -> bool;

    /// Attach fresh reflection data to newly created metadata
    fn initialize_reflection(&self, metadata: &mut ClassMetadata) {
        metadata.mark_reflection_initialized();
    }

    /// Restore reflection data on completed or deserialized metadata
    fn wakeup_reflection(&self, metadata: &mut ClassMetadata) {
        metadata.mark_reflection_awake();
    }
}

/// Alias namespace lookup
///
/// Maps the `alias` of `alias:SimpleName` to a registered namespace.
pub trait AliasResolver: Send + Sync {
    /// Namespace registered for `alias`.
    ///
    /// Fails with [`Error::UnknownAlias`](crate::Error::UnknownAlias) when
    /// nothing is registered.
    fn namespace_for(&self, alias: &str) -> Result<String>;
}

impl<F> AliasResolver for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn namespace_for(&self, alias: &str) -> Result<String> {
        self(alias)
    }
}

/// Callback consulted with the fully-qualified class name when no metadata
/// could be loaded for it
pub type NotFoundFallback = Arc<dyn Fn(&str) -> Option<ClassMetadata> + Send + Sync>;
