//! Value Objects
//!
//! Immutable-by-convention data shared across layers: class-name helpers and
//! the class mapping metadata model.

/// Class-name helpers (alias expansion, proxy names, cache keys)
pub mod class_name;
/// Class mapping metadata model
pub mod metadata;

pub use class_name::{
    fqcn_from_alias, metadata_cache_key, namespace_of, real_class_name, split_alias,
};
pub use metadata::{
    AssociationMapping, AssociationType, ClassMetadata, FieldMapping, MappingKind,
    ReflectionState,
};
