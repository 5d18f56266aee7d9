//! Class metadata resolution
//!
//! - `aliases` - Namespace alias table and the two-stage class-name resolver
//! - `factory` - [`ClassMetadataFactory`], the caching metadata factory

pub mod aliases;
pub mod factory;

pub use aliases::{NamespaceAliases, ensure_class_exists, expand_class_name, resolve_class_name};
pub use factory::ClassMetadataFactory;
