//! # persist-providers
//!
//! Adapters implementing the ports of `persist-domain`.
//!
//! ## Modules
//!
//! - `cache` - Metadata cache backends, registered by name at link time
//! - `reflection` - [`ClassCatalog`](reflection::ClassCatalog), a declarative class table
//! - `mapping` - [`StaticMappingDriver`](mapping::StaticMappingDriver), mappings declared in code

pub mod cache;
pub mod mapping;
pub mod reflection;

pub use mapping::{ClassMapping, StaticMappingDriver};
pub use reflection::{ClassCatalog, ClassDeclaration};
