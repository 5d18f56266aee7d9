//! # persist-domain
//!
//! Domain layer of the persistence toolkit: the metadata model, the error
//! taxonomy and the port traits implemented by drivers, reflection services,
//! caches and managers.
//!
//! ## Organization
//!
//! - `error` - Error taxonomy shared by every layer
//! - `constants` - Literal contracts such as the metadata cache key suffix
//! - `value_objects` - Class-name helpers and `ClassMetadata`
//! - `ports` - Traits the infrastructure layer is written against

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::{ClassMetadata, MappingKind};
