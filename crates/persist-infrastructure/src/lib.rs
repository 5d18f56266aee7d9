//! # Infrastructure Layer
//!
//! The manager registry, the class metadata factory and the cross-cutting
//! concerns around them.
//!
//! ## Module Categories
//!
//! ### Persistence Core
//! | Module | Description |
//! |--------|-------------|
//! | [`mapping`] | Alias resolution and the caching class metadata factory |
//! | [`registry`] | Manager registry and lazy service container |
//! | [`bootstrap`] | Assembly of components from configuration |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration: defaults, TOML file, environment |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod mapping;
pub mod registry;

// Linking the providers crate registers its metadata cache providers.
pub use persist_providers as providers;

pub use error_ext::ErrorContext;
pub use mapping::ClassMetadataFactory;
pub use registry::{LazyServiceContainer, ManagerRegistry};
