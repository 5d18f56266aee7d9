//! Manager registry and the lazy service container backing it

pub mod container;
pub mod manager_registry;

pub use container::LazyServiceContainer;
pub use manager_registry::{Connection, ConnectionContainer, ManagerContainer, ManagerRegistry};
