//! Reflection Service Implementations

pub mod catalog;

pub use catalog::{ClassCatalog, ClassDeclaration};
