//! Mapping Driver Implementations

pub mod static_driver;

pub use static_driver::{ClassMapping, StaticMappingDriver};
