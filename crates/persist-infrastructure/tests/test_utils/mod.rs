//! Test utilities for persist-infrastructure
//!
//! Real collaborators (class catalog, static mapping driver, moka cache)
//! wrapped with call recording where a test needs to count calls.


pub use fixtures::*;
pub use recording::*;
