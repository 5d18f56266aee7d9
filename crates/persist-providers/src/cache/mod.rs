//! Metadata Cache Provider Implementations
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`NullMetadataCache`] | Testing | No-op stub, every fetch misses |
//! | [`MokaMetadataCache`] | Local | In-memory cache with capacity and TTL |

#[cfg(feature = "cache-moka")]
pub mod moka;
pub mod null;

#[cfg(feature = "cache-moka")]
pub use moka::MokaMetadataCache;
pub use null::NullMetadataCache;
