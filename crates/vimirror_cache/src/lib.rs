//! Durable result cache with TTL support.
//!
//! Remembers, per video, which files were mirrored for which rendition and the
//! descriptors they came from, so a page render can rebuild the `<video>` tag
//! without asking the API again until the entry goes stale.

#![warn(missing_docs)]

mod cache;
mod config;

pub use cache::{CacheEntry, ResultCache};
pub use config::{CacheConfig, CacheConfigBuilder};
