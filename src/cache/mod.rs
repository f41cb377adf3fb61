//! On-disk feed cache.
//!
//! Rendered documents are stored as `<channel>.<ext>` files under a single
//! runtime directory, one file per (channel, format). The cache is advisory:
//! callers log failures and fall back to a live render.
//!
//! ```toml
//! [cache]
//! enabled = true
//! directory = "cache/feeds"
//! ```

mod keys;
mod store;

pub use keys::CacheKey;
pub use store::{CacheError, FeedCacheStore};
