//! channelcast: RSS 2.0 and Atom feed rendering with a file-backed cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
