//! Feed rendering engine.
//!
//! A [`FeedDocument`] is built once per request from channel metadata, host
//! construct overrides and items, then rendered through a single pipeline
//! parameterized by a data-only [`FormatVariant`] (RSS or Atom).

mod atom;
mod dates;
mod document;
mod format;
mod person;
mod rss;
mod xml;

pub use document::{FeedDocument, RenderError, RenderStage};
pub use format::{ChannelContext, FormatVariant};
