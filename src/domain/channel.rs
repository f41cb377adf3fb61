//! Channel identity and the host-supplied channel record.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::construct::{FeedItem, FieldValue};
use super::error::DomainError;
use super::types::FeedFormat;

const MAX_CHANNEL_ID_LEN: usize = 128;
const ATOM_SUFFIX: &str = ".atom";

/// Validated channel identifier.
///
/// Only ASCII letters, digits, `-` and `_` are accepted, so an identifier can
/// always be used as a file stem without escaping its directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::validation("channel identifier is empty"));
        }
        if raw.len() > MAX_CHANNEL_ID_LEN {
            return Err(DomainError::validation(format!(
                "channel identifier exceeds {MAX_CHANNEL_ID_LEN} bytes"
            )));
        }
        if let Some(ch) = raw
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_'))
        {
            return Err(DomainError::validation(format!(
                "channel identifier contains unsupported character `{}`",
                ch.escape_default()
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A feed request resolved from a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub channel: ChannelId,
    pub format: FeedFormat,
}

impl FeedRequest {
    /// `news` selects RSS for `news`, `news.atom` selects Atom for `news`.
    pub fn from_segment(segment: &str) -> Result<Self, DomainError> {
        let (raw, format) = match segment.strip_suffix(ATOM_SUFFIX) {
            Some(basename) => (basename, FeedFormat::Atom),
            None => (segment, FeedFormat::Rss),
        };
        let channel = ChannelId::parse(raw)?;
        Ok(Self { channel, format })
    }
}

/// Channel data for one format, as loaded from the host data layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelRecord {
    pub enabled: bool,
    pub published: String,
    pub caching: bool,
    pub language: String,
    pub constructs: BTreeMap<String, FieldValue>,
    pub items: Vec<FeedItem>,
}
