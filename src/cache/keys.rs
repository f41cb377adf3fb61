//! Cache key definitions.

use std::path::Path;

use crate::domain::channel::ChannelId;
use crate::domain::types::FeedFormat;

/// Identifies one cached document: a channel rendered in one format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub channel: ChannelId,
    pub format: FeedFormat,
}

impl CacheKey {
    pub fn new(channel: ChannelId, format: FeedFormat) -> Self {
        Self { channel, format }
    }

    /// `<channel>.<ext>`; safe as a bare file name because [`ChannelId`] is validated.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.channel, self.format.cache_extension())
    }

    /// Recover a key from a cache file name, ignoring anything the store did not write.
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let extension = path.extension()?.to_str()?;
        let format = FeedFormat::all()
            .into_iter()
            .find(|format| format.cache_extension() == extension)?;
        let channel = ChannelId::parse(stem).ok()?;
        Some(Self { channel, format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(channel: &str, format: FeedFormat) -> CacheKey {
        CacheKey::new(ChannelId::parse(channel).expect("channel id"), format)
    }

    #[test]
    fn file_name_uses_format_extension() {
        assert_eq!(key("news", FeedFormat::Rss).file_name(), "news.xml");
        assert_eq!(key("news", FeedFormat::Atom).file_name(), "news.atom");
        assert_eq!(key("news", FeedFormat::Json).file_name(), "news.json");
    }

    #[test]
    fn parses_only_store_owned_names() {
        assert_eq!(
            CacheKey::from_file_name(Path::new("news.atom")),
            Some(key("news", FeedFormat::Atom))
        );
        assert_eq!(CacheKey::from_file_name(Path::new("news.txt")), None);
        assert_eq!(CacheKey::from_file_name(Path::new(".channelcast-1a2b.tmp")), None);
    }
}
