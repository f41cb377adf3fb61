//! Shared domain enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Syndication formats known to the engine.
///
/// `Json` only exists as a cache namespace; no renderer is registered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFormat {
    Rss,
    Atom,
    Json,
}

impl FeedFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedFormat::Rss => "rss",
            FeedFormat::Atom => "atom",
            FeedFormat::Json => "json",
        }
    }

    /// File extension used for cached documents of this format.
    pub fn cache_extension(self) -> &'static str {
        match self {
            FeedFormat::Atom => "atom",
            FeedFormat::Json => "json",
            FeedFormat::Rss => "xml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            FeedFormat::Rss => "application/rss+xml",
            FeedFormat::Atom => "application/atom+xml",
            FeedFormat::Json => "application/feed+json",
        }
    }

    pub fn all() -> [FeedFormat; 3] {
        [FeedFormat::Rss, FeedFormat::Atom, FeedFormat::Json]
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rss" | "xml" => Ok(FeedFormat::Rss),
            "atom" => Ok(FeedFormat::Atom),
            "json" => Ok(FeedFormat::Json),
            other => Err(format!("unknown feed format `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_extension_per_format() {
        assert_eq!(FeedFormat::Rss.cache_extension(), "xml");
        assert_eq!(FeedFormat::Atom.cache_extension(), "atom");
        assert_eq!(FeedFormat::Json.cache_extension(), "json");
    }

    #[test]
    fn parses_format_names_case_insensitively() {
        assert_eq!("ATOM".parse::<FeedFormat>(), Ok(FeedFormat::Atom));
        assert_eq!("rss".parse::<FeedFormat>(), Ok(FeedFormat::Rss));
        assert!("opml".parse::<FeedFormat>().is_err());
    }
}
