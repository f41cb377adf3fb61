//! Syndication service: resolves a feed request to RSS or Atom output.
//!
//! This service encapsulates the cache-or-render decision, keeping the HTTP
//! layer and the CLI focused on request/response handling.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::{self, JoinError};
use tracing::{debug, info, warn};
use url::Url;

use crate::application::render::{ChannelContext, FeedDocument, FormatVariant, RenderError};
use crate::application::repos::{ChannelsRepo, RepoError};
use crate::cache::{CacheError, FeedCacheStore};
use crate::domain::channel::{ChannelId, FeedRequest};
use crate::domain::types::FeedFormat;

/// Path prefix feeds are served under; the channel segment follows it.
pub const FEED_PATH_PREFIX: &str = "rss/";

/// Public addresses used to build self and home links.
#[derive(Debug, Clone)]
pub struct SiteLinks {
    pub home_url: String,
    /// Base URL the feed routes are mounted under; always ends with `/`.
    pub public_url: Url,
}

impl SiteLinks {
    pub fn feed_url(&self, segment: &str) -> String {
        let path = format!("{FEED_PATH_PREFIX}{segment}");
        self.public_url
            .join(&path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{path}", self.public_url))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Cache,
    Live,
}

#[derive(Debug, Clone)]
pub struct RenderedFeed {
    pub format: FeedFormat,
    pub body: String,
    pub source: FeedSource,
}

#[derive(Debug, Error)]
pub enum SyndicationError {
    #[error("feed channel `{0}` not found")]
    NotFound(String),
    #[error("feed format `{0}` is not supported")]
    Unsupported(FeedFormat),
    #[error("failed to load channel: {0}")]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("feed task failed: {0}")]
    Task(#[from] JoinError),
}

impl From<RenderError> for SyndicationError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::UnsupportedFormat(format) => SyndicationError::Unsupported(format),
        }
    }
}

/// Service producing syndication documents for channels.
#[derive(Clone)]
pub struct SyndicationService {
    channels: Arc<dyn ChannelsRepo>,
    cache: Option<Arc<FeedCacheStore>>,
    site: SiteLinks,
}

impl SyndicationService {
    pub fn new(
        channels: Arc<dyn ChannelsRepo>,
        cache: Option<Arc<FeedCacheStore>>,
        site: SiteLinks,
    ) -> Self {
        Self {
            channels,
            cache,
            site,
        }
    }

    /// Serve the feed addressed by a path segment (`news` or `news.atom`).
    pub async fn feed(&self, segment: &str) -> Result<RenderedFeed, SyndicationError> {
        let FeedRequest { channel, format } = FeedRequest::from_segment(segment).map_err(|err| {
            debug!(
                target = "application::syndication",
                segment = segment,
                error = %err,
                "Rejected feed segment"
            );
            SyndicationError::NotFound(segment.to_string())
        })?;

        if let Some(body) = self.read_cache(&channel, format).await {
            return Ok(RenderedFeed {
                format,
                body,
                source: FeedSource::Cache,
            });
        }

        if FormatVariant::for_format(format).is_none() {
            return Err(SyndicationError::Unsupported(format));
        }

        let record = self
            .channels
            .find_channel(&channel, format)
            .await?
            .filter(|record| record.enabled)
            .ok_or_else(|| SyndicationError::NotFound(channel.to_string()))?;

        let context = ChannelContext {
            channel,
            format,
            published: record.published,
            caching: record.caching && self.cache.is_some(),
            url: self.site.feed_url(segment),
            home_url: self.site.home_url.clone(),
            language: record.language,
        };

        let mut document = FeedDocument::new(context, &record.constructs, record.items)?;
        if let Some(cache) = &self.cache {
            document = document.with_cache(Arc::clone(cache));
        }

        // Rendering and the cache write touch the filesystem synchronously.
        let body = task::spawn_blocking(move || document.run()).await?;

        Ok(RenderedFeed {
            format,
            body,
            source: FeedSource::Live,
        })
    }

    /// Drop one format of a channel, or all of them when `format` is `None`.
    ///
    /// Returns the number of entries that existed.
    pub fn drop_cache(
        &self,
        channel: &ChannelId,
        format: Option<FeedFormat>,
    ) -> Result<usize, SyndicationError> {
        let cache = self.cache.as_ref().ok_or(CacheError::Unavailable)?;
        let removed = match format {
            Some(format) => {
                let existed = cache.has_cache(channel, format);
                cache.drop_cache(channel, format)?;
                usize::from(existed)
            }
            None => cache.drop_channel(channel)?,
        };

        info!(
            target = "application::syndication",
            op = "cache::drop",
            channel = %channel,
            format = format.map(FeedFormat::as_str).unwrap_or("all"),
            removed = removed,
            "Feed cache dropped"
        );
        Ok(removed)
    }

    pub fn clear_cache(&self) -> Result<usize, SyndicationError> {
        let cache = self.cache.as_ref().ok_or(CacheError::Unavailable)?;
        Ok(cache.clear()?)
    }

    async fn read_cache(&self, channel: &ChannelId, format: FeedFormat) -> Option<String> {
        let cache = Arc::clone(self.cache.as_ref()?);
        let key = channel.clone();
        let lookup = task::spawn_blocking(move || {
            if cache.has_cache(&key, format) {
                cache.get_cache(&key, format)
            } else {
                Ok(None)
            }
        })
        .await
        .map_err(SyndicationError::from)
        .and_then(|result| result.map_err(SyndicationError::from));

        match lookup {
            Ok(Some(body)) => {
                metrics::counter!("channelcast_feed_cache_hit_total").increment(1);
                debug!(
                    target = "application::syndication",
                    op = "cache::get",
                    result = "hit",
                    channel = %channel,
                    format = %format,
                    bytes = body.len(),
                    "Feed served from cache"
                );
                Some(body)
            }
            Ok(None) => {
                metrics::counter!("channelcast_feed_cache_miss_total").increment(1);
                None
            }
            Err(err) => {
                metrics::counter!("channelcast_feed_cache_read_error_total").increment(1);
                warn!(
                    target = "application::syndication",
                    op = "cache::get",
                    result = "read_error",
                    channel = %channel,
                    format = %format,
                    error = %err,
                    "Failed to read cached feed; rendering live"
                );
                None
            }
        }
    }
}
