//! The feed document: one render of one channel in one format.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::cache::{CacheError, FeedCacheStore};
use crate::domain::construct::{ConstructSet, FeedItem, FieldValue};
use crate::domain::types::FeedFormat;

use super::format::{ChannelContext, FieldRenderer, FormatVariant, RenderContext, render_generic};
use super::xml::XmlWriter;

const DEFAULT_DECLARATION: [(&str, &str); 2] = [("version", "1.0"), ("encoding", "UTF-8")];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("no renderer is available for the `{0}` format")]
    UnsupportedFormat(FeedFormat),
}

/// Pipeline stages, visited strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Before,
    Constructs,
    Items,
    After,
    Done,
}

impl RenderStage {
    fn next(self) -> Self {
        match self {
            RenderStage::Before => RenderStage::Constructs,
            RenderStage::Constructs => RenderStage::Items,
            RenderStage::Items => RenderStage::After,
            RenderStage::After | RenderStage::Done => RenderStage::Done,
        }
    }
}

pub struct FeedDocument {
    variant: &'static FormatVariant,
    declaration: Vec<(String, String)>,
    constructs: ConstructSet,
    /// Renderer per construct, resolved once at construction.
    plan: Vec<Option<FieldRenderer>>,
    items: Vec<FeedItem>,
    channel: ChannelContext,
    cache: Option<Arc<FeedCacheStore>>,
    now: OffsetDateTime,
}

impl FeedDocument {
    pub fn new(
        channel: ChannelContext,
        overrides: &BTreeMap<String, FieldValue>,
        items: Vec<FeedItem>,
    ) -> Result<Self, RenderError> {
        let variant = FormatVariant::for_format(channel.format)
            .ok_or(RenderError::UnsupportedFormat(channel.format))?;
        let constructs = ConstructSet::merge(channel.format, overrides);
        let plan = constructs
            .names()
            .map(|name| variant.renderer_for(name))
            .collect();

        Ok(Self {
            variant,
            declaration: DEFAULT_DECLARATION
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            constructs,
            plan,
            items,
            channel,
            cache: None,
            now: OffsetDateTime::now_utc(),
        })
    }

    /// Attach the store `run` persists into when the channel has caching enabled.
    pub fn with_cache(mut self, cache: Arc<FeedCacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_declaration(mut self, declaration: Vec<(String, String)>) -> Self {
        self.declaration = declaration;
        self
    }

    /// Pin the instant used for `lastBuildDate` fallbacks.
    pub fn with_clock(mut self, now: OffsetDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn channel(&self) -> &ChannelContext {
        &self.channel
    }

    pub fn constructs(&self) -> &ConstructSet {
        &self.constructs
    }

    /// Produce the document without touching the cache.
    pub fn render(&self) -> String {
        let mut out = XmlWriter::new();
        let ctx = RenderContext {
            channel: &self.channel,
            constructs: &self.constructs,
            now: self.now,
        };

        let mut stage = RenderStage::Before;
        while stage != RenderStage::Done {
            match stage {
                RenderStage::Before => self.render_before(&mut out),
                RenderStage::Constructs => self.render_constructs(&ctx, &mut out),
                RenderStage::Items => self.render_items(&ctx, &mut out),
                RenderStage::After => self.render_after(&mut out),
                RenderStage::Done => {}
            }
            stage = stage.next();
        }

        out.into_string()
    }

    /// Render, then persist the exact output when caching is enabled.
    ///
    /// Cache failures are logged and never affect the returned document.
    pub fn run(self) -> String {
        let started_at = Instant::now();
        let xml = self.render();
        metrics::counter!("channelcast_feed_render_total").increment(1);
        metrics::histogram!("channelcast_feed_render_ms")
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        info!(
            target = "application::render::document",
            op = "feed::run",
            channel = %self.channel.channel,
            format = %self.channel.format,
            items = self.items.len(),
            bytes = xml.len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Feed rendered"
        );

        if self.channel.caching {
            if let Err(err) = self.create_cache(&xml) {
                metrics::counter!("channelcast_feed_cache_write_error_total").increment(1);
                warn!(
                    target = "application::render::document",
                    op = "feed::run",
                    result = "cache_write_error",
                    channel = %self.channel.channel,
                    format = %self.channel.format,
                    error = %err,
                    "Failed to persist rendered feed; serving live output"
                );
            }
        }

        xml
    }

    /// Persist `content` under this document's channel and format.
    pub fn create_cache(&self, content: &str) -> Result<PathBuf, CacheError> {
        let cache = self.cache.as_ref().ok_or(CacheError::Unavailable)?;
        cache.create_cache(content, &self.channel.channel, self.channel.format)
    }

    /// Remove the cache entry for this document's channel and format.
    pub fn drop_cache(&self) -> Result<(), CacheError> {
        let cache = self.cache.as_ref().ok_or(CacheError::Unavailable)?;
        cache.drop_cache(&self.channel.channel, self.channel.format)
    }

    fn render_before(&self, out: &mut XmlWriter) {
        let declaration: Vec<(&str, &str)> = self
            .declaration
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        out.declaration(&declaration);
        out.open(self.variant.root_tag, self.variant.root_attributes);
        if let Some(wrapper) = self.variant.wrapper_tag {
            out.open(wrapper, &[]);
        }
    }

    fn render_constructs(&self, ctx: &RenderContext<'_>, out: &mut XmlWriter) {
        for ((name, construct), renderer) in self.constructs.iter().zip(&self.plan) {
            match renderer {
                Some(render) => render(ctx, construct.value(), out),
                None => render_generic(name, construct, out),
            }
        }
    }

    fn render_items(&self, ctx: &RenderContext<'_>, out: &mut XmlWriter) {
        for item in &self.items {
            out.open(self.variant.item_tag, &[]);
            (self.variant.item_renderer)(ctx, item, out);
            out.close(self.variant.item_tag);
        }
    }

    fn render_after(&self, out: &mut XmlWriter) {
        if let Some(wrapper) = self.variant.wrapper_tag {
            out.close(wrapper);
        }
        out.close(self.variant.root_tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::channel::ChannelId;
    use time::macros::datetime;

    fn channel(format: FeedFormat) -> ChannelContext {
        ChannelContext {
            channel: ChannelId::parse("news").expect("channel id"),
            format,
            published: "2024-01-01T00:00:00Z".to_string(),
            caching: false,
            url: "https://x/feed/news".to_string(),
            home_url: "https://x/".to_string(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn stages_advance_in_order() {
        let mut stage = RenderStage::Before;
        let mut visited = vec![stage];
        while stage != RenderStage::Done {
            stage = stage.next();
            visited.push(stage);
        }
        assert_eq!(
            visited,
            vec![
                RenderStage::Before,
                RenderStage::Constructs,
                RenderStage::Items,
                RenderStage::After,
                RenderStage::Done,
            ]
        );
    }

    #[test]
    fn json_format_is_rejected() {
        let result = FeedDocument::new(channel(FeedFormat::Json), &BTreeMap::new(), Vec::new());
        assert_eq!(
            result.err(),
            Some(RenderError::UnsupportedFormat(FeedFormat::Json))
        );
    }

    #[test]
    fn rss_wrappers_nest_strictly() {
        let xml = FeedDocument::new(channel(FeedFormat::Rss), &BTreeMap::new(), Vec::new())
            .expect("document")
            .with_clock(datetime!(2024-03-05 10:20:30 UTC))
            .render();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\""));
        assert!(xml.contains("xmlns:atom=\"http://www.w3.org/2005/Atom\">\n<channel>\n"));
        assert!(xml.ends_with("</channel>\n</rss>\n"));
    }

    #[test]
    fn atom_closes_only_feed() {
        let xml = FeedDocument::new(channel(FeedFormat::Atom), &BTreeMap::new(), Vec::new())
            .expect("document")
            .render();

        assert!(xml.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n"));
        assert!(xml.ends_with("</feed>\n"));
        assert!(!xml.contains("<channel>"));
    }

    #[test]
    fn custom_declaration_is_used() {
        let xml = FeedDocument::new(channel(FeedFormat::Atom), &BTreeMap::new(), Vec::new())
            .expect("document")
            .with_declaration(vec![("version".into(), "1.1".into())])
            .render();
        assert!(xml.starts_with("<?xml version=\"1.1\"?>\n"));
    }

    #[test]
    fn cache_helpers_require_a_store() {
        let document = FeedDocument::new(channel(FeedFormat::Rss), &BTreeMap::new(), Vec::new())
            .expect("document");
        assert!(matches!(
            document.create_cache("<rss/>"),
            Err(CacheError::Unavailable)
        ));
        assert!(matches!(document.drop_cache(), Err(CacheError::Unavailable)));
    }
}
