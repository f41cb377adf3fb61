//! Format descriptors shared by the render pipeline.

use time::OffsetDateTime;

use crate::domain::channel::ChannelId;
use crate::domain::construct::{Construct, ConstructSet, FeedItem, FieldValue};
use crate::domain::types::FeedFormat;

use super::xml::XmlWriter;
use super::{atom, rss};

/// Channel-level metadata available to every renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelContext {
    pub channel: ChannelId,
    pub format: FeedFormat,
    /// Channel publication date as supplied by the host.
    pub published: String,
    pub caching: bool,
    /// Absolute URL of the feed itself.
    pub url: String,
    /// Site home page.
    pub home_url: String,
    pub language: String,
}

pub struct RenderContext<'a> {
    pub channel: &'a ChannelContext,
    pub constructs: &'a ConstructSet,
    pub now: OffsetDateTime,
}

impl RenderContext<'_> {
    pub fn construct_value(&self, name: &str) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.constructs
            .get(name)
            .map(Construct::value)
            .unwrap_or(&NULL)
    }

    /// The `link` construct when set, the site home otherwise.
    pub fn home_link(&self) -> String {
        self.construct_value("link")
            .non_empty_text()
            .map(|link| link.into_owned())
            .unwrap_or_else(|| self.channel.home_url.clone())
    }
}

pub type FieldRenderer = fn(&RenderContext<'_>, &FieldValue, &mut XmlWriter);
pub type ItemRenderer = fn(&RenderContext<'_>, &FeedItem, &mut XmlWriter);

/// Data-only description of a syndication dialect.
pub struct FormatVariant {
    pub format: FeedFormat,
    pub root_tag: &'static str,
    pub root_attributes: &'static [(&'static str, &'static str)],
    /// Element opened right inside the root, e.g. RSS `<channel>`.
    pub wrapper_tag: Option<&'static str>,
    pub item_tag: &'static str,
    pub field_renderers: &'static [(&'static str, FieldRenderer)],
    pub item_renderer: ItemRenderer,
}

impl FormatVariant {
    pub fn for_format(format: FeedFormat) -> Option<&'static FormatVariant> {
        match format {
            FeedFormat::Rss => Some(&rss::VARIANT),
            FeedFormat::Atom => Some(&atom::VARIANT),
            FeedFormat::Json => None,
        }
    }

    pub fn renderer_for(&self, name: &str) -> Option<FieldRenderer> {
        self.field_renderers
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, renderer)| *renderer)
    }
}

/// Fallback for constructs without a dedicated renderer.
///
/// Plain values render as `<name>value</name>` when truthy; structured ones
/// carry their attributes and are skipped when the value is falsy.
pub fn render_generic(name: &str, construct: &Construct, out: &mut XmlWriter) {
    let Some(text) = construct.value().non_empty_text() else {
        return;
    };
    let attributes: Vec<(&str, &str)> = construct
        .attributes()
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    out.element(name, &attributes, &text);
}

/// Plain text element for an item field, skipped when falsy.
pub fn render_text_field(out: &mut XmlWriter, tag: &str, value: &FieldValue) {
    if let Some(text) = value.non_empty_text() {
        out.element(tag, &[], &text);
    }
}
