//! RSS 2.0 dialect.

use crate::domain::construct::{FeedItem, FieldValue};
use crate::domain::types::FeedFormat;

use super::dates;
use super::format::{FieldRenderer, FormatVariant, RenderContext, render_text_field};
use super::person;
use super::xml::XmlWriter;

const CLOUD_ATTRIBUTES: [&str; 5] = ["domain", "port", "path", "protocol", "registerProcedure"];

pub static VARIANT: FormatVariant = FormatVariant {
    format: FeedFormat::Rss,
    root_tag: "rss",
    root_attributes: &[
        ("version", "2.0"),
        ("xmlns:content", "http://purl.org/rss/1.0/modules/content/"),
        ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ("xmlns:atom", "http://www.w3.org/2005/Atom"),
    ],
    wrapper_tag: Some("channel"),
    item_tag: "item",
    field_renderers: &[
        ("link", render_link as FieldRenderer),
        ("description", render_description as FieldRenderer),
        ("language", render_language as FieldRenderer),
        ("managingEditor", render_managing_editor as FieldRenderer),
        ("webMaster", render_web_master as FieldRenderer),
        ("pubDate", render_pub_date as FieldRenderer),
        ("lastBuildDate", render_last_build_date as FieldRenderer),
        ("category", render_category as FieldRenderer),
        ("cloud", render_cloud as FieldRenderer),
        ("image", render_image as FieldRenderer),
        ("skipHours", render_skip_hours as FieldRenderer),
        ("skipDays", render_skip_days as FieldRenderer),
    ],
    item_renderer: render_item,
};

fn render_link(ctx: &RenderContext<'_>, _value: &FieldValue, out: &mut XmlWriter) {
    out.element("link", &[], &ctx.home_link());
    out.empty_element(
        "atom:link",
        &[
            ("rel", "self"),
            ("type", "application/rss+xml"),
            ("href", ctx.channel.url.as_str()),
        ],
    );
}

fn render_description(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    render_text_field(out, "description", value);
}

fn render_language(ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    match value.non_empty_text() {
        Some(language) => out.element("language", &[], &language),
        None if !ctx.channel.language.is_empty() => {
            out.element("language", &[], &ctx.channel.language)
        }
        None => {}
    }
}

fn render_managing_editor(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    person::write_rss(out, "managingEditor", value);
}

fn render_web_master(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    person::write_rss(out, "webMaster", value);
}

fn render_pub_date(ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    write_pub_date(ctx, value, out);
}

fn render_last_build_date(ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    let date = match value.non_empty_text() {
        Some(raw) => dates::parse(&raw),
        None => Some(ctx.now),
    };
    if let Some(formatted) = date.and_then(dates::rfc822) {
        out.element("lastBuildDate", &[], &formatted);
    }
}

fn render_category(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    write_categories(value, out);
}

/// Strings pass through unescaped; records become `<cloud …/>` when a domain is set.
fn render_cloud(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    match value {
        FieldValue::Text(markup) if !markup.is_empty() => out.raw(markup),
        FieldValue::Fields(_) => {
            let values: Vec<_> = CLOUD_ATTRIBUTES
                .iter()
                .map(|&name| value.field_text(name))
                .collect();
            if values[0].is_empty() {
                return;
            }
            let attributes: Vec<(&str, &str)> = CLOUD_ATTRIBUTES
                .iter()
                .copied()
                .zip(values.iter().map(|text| &**text))
                .collect();
            out.empty_element("cloud", &attributes);
        }
        _ => {}
    }
}

fn render_image(ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    let Some(url) = value.non_empty_text() else {
        return;
    };
    out.open("image", &[]);
    out.element("url", &[], &url);
    render_text_field(out, "title", ctx.construct_value("title"));
    out.element("link", &[], &ctx.home_link());
    out.close("image");
}

fn render_skip_hours(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    write_list(value, "skipHours", "hour", out);
}

fn render_skip_days(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    write_list(value, "skipDays", "day", out);
}

fn render_item(ctx: &RenderContext<'_>, item: &FeedItem, out: &mut XmlWriter) {
    render_text_field(out, "title", item.get("title"));
    render_text_field(out, "link", item.get("link"));
    if let Some(description) = item.get("description").non_empty_text() {
        out.cdata_element("description", &[], &description);
    }
    person::write_rss(out, "author", item.get("author"));
    if let Some(link) = item.get("link").non_empty_text() {
        out.element("guid", &[("isPermaLink", "true")], &link);
    }
    write_pub_date(ctx, item.get("pubDate"), out);
    write_categories(item.get("category"), out);
    render_text_field(out, "comments", item.get("comments"));
}

/// Falls back to the channel publication date.
fn write_pub_date(ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    let raw = value
        .non_empty_text()
        .map(|raw| raw.into_owned())
        .unwrap_or_else(|| ctx.channel.published.clone());
    if let Some(formatted) = dates::parse(&raw).and_then(dates::rfc822) {
        out.element("pubDate", &[], &formatted);
    }
}

fn write_categories(value: &FieldValue, out: &mut XmlWriter) {
    let Some(categories) = value.non_empty_text() else {
        return;
    };
    for category in comma_separated(&categories) {
        out.element("category", &[], category);
    }
}

/// Accepts a comma-separated string, a single scalar or a list of scalars.
fn write_list(value: &FieldValue, tag: &str, child: &str, out: &mut XmlWriter) {
    let entries: Vec<String> = match value {
        FieldValue::List(values) => values
            .iter()
            .filter_map(FieldValue::as_scalar)
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
        other => match other.as_scalar() {
            Some(list) => comma_separated(&list).map(str::to_string).collect(),
            None => Vec::new(),
        },
    };
    if entries.is_empty() {
        return;
    }
    out.open(tag, &[]);
    for entry in &entries {
        out.element(child, &[], entry);
    }
    out.close(tag);
}

fn comma_separated(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
